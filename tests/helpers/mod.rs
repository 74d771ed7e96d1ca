#![allow(dead_code)]

mod writer;

pub use writer::Writer;
