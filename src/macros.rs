/// Construct [`Variables`][crate::Variables] from a list of key-value pairs.
///
/// Keys are identifiers and values are any expression that converts into a
/// [`Value`][crate::Value]. Entries keep the order in which they are listed.
///
/// # Examples
///
/// ```
/// let vars = vtl::vars! {
///     name: "John Smith",
///     age: 42,
///     admin: true,
/// };
/// assert_eq!(vars.keys().collect::<Vec<_>>(), ["name", "age", "admin"]);
/// ```
#[macro_export]
macro_rules! vars {
    () => {
        $crate::Variables::new()
    };

    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut vars = $crate::Variables::new();
        $(
            let _ = vars.insert(::std::stringify!($key), $value);
        )+
        vars
    }};
}
