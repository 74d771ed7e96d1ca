use std::borrow::Cow;

/// An iterator over the logical lines of a template source.
///
/// Every carriage return is dropped and every line feed is replaced by the
/// chosen terminator, which stays attached to the end of the line it
/// terminates. Any text after the last line feed is yielded as a final line
/// without a terminator. An empty source yields no lines at all.
#[derive(Debug)]
pub struct Lines<'source> {
    /// The original template source.
    source: &'source str,

    /// A cursor over the template source, `None` once exhausted.
    cursor: Option<usize>,

    /// The terminator appended to each line.
    newline: &'source str,
}

impl<'source> Lines<'source> {
    /// Construct a new line iterator.
    ///
    /// If no `newline` override is given then `\r\n` is used if the source
    /// contains any carriage return, otherwise `\n`.
    pub fn new(source: &'source str, newline: Option<&'source str>) -> Self {
        let newline = newline.unwrap_or_else(|| detect(source));
        let cursor = if source.is_empty() { None } else { Some(0) };
        Self {
            source,
            cursor,
            newline,
        }
    }
}

impl<'source> Iterator for Lines<'source> {
    type Item = Cow<'source, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cursor?;

        // xxxxxxxx\nxxxxx
        // ^       ^
        // i       j
        let (raw, terminated) = match self.source[i..].find('\n') {
            Some(d) => {
                let j = i + d;
                self.cursor = Some(j + 1);
                (&self.source[i..j], true)
            }
            None => {
                self.cursor = None;
                (&self.source[i..], false)
            }
        };

        if !raw.contains('\r') && (!terminated || self.newline == "\n") {
            // Nothing to rewrite so we can borrow the line straight from the
            // source, including its line feed.
            let end = i + raw.len() + usize::from(terminated);
            return Some(Cow::Borrowed(&self.source[i..end]));
        }

        let mut line = String::with_capacity(raw.len() + self.newline.len());
        line.extend(raw.chars().filter(|&c| c != '\r'));
        if terminated {
            line.push_str(self.newline);
        }
        Some(Cow::Owned(line))
    }
}

/// Returns the line terminator implied by the source.
fn detect(source: &str) -> &'static str {
    if source.contains('\r') {
        "\r\n"
    } else {
        "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_empty() {
        assert_eq!(lines("", None), Vec::<&str>::new());
    }

    #[test]
    fn lines_unterminated() {
        assert_eq!(lines("lorem ipsum", None), ["lorem ipsum"]);
    }

    #[test]
    fn lines_terminated() {
        assert_eq!(
            lines("lorem\nipsum\n", None),
            ["lorem\n", "ipsum\n", ""]
        );
    }

    #[test]
    fn lines_trailing_remainder() {
        assert_eq!(lines("lorem\nipsum", None), ["lorem\n", "ipsum"]);
    }

    #[test]
    fn lines_crlf_detected() {
        assert_eq!(
            lines("lorem\r\nipsum\r\ndolor", None),
            ["lorem\r\n", "ipsum\r\n", "dolor"]
        );
    }

    #[test]
    fn lines_any_carriage_return_switches_to_crlf() {
        assert_eq!(
            lines("lorem\nipsum\r\ndolor\n", None),
            ["lorem\r\n", "ipsum\r\n", "dolor\r\n", ""]
        );
    }

    #[test]
    fn lines_stray_carriage_returns_are_dropped() {
        assert_eq!(lines("lo\rrem\r\r\nipsum\r", None), ["lorem\r\n", "ipsum"]);
    }

    #[test]
    fn lines_newline_override() {
        assert_eq!(
            lines("lorem\r\nipsum\n", Some("\n")),
            ["lorem\n", "ipsum\n", ""]
        );
        assert_eq!(
            lines("lorem\nipsum", Some("<br>\n")),
            ["lorem<br>\n", "ipsum"]
        );
    }

    #[test]
    fn lines_newline_override_empty() {
        assert_eq!(
            lines("lorem\r\nipsum\ndolor", Some("")),
            ["lorem", "ipsum", "dolor"]
        );
    }

    #[test]
    fn lines_borrow_when_unchanged() {
        let mut iter = Lines::new("lorem\nipsum", None);
        assert!(matches!(iter.next(), Some(Cow::Borrowed("lorem\n"))));
        assert!(matches!(iter.next(), Some(Cow::Borrowed("ipsum"))));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[track_caller]
    fn lines<'a>(source: &'a str, newline: Option<&'a str>) -> Vec<String> {
        Lines::new(source, newline)
            .map(Cow::into_owned)
            .collect()
    }
}
