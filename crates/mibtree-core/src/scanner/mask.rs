//! Line preparation: trimming, comment removal and string masking.
//!
//! Markers are only recognized in *code*: the text of a line with `--`
//! comments removed and the content of quoted strings dropped. The quote
//! characters themselves are kept so that the token stream still shows where
//! a string was. String state carries across lines.

use alloc::string::String;
use alloc::vec::Vec;

/// A trimmed source line and its masked code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<'src> {
    /// 1-based line number within the scanned input.
    pub number: usize,
    /// The trimmed raw text.
    pub text: &'src str,
    /// The text with comments removed and string contents dropped.
    pub code: String,
}

/// Result of masking a sequence of lines.
#[derive(Clone, Debug)]
pub struct Masked<'src> {
    /// Prepared lines, same length and order as the input.
    pub lines: Vec<Line<'src>>,
    /// Line that opened a string never closed before end of input.
    pub unterminated_string: Option<usize>,
}

/// Mask every line of the input.
#[must_use]
pub fn mask_lines<S: AsRef<str>>(lines: &[S]) -> Masked<'_> {
    let mut in_string = false;
    let mut string_start = 0;
    let mut out = Vec::with_capacity(lines.len());

    for (idx, raw) in lines.iter().enumerate() {
        let number = idx + 1;
        let text = raw.as_ref().trim();
        let mut code = String::with_capacity(text.len());
        let mut in_comment = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if in_string {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        // escaped quote
                        chars.next();
                    } else {
                        in_string = false;
                        code.push('"');
                    }
                }
                continue;
            }
            if in_comment {
                if c == '-' && chars.peek() == Some(&'-') {
                    chars.next();
                    in_comment = false;
                }
                continue;
            }
            match c {
                '"' => {
                    in_string = true;
                    string_start = number;
                    code.push('"');
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    in_comment = true;
                }
                _ => code.push(c),
            }
        }

        out.push(Line { number, text, code });
    }

    Masked {
        lines: out,
        unterminated_string: in_string.then_some(string_start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(lines: &[&str]) -> Vec<String> {
        mask_lines(lines).lines.into_iter().map(|l| l.code).collect()
    }

    #[test]
    fn test_trims_and_keeps_plain_code() {
        assert_eq!(codes(&["   ::= { ifEntry 1 }  "]), ["::= { ifEntry 1 }"]);
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(
            codes(&["foo -- a comment FROM X", "-- whole line", "a -- inline -- b"]),
            ["foo ", "", "a  b"]
        );
    }

    #[test]
    fn test_masks_multiline_strings() {
        let masked = codes(&[
            "DESCRIPTION \"first FROM part",
            "middle -- not a comment",
            "last\" ::= { a 1 }",
        ]);
        assert_eq!(masked, ["DESCRIPTION \"", "", "\" ::= { a 1 }"]);
    }

    #[test]
    fn test_escaped_quotes_stay_inside_string() {
        assert_eq!(codes(&["x \"say \"\"hi\"\" now\" y"]), ["x \"\" y"]);
    }

    #[test]
    fn test_dashes_inside_string_are_not_comments() {
        assert_eq!(codes(&["\"a -- b\" c"]), ["\"\" c"]);
    }

    #[test]
    fn test_unterminated_string_reported() {
        let masked = mask_lines(&["ok", "DESCRIPTION \"never closed", "more"]);
        assert_eq!(masked.unterminated_string, Some(2));
        assert_eq!(mask_lines(&["\"closed\""]).unterminated_string, None);
    }
}
