//! Multi-line clauses: `name OBJECT-TYPE ... ::= { parent id }`.

use super::mask::Line;
use super::token::tokenize;
use super::{find_assignment, starts_definition, SymbolPass};
use crate::config::{ScanOptions, Strictness};
use crate::error::ScanError;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

const DESCRIPTION: &str = "DESCRIPTION";

impl SymbolPass<'_, '_> {
    /// Scan the clause opened at line `start`. Returns the next line to scan.
    pub(super) fn clause(&mut self, start: usize, name: &str) -> Result<usize, ScanError> {
        let lines = self.lines;
        let mut description: Option<String> = None;
        let mut j = start + 1;

        while j < lines.len() {
            let mut tokens = tokenize(&lines[j].code);
            if starts_definition(&tokens, self.options) {
                return self.unterminated(name, start, Some(j));
            }

            if description.is_none() && tokens.first().is_some_and(|t| t.is_word(DESCRIPTION)) {
                let Some((text, end)) = describe(lines, j, self.options) else {
                    return self.unterminated(name, start, None);
                };
                description = Some(text);
                // the assignment may share the line the text ends on
                j = end;
                tokens = tokenize(&lines[j].code);
            }

            if let Some(after) = find_assignment(&tokens) {
                let (value_tokens, end) = match self.collect_braced(j, &tokens[after..]) {
                    Ok(collected) => collected,
                    Err(resume) => {
                        self.malformed_value(name, j, String::from("missing closing `}`"))?;
                        return Ok(resume);
                    }
                };
                match super::parse_value(&value_tokens) {
                    Ok(value) => self.emit(name, value, description.unwrap_or_default(), start),
                    Err(reason) => self.malformed_value(name, j, reason)?,
                }
                return Ok(end + 1);
            }

            j += 1;
        }

        self.unterminated(name, start, None)
    }

    /// Report a clause without an assignment. Lenient scanning resumes at
    /// `resume`, or at end of input.
    fn unterminated(&mut self, name: &str, start: usize, resume: Option<usize>) -> Result<usize, ScanError> {
        match self.options.strictness {
            Strictness::Strict => Err(ScanError::MalformedClause {
                name: name.into(),
                location: self.location(start),
            }),
            Strictness::Lenient => {
                let message = match resume {
                    Some(at) => format!(
                        "skipped clause `{name}`: interrupted by a new definition at line {}",
                        lines_number(self.lines, at)
                    ),
                    None => format!("skipped clause `{name}`: input ends before its assignment"),
                };
                self.warn(start, message);
                Ok(resume.unwrap_or(self.lines.len()))
            }
        }
    }
}

fn lines_number(lines: &[Line<'_>], index: usize) -> usize {
    lines.get(index).map_or(index + 1, |l| l.number)
}

/// Extract the description starting on line `index`.
///
/// Quoted text ends at its closing quote; `""` inside it is a literal quote.
/// Unquoted text runs until the line before the next assignment or
/// definition. Fragments are trimmed, empty ones are skipped, and the rest
/// are joined with single spaces. The surrounding quotes are not part of the
/// result, unlike tools that only strip the `DESCRIPTION` keyword and keep
/// the quoted literal as written. Returns the text and the line it ends on,
/// or `None` if a quoted text is never closed.
pub(super) fn describe(lines: &[Line<'_>], index: usize, options: &ScanOptions) -> Option<(String, usize)> {
    let raw = lines[index].text;
    let rest = raw.strip_prefix(DESCRIPTION).unwrap_or(raw).trim_start();
    let mut fragments: Vec<String> = Vec::new();

    // the text usually starts on the keyword's line or the next non-blank one
    let (open, first) = if rest.is_empty() {
        lines
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, l)| !l.text.is_empty())
            .map_or((index, rest), |(k, l)| (k, l.text))
    } else {
        (index, rest)
    };

    if let Some(body) = first.strip_prefix('"') {
        for (k, line) in lines.iter().enumerate().skip(open) {
            let segment = if k == open { body } else { line.text };
            let (piece, closed) = quoted_segment(segment);
            push_fragment(&mut fragments, &piece);
            if closed {
                return Some((fragments.join(" "), k));
            }
        }
        return None;
    }

    push_fragment(&mut fragments, rest);
    let mut end = index;
    for (k, line) in lines.iter().enumerate().skip(index + 1) {
        let tokens = tokenize(&line.code);
        if find_assignment(&tokens).is_some() || starts_definition(&tokens, options) {
            break;
        }
        push_fragment(&mut fragments, line.text);
        end = k;
    }
    Some((fragments.join(" "), end))
}

fn push_fragment(fragments: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        fragments.push(String::from(fragment));
    }
}

/// Read a segment of a quoted string. Returns the unescaped text and whether
/// the closing quote was found.
fn quoted_segment(segment: &str) -> (String, bool) {
    let mut piece = String::new();
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '"' {
            piece.push(c);
        } else if chars.peek() == Some(&'"') {
            chars.next();
            piece.push('"');
        } else {
            return (piece, true);
        }
    }
    (piece, false)
}

#[cfg(test)]
mod tests {
    use crate::config::{ScanOptions, Strictness};
    use crate::error::ScanError;
    use crate::scanner::scan;
    use pretty_assertions::assert_eq;

    fn strict() -> ScanOptions {
        ScanOptions {
            strictness: Strictness::Strict,
            ..ScanOptions::default()
        }
    }

    #[test]
    fn test_object_type_clause() {
        let lines = [
            "ifNumber OBJECT-TYPE",
            "    SYNTAX      Integer32",
            "    MAX-ACCESS  read-only",
            "    STATUS      current",
            "    DESCRIPTION",
            "            \"The number of network interfaces",
            "",
            "            present on this system.\"",
            "    ::= { interfaces 1 }",
        ];
        let output = scan(&lines, &ScanOptions::default()).unwrap();
        assert_eq!(output.symbols.len(), 1);
        let sym = &output.symbols[0];
        assert_eq!(
            sym.key(),
            (
                "ifNumber",
                "1",
                "interfaces",
                "",
                "The number of network interfaces present on this system."
            )
        );
        assert_eq!(sym.location.line, 1);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_description_stops_at_closing_quote() {
        let lines = [
            "x OBJECT-IDENTITY",
            "    STATUS current",
            "    DESCRIPTION \"Short.\"",
            "    REFERENCE \"RFC 2863\"",
            "    ::= { iso 9 }",
        ];
        let syms = scan(&lines, &ScanOptions::default()).unwrap().symbols;
        assert_eq!(syms[0].description, "Short.");
        assert_eq!(syms[0].parent, "iso");
    }

    #[test]
    fn test_description_with_doubled_quotes_and_inline_assignment() {
        let lines = [
            "x OBJECT-TYPE",
            "    DESCRIPTION \"say \"\"hi\"\"",
            "    FROM here\" ::= { iso 3 }",
        ];
        let output = scan(&lines, &ScanOptions::default()).unwrap();
        assert_eq!(output.symbols[0].description, "say \"hi\" FROM here");
        assert_eq!(output.symbols[0].id, "3");
        assert!(output.modules.required.is_empty());
    }

    #[test]
    fn test_unquoted_description() {
        let lines = ["x OBJECT-TYPE", "    DESCRIPTION loose", "    words", "    ::= { iso 4 }"];
        let syms = scan(&lines, &ScanOptions::default()).unwrap().symbols;
        assert_eq!(syms[0].description, "loose words");
    }

    #[test]
    fn test_clause_without_description() {
        let lines = ["x OBJECT-TYPE", "    STATUS current", "    ::= { iso 5 }"];
        let syms = scan(&lines, &ScanOptions::default()).unwrap().symbols;
        assert_eq!(syms[0].description, "");
    }

    #[test]
    fn test_module_identity_is_not_a_clause() {
        let lines = [
            "ifMIB MODULE-IDENTITY",
            "    DESCRIPTION \"The MIB module.\"",
            "    ::= { mib-2 31 }",
        ];
        let syms = scan(&lines, &ScanOptions::default()).unwrap().symbols;
        assert!(syms.is_empty());
    }

    #[test]
    fn test_configured_clause_macro() {
        let lines = ["linkDown NOTIFICATION-TYPE", "    ::= { snmpTraps 3 }"];
        let options = ScanOptions {
            clause_macros: vec![String::from("NOTIFICATION-TYPE")],
            ..ScanOptions::default()
        };
        let syms = scan(&lines, &options).unwrap().symbols;
        assert_eq!(syms[0].key(), ("linkDown", "3", "snmpTraps", "", ""));
    }

    #[test]
    fn test_interrupted_clause_lenient() {
        let lines = [
            "broken OBJECT-TYPE",
            "    SYNTAX Integer32",
            "fine OBJECT IDENTIFIER ::= { iso 1 }",
        ];
        let output = scan(&lines, &ScanOptions::default()).unwrap();
        assert_eq!(output.symbols.len(), 1);
        assert_eq!(output.symbols[0].name, "fine");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].location.line, 1);
    }

    #[test]
    fn test_clause_value_missing_brace_keeps_next_clause() {
        let lines = [
            "x OBJECT-TYPE",
            "    DESCRIPTION \"First.\"",
            "    ::= { iso 3",
            "y OBJECT-TYPE",
            "    DESCRIPTION \"Second.\"",
            "    ::= { iso 4 }",
        ];
        let output = scan(&lines, &ScanOptions::default()).unwrap();
        assert_eq!(output.symbols.len(), 1);
        assert_eq!(output.symbols[0].key(), ("y", "4", "iso", "", "Second."));
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].message.contains("missing closing `}`"));

        let err = scan(&lines, &strict()).unwrap_err();
        assert!(matches!(err, ScanError::MalformedOidValue { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_unterminated_clause_strict() {
        let err = scan(&["broken OBJECT-TYPE", "    SYNTAX Integer32"], &strict()).unwrap_err();
        match err {
            ScanError::MalformedClause { name, location } => {
                assert_eq!(name, "broken");
                assert_eq!(location.line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clause_value_with_implied_arc() {
        let lines = ["x OBJECT-TYPE", "    ::= { iso org(3) 7 }"];
        let syms = scan(&lines, &ScanOptions::default()).unwrap().symbols;
        assert_eq!(syms.len(), 2);
        assert_eq!(syms[0].key(), ("org", "3", "iso", "", ""));
        assert_eq!(syms[1].parent, "org");
    }
}
