//! Tokens of masked code.

use alloc::vec::Vec;

/// Token kinds recognized in masked code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier, number or keyword.
    Word,
    /// `::=`
    Assign,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `"` (a masked string boundary)
    Quote,
}

/// A token borrowing its text from the masked line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Check if this is a word with the given text.
    #[must_use]
    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Word && self.text == text
    }

    /// The text if this is a word.
    #[must_use]
    pub fn word(&self) -> Option<&'a str> {
        (self.kind == TokenKind::Word).then_some(self.text)
    }
}

const ASSIGN: &str = "::=";

fn punctuation(b: u8) -> Option<TokenKind> {
    match b {
        b'{' => Some(TokenKind::LBrace),
        b'}' => Some(TokenKind::RBrace),
        b'(' => Some(TokenKind::LParen),
        b')' => Some(TokenKind::RParen),
        b';' => Some(TokenKind::Semicolon),
        b',' => Some(TokenKind::Comma),
        b'"' => Some(TokenKind::Quote),
        _ => None,
    }
}

/// Split masked code into tokens.
///
/// All delimiters are ASCII, so every slice boundary is a char boundary.
#[must_use]
pub fn tokenize(code: &str) -> Vec<Token<'_>> {
    let bytes = code.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos..].starts_with(ASSIGN.as_bytes()) {
            tokens.push(Token {
                kind: TokenKind::Assign,
                text: &code[pos..pos + ASSIGN.len()],
            });
            pos += ASSIGN.len();
        } else if let Some(kind) = punctuation(b) {
            tokens.push(Token {
                kind,
                text: &code[pos..=pos],
            });
            pos += 1;
        } else {
            let start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && punctuation(bytes[pos]).is_none()
                && !bytes[pos..].starts_with(ASSIGN.as_bytes())
            {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Word,
                text: &code[start..pos],
            });
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(code: &str) -> Vec<TokenKind> {
        tokenize(code).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_line_assignment() {
        let tokens = tokenize("system OBJECT IDENTIFIER ::= { mib-2 1 }");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(
            texts,
            ["system", "OBJECT", "IDENTIFIER", "::=", "{", "mib-2", "1", "}"]
        );
        assert_eq!(tokens[3].kind, TokenKind::Assign);
    }

    #[test]
    fn test_compact_punctuation() {
        assert_eq!(
            kinds("::={iso org(3)};"),
            [
                TokenKind::Assign,
                TokenKind::LBrace,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::LParen,
                TokenKind::Word,
                TokenKind::RParen,
                TokenKind::RBrace,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_word_stops_at_assign() {
        let tokens = tokenize("name::=");
        assert_eq!(tokens[0].text, "name");
        assert_eq!(tokens[1].kind, TokenKind::Assign);
    }

    #[test]
    fn test_non_ascii_words() {
        let tokens = tokenize("caf\u{e9} {x}");
        assert_eq!(tokens[0].text, "caf\u{e9}");
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_word_helpers() {
        let tokens = tokenize("FROM IF-MIB;");
        assert!(tokens[0].is_word("FROM"));
        assert_eq!(tokens[1].word(), Some("IF-MIB"));
        assert_eq!(tokens[2].word(), None);
    }
}
