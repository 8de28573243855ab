//! OID value parsing: the component list between `{` and `}`.

use super::token::{Token, TokenKind};
use crate::model::parse_arc;
use alloc::string::String;
use alloc::vec::Vec;

/// A single component of an OID value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component<'a> {
    /// A symbol reference: `ifEntry`, or `SNMPv2-SMI.enterprises`.
    Name(&'a str),
    /// A bare arc: `1`.
    Number(&'a str),
    /// A labelled arc: `org(3)`.
    NamedNumber(&'a str, &'a str),
}

/// A symbol implied by a named number in the middle of an OID value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpliedArc {
    /// Label of the named number.
    pub name: String,
    /// The component before it.
    pub parent: String,
    /// Its arc.
    pub id: String,
}

/// A lowered OID value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OidValue {
    /// Direct parent of the defined symbol.
    pub parent: String,
    /// Local arc of the defined symbol.
    pub id: String,
    /// Symbols implied on the way from the first component to the parent.
    pub implied: Vec<ImpliedArc>,
}

/// Check if `name` is usable as a symbol name.
///
/// Value references start with a lowercase letter and continue with letters,
/// digits, hyphens or underscores. A double hyphen would start a comment and a
/// trailing hyphen is not allowed.
#[must_use]
pub fn is_value_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !name.contains("--")
        && !name.ends_with('-')
}

/// Strip a module qualifier (`SNMPv2-SMI.enterprises` → `enterprises`).
fn unqualified(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, last)| last)
}

/// Parse the tokens between the braces into components.
///
/// # Errors
///
/// Returns a reason when a token cannot start a component.
pub fn parse_components<'a>(tokens: &[Token<'a>]) -> Result<Vec<Component<'a>>, String> {
    let mut components = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let Some(word) = tokens[i].word() else {
            return Err(alloc::format!("unexpected `{}`", tokens[i].text));
        };

        let is_named_number = tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::LParen);
        if is_named_number {
            let number = tokens.get(i + 2).and_then(Token::word);
            let closed = tokens.get(i + 3).map(|t| t.kind) == Some(TokenKind::RParen);
            match number {
                Some(n) if closed && parse_arc(n).is_some() => {
                    components.push(Component::NamedNumber(word, n));
                    i += 4;
                }
                _ => return Err(alloc::format!("bad named number after `{word}`")),
            }
        } else if parse_arc(word).is_some() {
            components.push(Component::Number(word));
            i += 1;
        } else {
            components.push(Component::Name(unqualified(word)));
            i += 1;
        }
    }

    Ok(components)
}

/// Lower components into a parent, an arc and implied symbols.
///
/// `{ iso org(3) dod(6) 1 }` gives parent `dod`, arc `1`, and the implied
/// symbols `org` (under `iso`) and `dod` (under `org`).
///
/// # Errors
///
/// Returns a reason when the components do not describe a parent and an arc.
pub fn lower(components: &[Component<'_>]) -> Result<OidValue, String> {
    let [first, middle @ .., last] = components else {
        return Err(String::from("expected a parent and an arc"));
    };

    let mut parent = match *first {
        Component::Name(name) | Component::NamedNumber(name, _) => String::from(name),
        Component::Number(n) => {
            return Err(alloc::format!("value starts with bare arc `{n}`"));
        }
    };

    let mut implied = Vec::with_capacity(middle.len());
    for component in middle {
        match *component {
            Component::NamedNumber(name, arc) => {
                implied.push(ImpliedArc {
                    name: String::from(name),
                    parent: core::mem::replace(&mut parent, String::from(name)),
                    id: String::from(arc),
                });
            }
            Component::Number(n) => {
                return Err(alloc::format!("unnamed intermediate arc `{n}`"));
            }
            Component::Name(name) => {
                return Err(alloc::format!("unexpected name `{name}` inside value"));
            }
        }
    }

    let id = match *last {
        Component::Number(arc) | Component::NamedNumber(_, arc) => String::from(arc),
        Component::Name(name) => {
            return Err(alloc::format!("value ends with name `{name}` instead of an arc"));
        }
    };

    Ok(OidValue {
        parent,
        id,
        implied,
    })
}

/// Parse and lower the tokens between the braces.
///
/// # Errors
///
/// Returns a reason when the value is malformed.
pub fn parse_value(tokens: &[Token<'_>]) -> Result<OidValue, String> {
    lower(&parse_components(tokens)?)
}
