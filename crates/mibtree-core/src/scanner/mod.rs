//! Line scanner.
//!
//! Extracts symbol candidates and module markers from MIB text without a full
//! ASN.1 parse. The scanner works on whole lines:
//!
//! - `NAME DEFINITIONS ::= BEGIN` records `NAME` as defined here.
//! - `FROM NAME` records `NAME` as required.
//! - `name OBJECT IDENTIFIER ::= { parent arc }` yields a symbol at once.
//! - `name OBJECT-TYPE` (or another configured clause macro) opens a clause
//!   that ends at its `::= { parent arc }` line, collecting the `DESCRIPTION`
//!   text on the way.
//!
//! Comments and string contents are masked before any marker is matched, see
//! [`mask`].
//!
//! # Usage
//!
//! ```
//! use mibtree_core::config::ScanOptions;
//! use mibtree_core::scanner::scan;
//!
//! let lines = ["system OBJECT IDENTIFIER ::= { mib-2 1 }"];
//! let output = scan(&lines, &ScanOptions::default()).unwrap();
//! assert_eq!(output.symbols[0].parent, "mib-2");
//! ```

mod clause;
pub mod mask;
pub mod token;
pub mod value;

pub use mask::{mask_lines, Line, Masked};
pub use token::{tokenize, Token, TokenKind};
pub use value::{is_value_name, parse_value, Component, ImpliedArc, OidValue};

use crate::config::{ScanOptions, Strictness};
use crate::diagnostic::{Diagnostic, Location};
use crate::error::ScanError;
use crate::model::Symbol;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Macro keywords that start a definition when they follow a name.
pub const KNOWN_MACROS: &[&str] = &[
    "AGENT-CAPABILITIES",
    "MODULE-COMPLIANCE",
    "MODULE-IDENTITY",
    "NOTIFICATION-GROUP",
    "NOTIFICATION-TYPE",
    "OBJECT-GROUP",
    "OBJECT-IDENTITY",
    "OBJECT-TYPE",
    "TEXTUAL-CONVENTION",
    "TRAP-TYPE",
];

/// Module markers found in the input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleScan {
    /// Modules named after `FROM`, in order, duplicates kept.
    pub required: Vec<String>,
    /// Modules named before `DEFINITIONS ::=`, in order, duplicates kept.
    pub defined: Vec<String>,
}

impl ModuleScan {
    /// Append another scan's markers after this one's.
    pub fn merge(&mut self, other: ModuleScan) {
        self.required.extend(other.required);
        self.defined.extend(other.defined);
    }
}

/// Everything the scanner extracts from one input.
#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    /// Symbol candidates in first-occurrence order.
    pub symbols: Vec<Symbol>,
    /// Module markers.
    pub modules: ModuleScan,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanOutput {
    /// Append another output after this one's. Merging per-file outputs in
    /// input order gives the same ordering as scanning the merged lines.
    pub fn merge(&mut self, other: ScanOutput) {
        self.symbols.extend(other.symbols);
        self.modules.merge(other.modules);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Line scanner over one input.
///
/// The scanner is lenient by default and collects diagnostics rather than
/// failing early.
pub struct Scanner<'src> {
    source: Option<String>,
    lines: Vec<Line<'src>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Scanner<'src> {
    /// Prepare lines for scanning.
    #[must_use]
    pub fn new<S: AsRef<str>>(lines: &'src [S]) -> Self {
        Self::prepare(None, lines)
    }

    /// Prepare the lines of a named source file.
    #[must_use]
    pub fn with_source<S: AsRef<str>>(source: impl Into<String>, lines: &'src [S]) -> Self {
        Self::prepare(Some(source.into()), lines)
    }

    fn prepare<S: AsRef<str>>(source: Option<String>, lines: &'src [S]) -> Self {
        let masked = mask_lines(lines);
        let mut scanner = Self {
            source,
            lines: masked.lines,
            diagnostics: Vec::new(),
        };
        if let Some(line) = masked.unterminated_string {
            let location = scanner.location(line);
            scanner.diagnostics.push(Diagnostic::error(
                location,
                "quoted string is never closed; the rest of the input is inside it",
            ));
        }
        scanner
    }

    fn location(&self, line: usize) -> Location {
        Location {
            source: self.source.clone(),
            line,
        }
    }

    /// Source name, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Collect module definition and import markers.
    #[must_use]
    pub fn modules(&self) -> ModuleScan {
        let mut scan = ModuleScan::default();
        // `FROM` at the end of a line takes the first word of the next one
        let mut pending_from = false;

        for line in &self.lines {
            let tokens = tokenize(&line.code);
            if tokens.is_empty() {
                continue;
            }

            let mut k = 0;
            if pending_from {
                pending_from = false;
                if let Some(module) = tokens[0].word() {
                    scan.required.push(module.into());
                    k = 1;
                }
            }

            while k < tokens.len() {
                let token = tokens[k];
                if token.is_word("FROM") {
                    match tokens.get(k + 1).and_then(Token::word) {
                        Some(module) => {
                            scan.required.push(module.into());
                            k += 1;
                        }
                        None => pending_from = k + 1 == tokens.len(),
                    }
                } else if token.is_word("DEFINITIONS")
                    && tokens.get(k + 1).map(|t| t.kind) == Some(TokenKind::Assign)
                {
                    if let Some(module) = k.checked_sub(1).and_then(|p| tokens[p].word()) {
                        scan.defined.push(module.into());
                    }
                }
                k += 1;
            }
        }

        scan
    }

    /// Extract symbols in first-occurrence order.
    ///
    /// Diagnostics are appended to the scanner's list; calling this twice
    /// reports them twice.
    ///
    /// # Errors
    ///
    /// Under [`Strictness::Strict`], returns the first malformed clause or
    /// OID value.
    pub fn symbols(&mut self, options: &ScanOptions) -> Result<Vec<Symbol>, ScanError> {
        let mut pass = SymbolPass {
            lines: &self.lines,
            source: self.source.as_deref(),
            options,
            symbols: Vec::new(),
            diagnostics: &mut self.diagnostics,
        };
        pass.run()?;
        Ok(pass.symbols)
    }

    /// Get a reference to collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the scanner and return collected diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Scan lines for modules and symbols.
///
/// # Errors
///
/// Under [`Strictness::Strict`], returns the first malformed clause or OID
/// value.
pub fn scan<S: AsRef<str>>(lines: &[S], options: &ScanOptions) -> Result<ScanOutput, ScanError> {
    let mut scanner = Scanner::new(lines);
    let modules = scanner.modules();
    let symbols = scanner.symbols(options)?;
    Ok(ScanOutput {
        symbols,
        modules,
        diagnostics: scanner.into_diagnostics(),
    })
}

/// Scan lines for module markers only.
#[must_use]
pub fn scan_modules<S: AsRef<str>>(lines: &[S]) -> ModuleScan {
    Scanner::new(lines).modules()
}

/// What a line starts, as far as the symbol pass cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Start<'a> {
    /// `name OBJECT IDENTIFIER ::= ...`
    Assignment(&'a str),
    /// `name OBJECT-TYPE` and friends.
    Clause(&'a str),
    /// One of the above, but the name is not a usable symbol name.
    Degenerate(&'a str),
    /// Nothing of interest.
    None,
}

fn classify<'a>(tokens: &[Token<'a>], options: &ScanOptions) -> Start<'a> {
    let Some(name) = tokens.first().and_then(Token::word) else {
        return Start::None;
    };

    let is_assignment = tokens.len() >= 4
        && tokens[1].is_word("OBJECT")
        && tokens[2].is_word("IDENTIFIER")
        && tokens[3].kind == TokenKind::Assign;
    // a clause header is exactly `name MACRO`; import lists also mention macros
    let is_clause = tokens.len() == 2
        && tokens[1]
            .word()
            .is_some_and(|keyword| options.is_clause_macro(keyword));

    match (is_assignment, is_clause) {
        (false, false) => Start::None,
        _ if !is_value_name(name) => Start::Degenerate(name),
        (true, _) => Start::Assignment(name),
        (false, true) => Start::Clause(name),
    }
}

/// Check whether a line begins a new definition of any kind.
fn starts_definition(tokens: &[Token<'_>], options: &ScanOptions) -> bool {
    if classify(tokens, options) != Start::None {
        return true;
    }
    match tokens {
        [only] => only.is_word("END"),
        [first, second, ..] => {
            first.kind == TokenKind::Word
                && (second.kind == TokenKind::Assign
                    || second.word().is_some_and(|w| KNOWN_MACROS.contains(&w)))
        }
        [] => false,
    }
}

/// Position just after `::= {`, if the line has one.
fn find_assignment(tokens: &[Token<'_>]) -> Option<usize> {
    tokens
        .windows(2)
        .position(|w| w[0].kind == TokenKind::Assign && w[1].kind == TokenKind::LBrace)
        .map(|p| p + 2)
}

/// Working state of one symbol extraction pass.
struct SymbolPass<'a, 'src> {
    lines: &'a [Line<'src>],
    source: Option<&'a str>,
    options: &'a ScanOptions,
    symbols: Vec<Symbol>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> SymbolPass<'a, '_> {
    fn run(&mut self) -> Result<(), ScanError> {
        let lines = self.lines;
        let mut i = 0;

        while i < lines.len() {
            let tokens = tokenize(&lines[i].code);
            i = match classify(&tokens, self.options) {
                Start::Assignment(name) => self.assignment(i, name, &tokens)?,
                Start::Clause(name) => self.clause(i, name)?,
                Start::Degenerate(name) => {
                    self.warn(i, format!("discarded degenerate symbol name `{name}`"));
                    i + 1
                }
                Start::None => i + 1,
            };
        }

        Ok(())
    }

    /// Handle `name OBJECT IDENTIFIER ::= { ... }` starting at line `i`.
    fn assignment(&mut self, i: usize, name: &str, tokens: &[Token<'a>]) -> Result<usize, ScanError> {
        // tokens[3] is `::=`
        if tokens.get(4).map(|t| t.kind) != Some(TokenKind::LBrace) {
            self.malformed_value(name, i, String::from("expected `{` after `::=`"))?;
            return Ok(i + 1);
        }

        let (value_tokens, end) = match self.collect_braced(i, &tokens[5..]) {
            Ok(collected) => collected,
            Err(resume) => {
                self.malformed_value(name, i, String::from("missing closing `}`"))?;
                return Ok(resume);
            }
        };

        match parse_value(&value_tokens) {
            Ok(value) => self.emit(name, value, String::new(), i),
            Err(reason) => self.malformed_value(name, i, reason)?,
        }
        Ok(end + 1)
    }

    /// Gather tokens up to the closing `}`, continuing on later lines.
    ///
    /// A continuation line that starts a new definition ends the value
    /// without a brace; the error carries the line to resume at (that line,
    /// or the end of input).
    fn collect_braced(&self, line: usize, first: &[Token<'a>]) -> Result<(Vec<Token<'a>>, usize), usize> {
        let lines = self.lines;
        let mut out = Vec::new();

        for token in first {
            if token.kind == TokenKind::RBrace {
                return Ok((out, line));
            }
            out.push(*token);
        }
        for (k, next) in lines.iter().enumerate().skip(line + 1) {
            let tokens = tokenize(&next.code);
            if starts_definition(&tokens, self.options) {
                return Err(k);
            }
            for token in tokens {
                if token.kind == TokenKind::RBrace {
                    return Ok((out, k));
                }
                out.push(token);
            }
        }
        Err(lines.len())
    }

    /// Push the implied symbols of a value, then the symbol itself.
    fn emit(&mut self, name: &str, value: OidValue, description: String, line: usize) {
        let location = self.location(line);
        for arc in value.implied {
            if is_value_name(&arc.name) {
                self.symbols
                    .push(Symbol::implicit(arc.name, arc.parent, arc.id).at(location.clone()));
            } else {
                self.warn(
                    line,
                    format!("discarded degenerate implied name `{}` in `{name}`", arc.name),
                );
            }
        }
        self.symbols.push(
            Symbol::new(name, value.parent, value.id)
                .with_description(description)
                .at(location),
        );
    }

    fn location(&self, index: usize) -> Location {
        Location {
            source: self.source.map(String::from),
            line: self.lines.get(index).map_or(index + 1, |l| l.number),
        }
    }

    fn warn(&mut self, index: usize, message: String) {
        let location = self.location(index);
        self.diagnostics.push(Diagnostic::warning(location, message));
    }

    fn malformed_value(&mut self, name: &str, index: usize, reason: String) -> Result<(), ScanError> {
        match self.options.strictness {
            Strictness::Strict => Err(ScanError::MalformedOidValue {
                name: name.into(),
                location: self.location(index),
                reason,
            }),
            Strictness::Lenient => {
                self.warn(index, format!("skipped `{name}`: malformed OID value: {reason}"));
                Ok(())
            }
        }
    }
}
