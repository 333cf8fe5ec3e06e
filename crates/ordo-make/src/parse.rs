//! Text formats consumed by the build engine.
//!
//! # Makefile
//!
//! Line oriented. Each line is one of:
//!
//! - **ignored**: blank, or its first non-blank character is `#`;
//! - **header**: `TARGET : DEPS`, starting in column one. `TARGET` may not
//!   contain blanks, `:`, `=`, `#` or `\`; `DEPS` is a blank-separated list
//!   whose names may not contain `:`, `=`, `#` or `\`;
//! - **command**: any indented line after a header, kept verbatim (leading
//!   blanks included) as a command of that header's target.
//!
//! Anything else is an erroneous line. Errors are collected, never fatal:
//! parsing resumes on the next line. A header with a bad target or bad
//! prerequisites is dropped together with the command lines that follow it.
//!
//! # Ages
//!
//! Blank-separated tokens: an integer current time, then `NAME TIME` pairs.
//! A malformed pair is reported and skipped. A missing or non-integer
//! current time is reported and the current time defaults to 0; a
//! non-integer first token is then read as the first pair's name.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ErrorCode;
use crate::rule::Time;

const FORBIDDEN: [char; 4] = [':', '=', '#', '\\'];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A recoverable problem in makefile or ages text, with its 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("bad target: '{0}'")]
    BadTarget(String),

    #[error("one or more bad prerequisites: '{0}'")]
    BadPrerequisites(String),

    #[error("erroneous input line: '{0}'")]
    ErroneousLine(String),

    #[error("missing current time")]
    MissingCurrentTime,

    #[error("malformed age for '{target}': '{value}'")]
    MalformedAge { target: String, value: String },

    #[error("missing age for '{0}'")]
    MissingAge(String),
}

impl ParseErrorKind {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::BadTarget(_) => ErrorCode::BadTarget,
            Self::BadPrerequisites(_) => ErrorCode::BadPrerequisites,
            Self::ErroneousLine(_) => ErrorCode::ErroneousLine,
            Self::MissingCurrentTime | Self::MalformedAge { .. } | Self::MissingAge(_) => {
                ErrorCode::MalformedAges
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Makefile
// ---------------------------------------------------------------------------

/// One `TARGET : DEPS` header and the commands under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDecl {
    pub target: String,
    pub dependencies: Vec<String>,
    pub commands: Vec<String>,
    /// Line of the header.
    pub line: usize,
}

/// A parsed makefile: well-formed declarations in file order, plus every
/// error encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Makefile {
    pub rules: Vec<RuleDecl>,
    pub errors: Vec<ParseError>,
}

impl Makefile {
    /// Target of the first declaration, the conventional default goal.
    #[must_use]
    pub fn first_target(&self) -> Option<&str> {
        self.rules.first().map(|r| r.target.as_str())
    }
}

enum Current {
    /// Before the first header.
    None,
    Rule(RuleDecl),
    /// Under a rejected header; its commands are swallowed.
    Rejected,
}

/// Parse makefile text. Never fails; see the [module docs](self).
#[must_use]
pub fn parse_makefile(text: &str) -> Makefile {
    let mut out = Makefile::default();
    let mut current = Current::None;

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;

        if is_ignored(line) {
            continue;
        }

        if let Some((target, deps)) = split_header(line) {
            if let Current::Rule(decl) = std::mem::replace(&mut current, Current::Rejected) {
                out.rules.push(decl);
            }

            let mut ok = true;
            if target.contains(FORBIDDEN) {
                out.errors.push(ParseError {
                    line: lineno,
                    kind: ParseErrorKind::BadTarget(target.to_string()),
                });
                ok = false;
            }
            if deps.contains(FORBIDDEN) {
                out.errors.push(ParseError {
                    line: lineno,
                    kind: ParseErrorKind::BadPrerequisites(deps.to_string()),
                });
                ok = false;
            }
            if ok {
                current = Current::Rule(RuleDecl {
                    target: target.to_string(),
                    dependencies: deps.split_whitespace().map(str::to_string).collect(),
                    commands: Vec::new(),
                    line: lineno,
                });
            }
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        match &mut current {
            Current::Rule(decl) if indented => decl.commands.push(line.to_string()),
            Current::Rejected if indented => {}
            _ => out.errors.push(ParseError {
                line: lineno,
                kind: ParseErrorKind::ErroneousLine(line.to_string()),
            }),
        }
    }

    if let Current::Rule(decl) = current {
        out.rules.push(decl);
    }

    debug!(
        rules = out.rules.len(),
        errors = out.errors.len(),
        "parsed makefile"
    );
    out
}

fn is_ignored(line: &str) -> bool {
    let rest = line.trim_start();
    rest.is_empty() || rest.starts_with('#')
}

/// Split a header line into its target and trimmed dependency text.
///
/// The target runs from column one up to the first blank or `:`; after
/// optional blanks a `:` must follow.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let end = line
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    let (target, rest) = line.split_at(end);
    let deps = rest.trim_start().strip_prefix(':')?;
    Some((target, deps.trim()))
}

// ---------------------------------------------------------------------------
// Ages
// ---------------------------------------------------------------------------

/// The current time and the ages of the targets that already exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ages {
    pub current_time: Time,
    pub ages: HashMap<String, Time>,
    pub errors: Vec<ParseError>,
}

impl Ages {
    /// No existing targets, current time `current_time`.
    #[must_use]
    pub fn new(current_time: Time) -> Self {
        Self {
            current_time,
            ..Self::default()
        }
    }

    /// Builder-style [`Ages::insert`].
    #[must_use]
    pub fn with(mut self, target: impl Into<String>, time: Time) -> Self {
        self.insert(target, time);
        self
    }

    /// Record the age of `target`, replacing any earlier one.
    pub fn insert(&mut self, target: impl Into<String>, time: Time) {
        self.ages.insert(target.into(), time);
    }

    #[must_use]
    pub fn age(&self, target: &str) -> Option<Time> {
        self.ages.get(target).copied()
    }
}

/// Parse ages text. Never fails; see the [module docs](self).
#[must_use]
pub fn parse_ages(text: &str) -> Ages {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok)))
        .peekable();

    let mut out = Ages::default();
    match tokens.peek().map(|&(line, tok)| (line, tok.parse::<Time>())) {
        Some((_, Ok(time))) => {
            out.current_time = time;
            tokens.next();
        }
        Some((line, Err(_))) => out.errors.push(ParseError {
            line,
            kind: ParseErrorKind::MissingCurrentTime,
        }),
        None => out.errors.push(ParseError {
            line: 1,
            kind: ParseErrorKind::MissingCurrentTime,
        }),
    }

    while let Some((line, name)) = tokens.next() {
        let Some((_, value)) = tokens.next() else {
            out.errors.push(ParseError {
                line,
                kind: ParseErrorKind::MissingAge(name.to_string()),
            });
            break;
        };
        match value.parse::<Time>() {
            Ok(time) => out.insert(name, time),
            Err(_) => out.errors.push(ParseError {
                line,
                kind: ParseErrorKind::MalformedAge {
                    target: name.to_string(),
                    value: value.to_string(),
                },
            }),
        }
    }

    debug!(
        current_time = out.current_time,
        ages = out.ages.len(),
        errors = out.errors.len(),
        "parsed ages"
    );
    out
}
