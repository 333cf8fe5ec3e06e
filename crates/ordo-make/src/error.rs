use std::fmt;
use std::io;

use ordo_graph::GraphError;

/// Fatal failures of the build engine.
#[derive(Debug, thiserror::Error)]
pub enum MakeError {
    #[error("target '{target}' already has a non-empty command set")]
    DuplicateCommands { target: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to write build output: {0}")]
    Io(#[from] io::Error),

    #[error("no target to build: the makefile declares no rules")]
    NoTargets,
}

impl MakeError {
    /// The stable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateCommands { .. } => ErrorCode::DuplicateCommands,
            Self::Graph(_) => ErrorCode::InternalUnexpected,
            Self::Io(_) => ErrorCode::OutputWriteFailed,
            Self::NoTargets => ErrorCode::NoTargets,
        }
    }
}

/// Machine-readable codes for build failures and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    BadTarget,
    BadPrerequisites,
    ErroneousLine,
    MalformedAges,
    DuplicateCommands,
    NoTargets,
    UnfinishedDependency,
    MissingCommands,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`M####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "M1001",
            Self::BadTarget => "M2001",
            Self::BadPrerequisites => "M2002",
            Self::ErroneousLine => "M2003",
            Self::MalformedAges => "M2004",
            Self::DuplicateCommands => "M3001",
            Self::NoTargets => "M3002",
            Self::UnfinishedDependency => "M4001",
            Self::MissingCommands => "M4002",
            Self::OutputWriteFailed => "M5001",
            Self::InternalUnexpected => "M9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::BadTarget => "Bad target name",
            Self::BadPrerequisites => "Bad prerequisites",
            Self::ErroneousLine => "Erroneous input line",
            Self::MalformedAges => "Malformed ages input",
            Self::DuplicateCommands => "Duplicate command set",
            Self::NoTargets => "Nothing to build",
            Self::UnfinishedDependency => "Dependency not built",
            Self::MissingCommands => "Out-of-date target has no commands",
            Self::OutputWriteFailed => "Build output write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::BadTarget => Some("Target names may not contain blanks, ':', '=', '#' or '\\'."),
            Self::BadPrerequisites => Some("Prerequisites may not contain ':', '=', '#' or '\\'."),
            Self::ErroneousLine => {
                Some("Commands must be indented and follow a 'TARGET: DEPS' header.")
            }
            Self::MalformedAges => {
                Some("Start with the current time, then list 'name time' pairs.")
            }
            Self::DuplicateCommands => {
                Some("Give each target its commands in exactly one rule.")
            }
            Self::NoTargets => Some("Declare a rule or pass an explicit target."),
            Self::UnfinishedDependency => {
                Some("The dependency graph probably has a cycle through this target.")
            }
            Self::MissingCommands => Some("Add commands to the rule or provide an age for it."),
            Self::OutputWriteFailed => Some("Check that the output sink is still writable."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::BadTarget,
            ErrorCode::BadPrerequisites,
            ErrorCode::ErroneousLine,
            ErrorCode::MalformedAges,
            ErrorCode::DuplicateCommands,
            ErrorCode::NoTargets,
            ErrorCode::UnfinishedDependency,
            ErrorCode::MissingCommands,
            ErrorCode::OutputWriteFailed,
            ErrorCode::InternalUnexpected,
        ];
        let codes: HashSet<_> = all.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), all.len());
        assert!(all.iter().all(|c| !c.message().is_empty()));
    }

    #[test]
    fn graph_errors_convert() {
        let err: MakeError = GraphError::InvalidVertex(3).into();
        assert_eq!(err.to_string(), "vertex 3 is not in this graph");
        assert_eq!(err.code(), ErrorCode::InternalUnexpected);
    }

    #[test]
    fn duplicate_commands_names_target() {
        let err = MakeError::DuplicateCommands {
            target: "app".to_string(),
        };
        assert_eq!(err.to_string(), "target 'app' already has a non-empty command set");
        assert_eq!(err.code().to_string(), "M3001");
    }
}
