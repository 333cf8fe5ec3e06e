//! Non-fatal conditions noticed while rebuilding.
//!
//! These do not stop a build. Each one is logged at `warn` level when it is
//! raised and collected into the [`BuildReport`](crate::BuildReport).

use std::fmt;

use tracing::warn;

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `target` was about to be rebuilt while `dependency` was still
    /// unfinished. Only possible through a dependency cycle.
    UnfinishedDependency { target: String, dependency: String },
    /// `target` is out of date but has no commands to bring it up to date.
    MissingCommands { target: String },
}

impl Diagnostic {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnfinishedDependency { .. } => ErrorCode::UnfinishedDependency,
            Self::MissingCommands { .. } => ErrorCode::MissingCommands,
        }
    }

    /// The target being rebuilt when this was raised.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::UnfinishedDependency { target, .. } | Self::MissingCommands { target } => target,
        }
    }

    pub(crate) fn emit(&self) {
        warn!(code = %self.code(), rule = %self.target(), "{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnfinishedDependency { target, dependency } => {
                write!(f, "{dependency} is not built before {target}")
            }
            Self::MissingCommands { target } => {
                write!(f, "{target} needs to be rebuilt, but has no commands")
            }
        }
    }
}
