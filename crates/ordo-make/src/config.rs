use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ErrorCode;

/// Build engine settings, usually read from `ordo.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeConfig {
    /// Target built when none is requested. Falls back to the first rule.
    #[serde(default)]
    pub default_target: Option<String>,
    #[serde(default = "default_true")]
    pub warn_missing_commands: bool,
    #[serde(default = "default_true")]
    pub check_dependencies: bool,
    /// Emit commands without their leading indentation.
    #[serde(default)]
    pub strip_command_indent: bool,
}

impl Default for MakeConfig {
    fn default() -> Self {
        Self {
            default_target: None,
            warn_missing_commands: default_true(),
            check_dependencies: default_true(),
            strip_command_indent: false,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Load configuration from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not valid
/// TOML for [`MakeConfig`]. Parse failures carry
/// [`ErrorCode::ConfigParseError`] in their message.
pub fn load_config(path: &Path) -> Result<MakeConfig> {
    if !path.exists() {
        return Ok(MakeConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| {
        let code = ErrorCode::ConfigParseError;
        format!("{code}: Failed to parse {}: {}", path.display(), code.message())
    })
}
