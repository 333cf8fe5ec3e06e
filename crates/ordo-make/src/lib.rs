#![forbid(unsafe_code)]
//! ordo-make: incremental, timestamp-driven builds over a dependency graph.
//!
//! # Conventions
//!
//! - **Errors**: library seams return [`MakeError`]. Text input problems are
//!   [`ParseError`]s collected next to the parsed result, never raised.
//!   [`run`] and [`load_config`] return [`anyhow::Result`] with context.
//! - **Logging**: `tracing`. Diagnostics are logged at `warn`, parse
//!   errors at `error`, build summaries at `info`.
//! - **Output**: commands go to a caller-supplied [`std::io::Write`] sink,
//!   one per line. Nothing is executed.
//!
//! # Modules
//!
//! - [`rule`]: one target and its build state.
//! - [`parse`]: makefile and ages text formats.
//! - [`maker`]: the build engine.
//! - [`config`]: `ordo.toml` settings.
//! - [`diagnostics`]: non-fatal build conditions.
//! - [`error`]: error types and stable codes.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod maker;
pub mod parse;
pub mod rule;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::error;

pub use config::{MakeConfig, load_config};
pub use diagnostics::Diagnostic;
pub use error::{ErrorCode, MakeError};
pub use maker::{BuildReport, Maker};
pub use parse::{Ages, Makefile, ParseError, ParseErrorKind, RuleDecl, parse_ages, parse_makefile};
pub use rule::{Rule, Time};

/// Parse `makefile_text` and `ages_text`, then build each of `targets` in
/// order, or the default target when `targets` is empty.
///
/// Parse errors are logged and otherwise ignored; the well-formed rules are
/// still built. The reports of all targets are merged.
///
/// # Errors
///
/// Returns an error on duplicate command sets, when there is nothing to
/// build, or when writing to `out` fails.
pub fn run<S, W>(
    makefile_text: &str,
    ages_text: &str,
    targets: &[S],
    config: MakeConfig,
    out: &mut W,
) -> Result<BuildReport>
where
    S: AsRef<str>,
    W: Write + ?Sized,
{
    let makefile = parse_makefile(makefile_text);
    let ages = parse_ages(ages_text);
    for err in makefile.errors.iter().chain(&ages.errors) {
        error!(code = %err.kind.code(), "{err}");
    }

    let mut maker = Maker::with_config(ages, config);
    maker
        .load(&makefile)
        .context("Failed to load makefile rules")?;

    if targets.is_empty() {
        return maker
            .build_default(out)
            .context("Failed to build the default target");
    }

    let mut report = BuildReport::default();
    for target in targets {
        let target = target.as_ref();
        let built = maker
            .build(target, out)
            .with_context(|| format!("Failed to build {target}"))?;
        report.merge(built);
    }
    Ok(report)
}
