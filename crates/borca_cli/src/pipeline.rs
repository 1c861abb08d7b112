//! Shared helpers for the `borca` subcommands.
//!
//! Config lookup and diagnostic rendering live here so every command treats
//! `--config`, `--quiet` and `--verbose` the same way.

use std::path::{Path, PathBuf};

use borca_config::{load_config, BorcaConfig, CONFIG_FILE_NAME};
use borca_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};

use crate::GlobalArgs;

/// Loads the configuration the command should run with.
///
/// `--config` may name a file or a directory holding `borca.toml`. Without it,
/// `borca.toml` in `dir` is used when present and the built-in defaults
/// otherwise.
pub fn load_project_config(
    global: &GlobalArgs,
    dir: &Path,
) -> Result<BorcaConfig, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        return Ok(load_config(&PathBuf::from(config_path))?);
    }
    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        Ok(load_config(&candidate)?)
    } else {
        Ok(BorcaConfig::default())
    }
}

/// Loads the configuration relative to the current directory.
pub fn current_config(global: &GlobalArgs) -> Result<BorcaConfig, Box<dyn std::error::Error>> {
    load_project_config(global, &std::env::current_dir()?)
}

/// Whether a diagnostic of `severity` is shown under the given flags.
///
/// Errors always show; warnings unless `--quiet`; notes only with `--verbose`.
pub fn is_shown(severity: Severity, global: &GlobalArgs) -> bool {
    match severity {
        Severity::Error => true,
        Severity::Warning | Severity::Help => !global.quiet,
        Severity::Note => global.verbose && !global.quiet,
    }
}

/// Renders the visible diagnostics from a sink to stderr.
///
/// Returns the number of errors in the sink.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if is_shown(diag.severity, global) {
            eprint!("{}", renderer.render(&diag));
        }
    }
    sink.error_count()
}
