//! The `borca grid` command: declares the full device and reports it.

use borca_arch::{build_grid, DeclRecorder, GridSummary};
use borca_diagnostics::DiagnosticSink;

use crate::pipeline::{current_config, render_diagnostics};
use crate::{GlobalArgs, GridArgs, ReportFormat};

/// Runs the `grid` command.
///
/// Text output is the [`GridSummary`]; JSON output is the complete
/// resolved declaration dump.
pub fn run(args: &GridArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = current_config(global)?;
    if !global.quiet {
        eprintln!(
            "   Declaring {}x{} grid",
            config.arch.grid_x, config.arch.grid_y
        );
    }

    let sink = DiagnosticSink::new();
    let mut ctx = DeclRecorder::new();
    let summary = build_grid(&mut ctx, &config.arch, &config.switchbox, &sink).ok();
    let errors = render_diagnostics(&sink, global);
    let Some(summary) = summary.filter(|_| errors == 0) else {
        return Ok(1);
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx.dump())?),
        ReportFormat::Text => print!("{}", format_summary(&summary)),
    }
    Ok(0)
}

fn format_summary(summary: &GridSummary) -> String {
    format!(
        "grid:          {}x{}\nbels:          {}\nbel wires:     {}\nchannel wires: {}\npips:          {}\n",
        summary.width,
        summary.height,
        summary.bels,
        summary.bel_wires,
        summary.channel_wires,
        summary.pips
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_text() {
        let summary = GridSummary {
            width: 2,
            height: 1,
            bels: 40,
            bel_wires: 212,
            channel_wires: 20,
            pips: 192,
        };
        let text = format_summary(&summary);
        assert!(text.starts_with("grid:          2x1\n"));
        assert!(text.contains("pips:          192\n"));
    }
}
