//! The `borca params` command: prints the FASM parameter table.

use borca_bitstream::ParamMap;
use borca_diagnostics::DiagnosticSink;
use serde::Serialize;

use crate::pipeline::{current_config, render_diagnostics};
use crate::{GlobalArgs, ParamsArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct ParamRow<'a> {
    cell_type: &'a str,
    parameter: &'a str,
    write: bool,
    numeric: bool,
    width: Option<u32>,
}

/// Runs the `params` command.
pub fn run(args: &ParamsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = current_config(global)?;
    let sink = DiagnosticSink::new();
    let map = match ParamMap::from_config(&config.bitstream, config.arch.lut_k) {
        Ok(map) => map,
        Err(e) => {
            sink.emit(e.to_diagnostic());
            render_diagnostics(&sink, global);
            return Ok(1);
        }
    };

    match args.format {
        ReportFormat::Json => {
            let rows: Vec<ParamRow<'_>> = map
                .iter()
                .map(|(key, cfg)| ParamRow {
                    cell_type: &key.cell_type,
                    parameter: &key.parameter,
                    write: cfg.write,
                    numeric: cfg.numeric,
                    width: cfg.width,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ReportFormat::Text => print!("{}", format_table(&map)),
    }
    Ok(0)
}

fn format_table(map: &ParamMap) -> String {
    let mut out = String::new();
    for (key, cfg) in map.iter() {
        out.push_str(&format!("{:<24} {cfg}\n", key.to_string()));
    }
    out
}
