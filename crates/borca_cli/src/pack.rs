//! The `borca pack` command: packs a JSON netlist.

use std::path::Path;

use borca_diagnostics::DiagnosticSink;
use borca_pack::{pack, Netlist, PackStages, PackSummary};

use crate::pipeline::{current_config, render_diagnostics};
use crate::{GlobalArgs, PackArgs};

/// Runs the `pack` command.
pub fn run(args: &PackArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = current_config(global)?;
    let mut netlist = read_netlist(Path::new(&args.netlist))?;

    if !global.quiet {
        eprintln!(
            "     Packing {} ({} cells, {} nets)",
            args.netlist,
            netlist.cells.len(),
            netlist.nets.len()
        );
    }

    let sink = DiagnosticSink::new();
    let stages = PackStages::from(&config.pack);
    let summary = pack(&mut netlist, config.arch.lut_k, stages, &sink).ok();
    let errors = render_diagnostics(&sink, global);
    let Some(summary) = summary.filter(|_| errors == 0) else {
        return Ok(1);
    };

    let json = serde_json::to_string_pretty(&netlist)?;
    match args.output {
        Some(ref out) => std::fs::write(out, json + "\n")?,
        None => println!("{json}"),
    }
    if !global.quiet {
        eprintln!("    Finished {}", describe(&summary));
    }
    Ok(0)
}

fn read_netlist(path: &Path) -> Result<Netlist, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    let netlist: Netlist = serde_json::from_str(&content)
        .map_err(|e| format!("invalid netlist '{}': {e}", path.display()))?;
    netlist.check_consistency()?;
    Ok(netlist)
}

fn describe(summary: &PackSummary) -> String {
    format!(
        "{} constants, {} LUTs, {} flip-flops, {} virtual IOs",
        summary.constants, summary.luts, summary.ffs, summary.virtual_io
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BUFFERED: &str = r#"{
        "cells": {
            "din": {
                "name": "din",
                "type": "$nextpnr_ibuf",
                "ports": {
                    "I": { "direction": "input", "net": "pad" },
                    "O": { "direction": "output", "net": "n_d" }
                }
            }
        },
        "nets": {
            "pad": { "name": "pad", "users": [{ "cell": "din", "port": "I" }] },
            "n_d": { "name": "n_d", "driver": { "cell": "din", "port": "O" } }
        }
    }"#;

    #[test]
    fn reads_valid_netlist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("design.json");
        fs::write(&path, BUFFERED).unwrap();
        let nl = read_netlist(&path).unwrap();
        assert_eq!(nl.cells.len(), 1);
        assert_eq!(nl.nets.len(), 2);
    }

    #[test]
    fn rejects_inconsistent_netlist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(
            &path,
            r#"{ "nets": { "n": { "name": "n", "driver": { "cell": "ghost", "port": "O" } } } }"#,
        )
        .unwrap();
        assert!(read_netlist(&path).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_netlist(&tmp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn summary_line() {
        let summary = PackSummary {
            virtual_io: 2,
            ..PackSummary::default()
        };
        assert_eq!(
            describe(&summary),
            "0 constants, 0 LUTs, 0 flip-flops, 2 virtual IOs"
        );
    }
}
