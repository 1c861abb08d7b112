//! Borca CLI: the command-line front end of the Borca architecture toolkit.
//!
//! Provides `borca switchbox` to generate a single universal switch box,
//! `borca grid` to declare the whole device, `borca params` to print the FASM
//! parameter table, and `borca pack` to pack a JSON netlist.

#![warn(missing_docs)]

mod grid;
mod pack;
mod params;
mod pipeline;
mod switchbox;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Borca: architecture tooling for the Borca FPGA.
#[derive(Parser, Debug)]
#[command(name = "borca", version, about = "Borca FPGA architecture toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show progress notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `borca.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the pips of one switch box.
    Switchbox(SwitchboxArgs),
    /// Declare every tile, channel and switch box of the device.
    Grid(GridArgs),
    /// Print the FASM parameter table.
    Params(ParamsArgs),
    /// Pack a JSON netlist into Borca cells.
    Pack(PackArgs),
}

/// Arguments for `borca switchbox`.
#[derive(Parser, Debug)]
pub struct SwitchboxArgs {
    /// Tile column of the box.
    #[arg(long, default_value_t = 0)]
    pub x: u32,

    /// Tile row of the box.
    #[arg(long, default_value_t = 0)]
    pub y: u32,

    /// Wires per side (overrides `switchbox.wires_per_side`).
    #[arg(short, long)]
    pub wires: Option<u32>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `borca grid`.
#[derive(Parser, Debug)]
pub struct GridArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `borca params`.
#[derive(Parser, Debug)]
pub struct ParamsArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `borca pack`.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Input netlist (JSON).
    pub netlist: String,

    /// Output path; the packed netlist goes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print progress notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or its directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Switchbox(ref args) => switchbox::run(args, &global),
        Command::Grid(ref args) => grid::run(args, &global),
        Command::Params(ref args) => params::run(args, &global),
        Command::Pack(ref args) => pack::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection from the `TERM` variable.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_switchbox_default() {
        let cli = Cli::parse_from(["borca", "switchbox"]);
        match cli.command {
            Command::Switchbox(ref args) => {
                assert_eq!((args.x, args.y), (0, 0));
                assert!(args.wires.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Switchbox command"),
        }
    }

    #[test]
    fn parse_switchbox_with_args() {
        let cli = Cli::parse_from([
            "borca",
            "switchbox",
            "--x",
            "3",
            "--y",
            "5",
            "--wires",
            "6",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Switchbox(ref args) => {
                assert_eq!((args.x, args.y), (3, 5));
                assert_eq!(args.wires, Some(6));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Switchbox command"),
        }
    }

    #[test]
    fn parse_grid_json() {
        let cli = Cli::parse_from(["borca", "grid", "-f", "json"]);
        match cli.command {
            Command::Grid(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Grid command"),
        }
    }

    #[test]
    fn parse_params() {
        let cli = Cli::parse_from(["borca", "params"]);
        assert!(matches!(cli.command, Command::Params(_)));
    }

    #[test]
    fn parse_pack_with_output() {
        let cli = Cli::parse_from(["borca", "pack", "design.json", "-o", "packed.json"]);
        match cli.command {
            Command::Pack(ref args) => {
                assert_eq!(args.netlist, "design.json");
                assert_eq!(args.output.as_deref(), Some("packed.json"));
            }
            _ => panic!("expected Pack command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["borca", "--quiet", "--color", "never", "grid"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["borca", "--config", "/path/to/borca.toml", "params"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/borca.toml"));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["borca", "grid", "--verbose"]);
        assert!(cli.verbose);
    }
}
