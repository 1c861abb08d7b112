//! The `borca switchbox` command: generates one switch box in isolation.

use borca_arch::grid::{horizontal_wire_name, vertical_wire_name, ROUTING};
use borca_arch::{
    build_switch_box, ArchContext, ArchError, ArchResult, DeclRecorder, PipDump, SwitchBox,
    SwitchBoxKind, WireDecl,
};
use borca_common::Ident;
use borca_config::SwitchBoxConfig;
use borca_diagnostics::DiagnosticSink;

use crate::pipeline::{current_config, render_diagnostics};
use crate::{GlobalArgs, ReportFormat, SwitchboxArgs};

/// Runs the `switchbox` command.
pub fn run(args: &SwitchboxArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = current_config(global)?;
    let mut sb_config = config.switchbox.clone();
    if let Some(wires) = args.wires {
        sb_config.wires_per_side = wires;
        sb_config.horizontal_wires_per_side = None;
    }

    if !global.quiet {
        eprintln!(
            "   Generating switch box at x{}y{} ({} wires per side)",
            args.x, args.y, sb_config.wires_per_side
        );
    }

    let sink = DiagnosticSink::new();
    let mut ctx = DeclRecorder::new();
    let result = generate(&mut ctx, args.x, args.y, &sb_config);
    if let Err(ref e) = result {
        sink.emit(e.to_diagnostic());
    }
    let errors = render_diagnostics(&sink, global);
    if errors > 0 {
        return Ok(1);
    }

    let pips: Vec<PipDump> = ctx.pips().iter().map(|p| ctx.resolve_pip(p)).collect();
    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&pips)?),
        ReportFormat::Text => {
            for pip in &pips {
                println!(
                    "{:<24} {:>10} -> {:<10} {}",
                    pip.name, pip.src_wire, pip.dst_wire, pip.pip_type
                );
            }
            if !global.quiet {
                eprintln!("    Finished {} pips", pips.len());
            }
        }
    }
    Ok(0)
}

/// Declares the four side wires of box `(x, y)` and the box itself.
///
/// Side wires use the grid channel names so the output matches what
/// `borca grid` declares for the same tile.
fn generate(ctx: &mut DeclRecorder, x: u32, y: u32, config: &SwitchBoxConfig) -> ArchResult<usize> {
    let (Some(next_x), Some(next_y)) = (x.checked_add(1), y.checked_add(1)) else {
        return Err(ArchError::CoordinateOverflow { x, y });
    };
    let vertical = config.wires_per_side;
    let horizontal = config.horizontal_wires();
    let north = side(ctx, vertical_wire_name, x, next_y, vertical)?;
    let east = side(ctx, horizontal_wire_name, next_x, y, horizontal)?;
    let south = side(ctx, vertical_wire_name, x, y, vertical)?;
    let west = side(ctx, horizontal_wire_name, x, y, horizontal)?;
    let sb = SwitchBox {
        x,
        y,
        kind: SwitchBoxKind::from(config.kind),
        north,
        east,
        south,
        west,
    };
    let delay = ctx.delay_from_ns(config.pip_delay_ns);
    build_switch_box(ctx, &sb, delay)
}

fn side(
    ctx: &mut DeclRecorder,
    name: fn(u32, u32, u32) -> String,
    x: u32,
    y: u32,
    count: u32,
) -> ArchResult<Vec<Ident>> {
    let wire_type = ctx.id(ROUTING);
    let mut wires = Vec::with_capacity(count as usize);
    for i in 0..count {
        let wire = ctx.id(&name(x, y, i));
        ctx.add_wire(WireDecl {
            name: wire,
            wire_type,
            x,
            y,
        })?;
        wires.push(wire);
    }
    Ok(wires)
}

#[cfg(test)]
mod tests {
    use super::*;
    use borca_arch::expected_pip_count;
    use borca_config::SwitchBoxShape;

    #[test]
    fn generates_expected_pips() {
        let mut ctx = DeclRecorder::new();
        let config = SwitchBoxConfig::default();
        let count = generate(&mut ctx, 1, 2, &config).unwrap();
        assert_eq!(count, expected_pip_count(4));
        assert_eq!(ctx.counts().wires, 16);

        let pip = ctx.pip("sq_usb_x1y2ne0").unwrap();
        let dump = ctx.resolve_pip(pip);
        assert_eq!(dump.src_wire, "V_X1Y3_0");
        assert_eq!(dump.dst_wire, "H_X2Y2_1");
    }

    #[test]
    fn odd_wire_count() {
        let mut ctx = DeclRecorder::new();
        let config = SwitchBoxConfig {
            wires_per_side: 3,
            ..SwitchBoxConfig::default()
        };
        assert_eq!(generate(&mut ctx, 0, 0, &config).unwrap(), 36);
    }

    #[test]
    fn edge_coordinates_rejected() {
        let mut ctx = DeclRecorder::new();
        let config = SwitchBoxConfig::default();
        let err = generate(&mut ctx, u32::MAX, 0, &config).unwrap_err();
        assert_eq!(err, ArchError::CoordinateOverflow { x: u32::MAX, y: 0 });
        let err = generate(&mut ctx, 0, u32::MAX, &config).unwrap_err();
        assert_eq!(err, ArchError::CoordinateOverflow { x: 0, y: u32::MAX });
        assert_eq!(ctx.counts().wires, 0);
    }

    #[test]
    fn rectangular_not_supported() {
        let mut ctx = DeclRecorder::new();
        let config = SwitchBoxConfig {
            kind: SwitchBoxShape::Rectangular,
            horizontal_wires_per_side: Some(2),
            ..SwitchBoxConfig::default()
        };
        let err = generate(&mut ctx, 0, 0, &config).unwrap_err();
        assert!(matches!(err, ArchError::NotImplemented(_)));
        assert!(ctx.pips().is_empty());
    }
}
