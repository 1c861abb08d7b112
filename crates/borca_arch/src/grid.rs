//! Whole-device construction: tiles, routing channels, and switch boxes.

use crate::context::ArchContext;
use crate::error::ArchResult;
use crate::switchbox::{build_switch_box, SwitchBox, SwitchBoxKind};
use crate::tile::build_tile;
use crate::types::WireDecl;
use borca_common::Ident;
use borca_config::{ArchConfig, SwitchBoxConfig};
use borca_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};

/// Wire type tag of routing channel wires.
pub const ROUTING: &str = "ROUTING";

/// Name of vertical channel wire `i` entering row `y` of column `x` from below.
pub fn vertical_wire_name(x: u32, y: u32, i: u32) -> String {
    format!("V_X{x}Y{y}_{i}")
}

/// Name of horizontal channel wire `i` entering column `x` of row `y` from the left.
pub fn horizontal_wire_name(x: u32, y: u32, i: u32) -> String {
    format!("H_X{x}Y{y}_{i}")
}

/// What [`build_grid`] declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSummary {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Bels across all tiles.
    pub bels: usize,
    /// Bel pin wires across all tiles.
    pub bel_wires: usize,
    /// Routing channel wires.
    pub channel_wires: usize,
    /// Switch-box pips.
    pub pips: usize,
}

fn progress(sink: &DiagnosticSink, message: String) {
    sink.emit(Diagnostic::note(DiagnosticCode::new(Category::Info, 1), message));
}

fn channel<C: ArchContext + ?Sized>(
    ctx: &C,
    name: fn(u32, u32, u32) -> String,
    x: u32,
    y: u32,
    count: u32,
) -> Vec<Ident> {
    (0..count).map(|i| ctx.id(&name(x, y, i))).collect()
}

fn report<T>(sink: &DiagnosticSink, result: ArchResult<T>) -> ArchResult<T> {
    result.inspect_err(|e| sink.emit(e.to_diagnostic()))
}

/// Declares the whole device grid through `ctx`.
///
/// Every tile is declared first, then the channel wires, then one switch box
/// per tile. Box `(x, y)` takes its north side from the vertical channel at
/// `(x, y + 1)`, south from `(x, y)`, east from the horizontal channel at
/// `(x + 1, y)` and west from `(x, y)`, so adjacent boxes share wires.
///
/// Errors are emitted into `sink` and returned.
pub fn build_grid<C: ArchContext + ?Sized>(
    ctx: &mut C,
    arch: &ArchConfig,
    switchbox: &SwitchBoxConfig,
    sink: &DiagnosticSink,
) -> ArchResult<GridSummary> {
    let (width, height) = (arch.grid_x, arch.grid_y);
    let mut summary = GridSummary {
        width,
        height,
        ..GridSummary::default()
    };

    progress(sink, format!("Declaring {width}x{height} logic tiles.."));
    for x in 0..width {
        for y in 0..height {
            let counts = report(sink, build_tile(ctx, x, y))?;
            summary.bels += counts.bels;
            summary.bel_wires += counts.wires;
        }
    }

    progress(sink, "Declaring routing channels..".to_string());
    let routing = ctx.id(ROUTING);
    let vertical = switchbox.wires_per_side;
    let horizontal = switchbox.horizontal_wires();
    let last_x = width.saturating_sub(1);
    let last_y = height.saturating_sub(1);
    for x in 0..width {
        for y in 0..=height {
            for i in 0..vertical {
                let name = ctx.id(&vertical_wire_name(x, y, i));
                let decl = WireDecl {
                    name,
                    wire_type: routing,
                    x,
                    y: y.min(last_y),
                };
                report(sink, ctx.add_wire(decl))?;
                summary.channel_wires += 1;
            }
        }
    }
    for y in 0..height {
        for x in 0..=width {
            for i in 0..horizontal {
                let name = ctx.id(&horizontal_wire_name(x, y, i));
                let decl = WireDecl {
                    name,
                    wire_type: routing,
                    x: x.min(last_x),
                    y,
                };
                report(sink, ctx.add_wire(decl))?;
                summary.channel_wires += 1;
            }
        }
    }

    progress(sink, "Declaring switch boxes..".to_string());
    let kind = SwitchBoxKind::from(switchbox.kind);
    let delay = ctx.delay_from_ns(switchbox.pip_delay_ns);
    for x in 0..width {
        for y in 0..height {
            let sb = SwitchBox {
                x,
                y,
                kind,
                north: channel(ctx, vertical_wire_name, x, y + 1, vertical),
                east: channel(ctx, horizontal_wire_name, x + 1, y, horizontal),
                south: channel(ctx, vertical_wire_name, x, y, vertical),
                west: channel(ctx, horizontal_wire_name, x, y, horizontal),
            };
            summary.pips += report(sink, build_switch_box(ctx, &sb, delay))?;
        }
    }

    progress(
        sink,
        format!(
            "Declared {} bels, {} wires, {} pips.",
            summary.bels,
            summary.bel_wires + summary.channel_wires,
            summary.pips
        ),
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchError;
    use crate::recorder::DeclRecorder;
    use crate::switchbox::expected_pip_count;
    use borca_config::SwitchBoxShape;
    use borca_diagnostics::Severity;

    fn arch(x: u32, y: u32) -> ArchConfig {
        ArchConfig {
            lut_k: 4,
            grid_x: x,
            grid_y: y,
        }
    }

    #[test]
    fn small_grid_counts() {
        let mut ctx = DeclRecorder::new();
        let sink = DiagnosticSink::new();
        let sb = SwitchBoxConfig::default();
        let summary = build_grid(&mut ctx, &arch(2, 3), &sb, &sink).unwrap();

        assert_eq!(summary.bels, 2 * 3 * 20);
        assert_eq!(summary.bel_wires, 2 * 3 * 106);
        // 2 columns x 4 boundaries x 4 wires + 3 rows x 3 boundaries x 4 wires
        assert_eq!(summary.channel_wires, 32 + 36);
        assert_eq!(summary.pips, 6 * expected_pip_count(4));
        assert_eq!(ctx.pips().len(), summary.pips);
        assert_eq!(ctx.grid_dims(), (2, 3));
        assert!(!sink.has_errors());
        assert!(sink.count(Severity::Note) >= 3);
    }

    #[test]
    fn adjacent_boxes_share_channel() {
        let mut ctx = DeclRecorder::new();
        let sink = DiagnosticSink::new();
        let sb = SwitchBoxConfig {
            wires_per_side: 2,
            ..SwitchBoxConfig::default()
        };
        build_grid(&mut ctx, &arch(1, 2), &sb, &sink).unwrap();

        let shared = ctx.id(&vertical_wire_name(0, 1, 0));
        let users: Vec<String> = ctx
            .pips_downhill(shared)
            .map(|p| ctx.resolve_pip(p).name)
            .collect();
        assert!(users.iter().any(|n| n.starts_with("sq_usb_x0y0")));
        assert!(users.iter().any(|n| n.starts_with("sq_usb_x0y1")));
    }

    #[test]
    fn edge_wires_clamped_to_grid() {
        let mut ctx = DeclRecorder::new();
        let sink = DiagnosticSink::new();
        build_grid(&mut ctx, &arch(2, 2), &SwitchBoxConfig::default(), &sink).unwrap();
        let top = ctx.wire(&vertical_wire_name(1, 2, 0)).unwrap();
        assert_eq!((top.x, top.y), (1, 1));
        let right = ctx.wire(&horizontal_wire_name(2, 0, 3)).unwrap();
        assert_eq!((right.x, right.y), (1, 0));
    }

    #[test]
    fn square_box_with_uneven_channels_reports_error() {
        let mut ctx = DeclRecorder::new();
        let sink = DiagnosticSink::new();
        let sb = SwitchBoxConfig {
            wires_per_side: 4,
            horizontal_wires_per_side: Some(2),
            ..SwitchBoxConfig::default()
        };
        let err = build_grid(&mut ctx, &arch(1, 1), &sb, &sink).unwrap_err();
        assert!(matches!(err, ArchError::WireCountMismatch { .. }));
        assert!(ctx.pips().is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn rectangular_box_reports_not_implemented() {
        let mut ctx = DeclRecorder::new();
        let sink = DiagnosticSink::new();
        let sb = SwitchBoxConfig {
            kind: SwitchBoxShape::Rectangular,
            wires_per_side: 4,
            horizontal_wires_per_side: Some(2),
            ..SwitchBoxConfig::default()
        };
        let err = build_grid(&mut ctx, &arch(1, 1), &sb, &sink).unwrap_err();
        assert!(matches!(err, ArchError::NotImplemented(_)));
        let diags = sink.take_all();
        let error = diags.iter().find(|d| d.severity.is_error()).unwrap();
        assert_eq!(error.code.to_string(), "A102");
    }
}
