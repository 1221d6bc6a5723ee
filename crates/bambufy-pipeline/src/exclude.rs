//! First-layer bounding box and exclusion-zone declaration.
//!
//! The printer firmware lets an operator cancel a failed object by name; the
//! declaration built here registers the whole first layer as one excludable
//! object.

use serde::{Deserialize, Serialize};

use bambufy_core::error::{PreprintError, Result};

/// Axis-aligned bounding box over first-layer extrusion moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Format the box as an `EXCLUDE_OBJECT_DEFINE` declaration.
    ///
    /// Downstream firmware parses this string: polygon coordinates carry 6
    /// decimal places, the center 4. Fixed contract.
    pub fn exclude_object_define(&self) -> String {
        let (cx, cy) = self.center();
        format!(
            "EXCLUDE_OBJECT_DEFINE NAME=First_Layer CENTER={:.4},{:.4} \
             POLYGON=[[{:.6},{:.6}],[{:.6},{:.6}],[{:.6},{:.6}],[{:.6},{:.6}]]",
            cx,
            cy,
            self.min_x,
            self.min_y,
            self.max_x,
            self.min_y,
            self.max_x,
            self.max_y,
            self.min_x,
            self.max_y,
        )
    }
}

/// Compute the bounding box of all extrusion-producing moves.
///
/// A line qualifies when its command token starts a linear or arc motion
/// (`G1`/`G2`/`G3` prefix) and carries a strictly positive `E` word; travel
/// moves never distort the box. A move may omit `X` or `Y`; only the axes
/// present update their min/max. Returns `None` when no qualifying move
/// touched both axes.
pub fn first_layer_bounds(lines: &[String]) -> Result<Option<BoundingBox>> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for line in lines {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };
        if !(cmd.starts_with("G1") || cmd.starts_with("G2") || cmd.starts_with("G3")) {
            continue;
        }

        let mut x = None;
        let mut y = None;
        let mut e = None;
        for word in words {
            if let Some(value) = word.strip_prefix('X') {
                x = Some(parse_axis_value(value, "X")?);
            } else if let Some(value) = word.strip_prefix('Y') {
                y = Some(parse_axis_value(value, "Y")?);
            } else if let Some(value) = word.strip_prefix('E') {
                e = Some(parse_axis_value(value, "E")?);
            }
        }

        if !e.is_some_and(|e| e > 0.0) {
            continue;
        }
        if let Some(x) = x {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        if let Some(y) = y {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_x.is_infinite() || min_y.is_infinite() {
        return Ok(None);
    }
    Ok(Some(BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }))
}

fn parse_axis_value(value: &str, axis: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| PreprintError::InvalidNumber {
        token: value.to_string(),
        context: format!("{} word of a motion command", axis),
    })
}
