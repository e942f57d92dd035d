use std::f64::consts::TAU;

use ratatui::style::Color;

use crate::reports::CategoryTotal;

/// Pastel rainbow gradient: pink -> peach -> yellow -> mint -> cyan -> lavender -> magenta -> pink
pub const GRADIENT: &[(f64, f64, f64)] = &[
    (255.0, 179.0, 186.0), // #ffb3ba soft pink
    (255.0, 200.0, 162.0), // #ffc8a2 peach
    (255.0, 224.0, 163.0), // #ffe0a3 pastel yellow
    (201.0, 255.0, 203.0), // #c9ffcb mint
    (186.0, 225.0, 255.0), // #bae1ff pastel cyan
    (196.0, 183.0, 255.0), // #c4b7ff lavender
    (255.0, 179.0, 222.0), // #ffb3de soft magenta
    (255.0, 179.0, 186.0), // #ffb3ba wrap back to pink
];

/// Interpolate along the gradient for a position in 0.0..1.0
pub fn gradient_color(t: f64) -> Color {
    let t = t.rem_euclid(1.0);
    let segments = (GRADIENT.len() - 1) as f64;
    let scaled = t * segments;
    let idx = (scaled as usize).min(GRADIENT.len() - 2);
    let frac = scaled - idx as f64;

    let (r1, g1, b1) = GRADIENT[idx];
    let (r2, g2, b2) = GRADIENT[idx + 1];

    let r = (r1 + (r2 - r1) * frac) as u8;
    let g = (g1 + (g2 - g1) * frac) as u8;
    let b = (b1 + (b2 - b1) * frac) as u8;

    Color::Rgb(r, g, b)
}

/// Color for the `idx`-th of `count` categories, spread evenly over the
/// gradient so neighbours stay distinguishable.
pub fn slice_color(idx: usize, count: usize) -> Color {
    if count == 0 {
        return gradient_color(0.0);
    }
    gradient_color(idx as f64 / count as f64)
}

pub struct PieSlice {
    pub color: Color,
    /// Points inside the unit circle covered by this slice, in canvas
    /// coordinates (-1.0..1.0 on both axes).
    pub points: Vec<(f64, f64)>,
}

/// Split the unit disc into one slice per positive category total, starting
/// at twelve o'clock and running clockwise. Categories that sum to zero or
/// less have no meaningful area and are left out.
pub fn pie_slices(totals: &[CategoryTotal], resolution: usize) -> Vec<PieSlice> {
    let positive: Vec<(usize, &CategoryTotal)> = totals
        .iter()
        .enumerate()
        .filter(|(_, c)| c.total > 0.0)
        .collect();
    let sum: f64 = positive.iter().map(|(_, c)| c.total).sum();
    if positive.is_empty() || sum <= 0.0 {
        return Vec::new();
    }

    // Cumulative upper bound of each slice, as a fraction of a full turn.
    let mut bounds = Vec::with_capacity(positive.len());
    let mut acc = 0.0;
    for (_, c) in &positive {
        acc += c.total / sum;
        bounds.push(acc);
    }

    let mut slices: Vec<PieSlice> = positive
        .iter()
        .map(|(idx, _)| PieSlice {
            color: slice_color(*idx, totals.len()),
            points: Vec::new(),
        })
        .collect();

    let step = 2.0 / resolution.max(1) as f64;
    for i in 0..resolution {
        for j in 0..resolution {
            let x = -1.0 + step * (i as f64 + 0.5);
            let y = -1.0 + step * (j as f64 + 0.5);
            if x * x + y * y > 1.0 {
                continue;
            }
            let angle = x.atan2(y).rem_euclid(TAU) / TAU;
            let slot = bounds
                .iter()
                .position(|b| angle < *b)
                .unwrap_or(slices.len() - 1);
            slices[slot].points.push((x, y));
        }
    }

    slices
}
