//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve, extended over the prediction horizon: `-`

use crate::domain::{GrowthObservation, ModelResult};
use crate::models::predict;

/// Render observations with a model's curve from the first observation to the
/// last predicted time point.
pub fn render_ascii_plot(observations: &[GrowthObservation], model: &ModelResult, width: usize, height: usize) -> String {
    let (t_lo, t_hi) = time_bounds(observations, model).unwrap_or((0.0, 1.0));
    let samples = curve_samples(model, t_lo, t_hi, width.max(10));

    let lengths = observations.iter().map(|o| o.length).chain(samples.iter().map(|&(_, y)| y));
    let (y_lo, y_hi) = bounds(lengths).unwrap_or((0.0, 1.0));
    let pad = ((y_hi - y_lo) * 0.05).max(1e-12);

    let mut canvas = Canvas::new(width.max(10), height.max(5), (t_lo, t_hi), (y_lo - pad, y_hi + pad));

    // Curve first; observations overwrite it.
    let cells: Vec<(usize, usize)> = samples.iter().map(|&(t, y)| canvas.cell(t, y)).collect();
    for pair in cells.windows(2) {
        canvas.line(pair[0], pair[1], '-');
    }
    if let [only] = cells.as_slice() {
        canvas.put(*only, '-');
    }
    for o in observations {
        let at = canvas.cell(o.time_point, o.length);
        canvas.put(at, 'o');
    }

    canvas.render()
}

fn time_bounds(observations: &[GrowthObservation], model: &ModelResult) -> Option<(f64, f64)> {
    let horizon_end = model.predictions.last().map(|p| p.time_point);
    bounds(observations.iter().map(|o| o.time_point).chain(horizon_end))
}

/// Finite, non-empty `(min, max)` of `values`.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

/// One sample per column, clamped at zero like the predictions.
/// Non-finite samples are dropped.
fn curve_samples(model: &ModelResult, t_lo: f64, t_hi: f64, columns: usize) -> Vec<(f64, f64)> {
    let last = (columns.max(2) - 1) as f64;
    (0..columns.max(2))
        .filter_map(|i| {
            let t = t_lo + (i as f64 / last) * (t_hi - t_lo);
            let y = predict(&model.curve, t);
            y.is_finite().then_some((t, y.max(0.0)))
        })
        .collect()
}

struct Canvas {
    rows: Vec<Vec<char>>,
    t_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, t_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            rows: vec![vec![' '; width]; height],
            t_range,
            y_range,
        }
    }

    fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// `(column, row)` for a data point; row 0 is the top (largest length).
    fn cell(&self, t: f64, y: f64) -> (usize, usize) {
        let scale = |v: f64, (lo, hi): (f64, f64), cells: usize| {
            (((v - lo) / (hi - lo)).clamp(0.0, 1.0) * (cells - 1) as f64).round() as usize
        };
        let col = scale(t, self.t_range, self.width());
        let rows = self.rows.len();
        (col, rows - 1 - scale(y, self.y_range, rows))
    }

    fn put(&mut self, (col, row): (usize, usize), ch: char) {
        self.rows[row][col] = ch;
    }

    /// Bresenham between two cells; only blank cells are painted.
    fn line(&mut self, from: (usize, usize), to: (usize, usize), ch: char) {
        let (mut x, mut y) = (from.0 as isize, from.1 as isize);
        let (x_end, y_end) = (to.0 as isize, to.1 as isize);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let step_x = if x < x_end { 1 } else { -1 };
        let step_y = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(cell) = self.rows.get_mut(y as usize).and_then(|r| r.get_mut(x as usize))
                && *cell == ' '
            {
                *cell = ch;
            }
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn render(self) -> String {
        let (t_lo, t_hi) = self.t_range;
        let (y_lo, y_hi) = self.y_range;
        let mut out = format!("Plot: time=[{t_lo:.2}, {t_hi:.2}] | length=[{y_lo:.2}, {y_hi:.2}]\n");
        for row in self.rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
