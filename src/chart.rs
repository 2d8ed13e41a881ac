use serde::Serialize;

/// Minimum vertical span; guards division by zero for constant series
/// without visibly distorting real ranges.
const MIN_SPAN: f64 = 1e-4;

/// Target drawing surface for a projection.
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub pad: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64, pad: f64) -> Self {
        Self { width, height, pad }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Map co-plotted series of arbitrary range onto one shared vertical scale.
///
/// All series contribute to a common min/max so they stay visually
/// comparable (strategy vs. buy-hold).  The first point of each series sits
/// at the left pad, the last at `width - pad`, and higher values render
/// nearer the top.  Empty input (no series, or all series empty) is the
/// "no chart data" state and yields `None`.
pub fn project(series: &[&[f64]], canvas: Canvas) -> Option<Vec<Vec<PlotPoint>>> {
    if series.iter().all(|s| s.is_empty()) {
        return None;
    }

    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for s in series {
        for &v in *s {
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
    }
    let span = (max_v - min_v).max(MIN_SPAN);

    let out = series
        .iter()
        .map(|s| project_one(s, canvas, min_v, span))
        .collect();
    Some(out)
}

/// Single-series variant with its own local min/max and (typically) a much
/// smaller canvas.
pub fn sparkline(values: &[f64], canvas: Canvas) -> Option<Vec<PlotPoint>> {
    project(&[values], canvas).map(|mut s| s.remove(0))
}

fn project_one(values: &[f64], canvas: Canvas, min_v: f64, span: f64) -> Vec<PlotPoint> {
    let inner_w = canvas.width - 2.0 * canvas.pad;
    let inner_h = canvas.height - 2.0 * canvas.pad;
    let denom = (values.len().saturating_sub(1)).max(1) as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| PlotPoint {
            x: canvas.pad + (i as f64 / denom) * inner_w,
            y: canvas.height - canvas.pad - ((v - min_v) / span) * inner_h,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Canvas = Canvas::new(100.0, 50.0, 10.0);

    #[test]
    fn x_spans_left_pad_to_right_pad() {
        let pts = sparkline(&[0.0, 5.0, 10.0], CANVAS).expect("chart data");
        assert!((pts[0].x - 10.0).abs() < 1e-9);
        assert!((pts[1].x - 50.0).abs() < 1e-9);
        assert!((pts[2].x - 90.0).abs() < 1e-9);
    }

    #[test]
    fn higher_values_render_nearer_the_top() {
        let pts = sparkline(&[0.0, 5.0, 10.0], CANVAS).expect("chart data");
        // min maps to height - pad, max to pad.
        assert!((pts[0].y - 40.0).abs() < 1e-9);
        assert!((pts[2].y - 10.0).abs() < 1e-9);
        assert!(pts[2].y < pts[0].y);
    }

    #[test]
    fn constant_series_has_no_division_by_zero() {
        let pts = sparkline(&[3.0, 3.0, 3.0], CANVAS).expect("chart data");
        assert!(pts.iter().all(|p| p.y.is_finite()));
        assert!(pts.windows(2).all(|w| (w[0].y - w[1].y).abs() < 1e-9));
    }

    #[test]
    fn single_point_series_sits_at_left_pad() {
        let pts = sparkline(&[7.0], CANVAS).expect("chart data");
        assert_eq!(pts.len(), 1);
        assert!((pts[0].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_is_no_chart_data() {
        assert!(sparkline(&[], CANVAS).is_none());
        assert!(project(&[], CANVAS).is_none());
    }

    #[test]
    fn co_plotted_series_share_one_scale() {
        let strategy = [1.0, 2.0];
        let buy_hold = [0.0, 4.0];
        let out = project(&[strategy.as_slice(), buy_hold.as_slice()], CANVAS).expect("chart data");
        // Shared scale is [0, 4]: strategy's 2.0 sits at the midpoint,
        // buy-hold's 4.0 at the top pad.
        assert!((out[0][1].y - 25.0).abs() < 1e-9);
        assert!((out[1][1].y - 10.0).abs() < 1e-9);
        assert!((out[1][0].y - 40.0).abs() < 1e-9);
    }
}
