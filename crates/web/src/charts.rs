//! Inline SVG chart geometry for the stats page.
//!
//! Charts are drawn with plain SVG attributes so they render under the
//! `style-src 'self'` content security policy. Coordinates are formatted to
//! one decimal place here and dropped into the template as-is.

use espresso_dialer_core::Shot;
use espresso_dialer_core::stats::{ProgressionPoint, TasteProfile};

/// Width of every chart's `viewBox`.
pub const WIDTH: f64 = 320.0;
/// Height of every chart's `viewBox`.
pub const HEIGHT: f64 = 200.0;
/// Gap between the plot area and the edge, for axis labels.
pub const PADDING: f64 = 32.0;

/// Height of the taste bar area; a score of 10 fills it.
const TASTE_AREA: f64 = 100.0;
const TASTE_BAR_WIDTH: f64 = 40.0;
const TASTE_BAR_GAP: f64 = 20.0;

/// Closed numeric range mapped onto one chart axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    min: f64,
    max: f64,
}

impl Axis {
    /// The smallest range covering `values`.
    ///
    /// A single distinct value is widened by one unit each way so it lands
    /// in the middle of the plot instead of dividing by zero.
    fn covering(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min > max {
            Self { min: 0.0, max: 1.0 }
        } else if (max - min).abs() < f64::EPSILON {
            Self {
                min: min - 1.0,
                max: max + 1.0,
            }
        } else {
            Self { min, max }
        }
    }

    /// Position of `value` as a fraction of the range.
    fn fraction(self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    fn x(self, value: f64) -> f64 {
        PADDING + self.fraction(value) * (WIDTH - 2.0 * PADDING)
    }

    /// SVG y grows downward, so larger values sit closer to the top.
    fn y(self, value: f64) -> f64 {
        HEIGHT - PADDING - self.fraction(value) * (HEIGHT - 2.0 * PADDING)
    }
}

fn coord(value: f64) -> String {
    format!("{value:.1}")
}

/// One dot on the scatter plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterPoint {
    pub cx: String,
    pub cy: String,
    /// Hover text.
    pub label: String,
}

/// Grind size against shot time, one dot per shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterChart {
    pub points: Vec<ScatterPoint>,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
}

impl ScatterChart {
    #[must_use]
    pub fn grind_vs_time(shots: &[&Shot]) -> Self {
        let x_axis = Axis::covering(shots.iter().map(|s| s.grind_size));
        let y_axis = Axis::covering(shots.iter().map(|s| s.shot_time));

        let points = shots
            .iter()
            .map(|shot| ScatterPoint {
                cx: coord(x_axis.x(shot.grind_size)),
                cy: coord(y_axis.y(shot.shot_time)),
                label: format!("Grind {:.1}, {}s", shot.grind_size, shot.shot_time),
            })
            .collect();

        Self {
            points,
            x_min: coord(x_axis.min),
            x_max: coord(x_axis.max),
            y_min: coord(y_axis.min),
            y_max: coord(y_axis.max),
        }
    }
}

/// Shot time and brew ratio over successive shots.
///
/// The two series share the x axis but each gets its own y scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    /// `points` attribute for the shot time polyline.
    pub time_points: String,
    /// `points` attribute for the ratio polyline.
    pub ratio_points: String,
    pub shot_count: usize,
    pub time_max: String,
    pub ratio_max: String,
}

impl LineChart {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progression(points: &[ProgressionPoint]) -> Self {
        let x_axis = Axis::covering(points.iter().map(|p| p.shot_number as f64));
        let time_axis = Axis::covering(points.iter().map(|p| p.time));
        let ratio_axis = Axis::covering(points.iter().map(|p| p.ratio));

        let polyline = |axis: Axis, value: fn(&ProgressionPoint) -> f64| {
            points
                .iter()
                .map(|p| {
                    format!(
                        "{},{}",
                        coord(x_axis.x(p.shot_number as f64)),
                        coord(axis.y(value(p)))
                    )
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        Self {
            time_points: polyline(time_axis, |p| p.time),
            ratio_points: polyline(ratio_axis, |p| p.ratio),
            shot_count: points.len(),
            time_max: coord(time_axis.max),
            ratio_max: coord(ratio_axis.max),
        }
    }
}

/// One bar of the taste chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasteBar {
    pub label: &'static str,
    /// Mean score, one decimal.
    pub value: String,
    pub x: String,
    pub y: String,
    pub height: String,
}

/// Bars for a taste profile; a score of `n` draws a bar `n * 10` units tall.
#[must_use]
pub fn taste_bars(profile: &TasteProfile) -> Vec<TasteBar> {
    profile
        .entries()
        .iter()
        .zip(0_u32..)
        .map(|((dimension, mean), index)| {
            let height = (mean * 10.0).clamp(0.0, TASTE_AREA);
            let x = TASTE_BAR_GAP + f64::from(index) * (TASTE_BAR_WIDTH + TASTE_BAR_GAP);
            TasteBar {
                label: dimension.label(),
                value: format!("{mean:.1}"),
                x: coord(x),
                y: coord(TASTE_AREA - height),
                height: coord(height),
            }
        })
        .collect()
}
