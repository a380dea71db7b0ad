//! Bar chart geometry shared by the on-screen painter and the file export.
//!
//! Coordinates are in pixels with the origin at the top-left corner of the
//! chart; y grows downwards.
//!
//! The most frequent activity is drawn at the top. A plain matplotlib
//! `barh` over the same ranking puts it at the bottom instead; the
//! top-down order here is intentional and reads as a ranking.

use crate::constants::*;
use crate::ranking::ActivityRanking;

/// Horizontal share of the chart reserved for activity labels
const LABEL_AREA: f32 = 0.32;
const RIGHT_MARGIN: f32 = 0.07;
const TOP_MARGIN: f32 = 64.0;
const BOTTOM_MARGIN: f32 = 78.0;
/// Bar thickness relative to its slot
const BAR_FILL: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub activity: String,
    pub count: usize,
    pub value_label: String,
    pub rect: Bounds,
    /// Left end of the value label, vertically centered on the bar
    pub value_x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub x: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub plot: Bounds,
    /// Highest ranked first, drawn top to bottom
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
    /// Right edge of the activity labels
    pub label_right: f32,
}

/// Upper bound and tick step of the percentage axis.
pub fn axis_scale(max_percent: f64) -> (f64, f64) {
    if max_percent <= 0.0 || !max_percent.is_finite() {
        return (10.0, 2.0);
    }
    // Leave room for the value labels past the longest bar
    let padded = max_percent * 1.05;
    let step = nice_step(padded / 5.0);
    ((padded / step).ceil() * step, step)
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&n| n >= normalized)
        .unwrap_or(10.0);
    nice * magnitude
}

fn tick_label(value: f64, step: f64) -> String {
    if step.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn title(year: i32) -> String {
    format!("{CHART_TITLE} - {year}")
}

/// Lay out the ranking in a `width` x `height` canvas.
pub fn layout(ranking: &ActivityRanking, width: f32, height: f32) -> ChartGeometry {
    let plot_x = width * LABEL_AREA;
    let plot = Bounds {
        x: plot_x,
        y: TOP_MARGIN,
        w: (width - plot_x - width * RIGHT_MARGIN).max(1.0),
        h: (height - TOP_MARGIN - BOTTOM_MARGIN).max(1.0),
    };

    let (axis_max, step) = axis_scale(ranking.max_percent());
    let scale = |percent: f64| plot.x + (percent / axis_max) as f32 * plot.w;

    let slot = plot.h / ranking.entries.len().max(1) as f32;
    let bars = ranking
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let thickness = slot * BAR_FILL;
            Bar {
                activity: entry.activity.clone(),
                count: entry.count,
                value_label: format!("{:.1}%", entry.percent),
                rect: Bounds {
                    x: plot.x,
                    y: plot.y + i as f32 * slot + (slot - thickness) / 2.0,
                    w: scale(entry.percent) - plot.x,
                    h: thickness,
                },
                value_x: scale(entry.percent * 1.01),
            }
        })
        .collect();

    let tick_count = (axis_max / step).round() as usize;
    let ticks = (0..=tick_count)
        .map(|i| {
            let value = i as f64 * step;
            Tick {
                x: scale(value),
                label: tick_label(value, step),
            }
        })
        .collect();

    ChartGeometry {
        width,
        height,
        title: title(ranking.year),
        plot,
        bars,
        ticks,
        label_right: plot.x - 8.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::ActivityShare;

    fn ranking(percents: &[f64]) -> ActivityRanking {
        ActivityRanking {
            year: 2024,
            total: 100,
            unclassified: 0,
            entries: percents
                .iter()
                .enumerate()
                .map(|(i, &p)| ActivityShare {
                    activity: format!("Atividade {i}"),
                    count: p as usize,
                    percent: p,
                })
                .collect(),
        }
    }

    #[test]
    fn test_axis_scale_rounds_up_to_nice_step() {
        assert_eq!(axis_scale(50.0), (60.0, 20.0));
        assert_eq!(axis_scale(8.3), (10.0, 2.0));
        assert_eq!(axis_scale(0.0), (10.0, 2.0));
    }

    #[test]
    fn test_axis_scale_fractional_step() {
        let (max, step) = axis_scale(2.2);
        assert_eq!(step, 0.5);
        assert!(max >= 2.2 * 1.05);
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(tick_label(20.0, 20.0), "20");
        assert_eq!(tick_label(1.5, 0.5), "1.5");
    }

    #[test]
    fn test_layout_bars_top_down_and_proportional() {
        let geometry = layout(&ranking(&[40.0, 20.0, 10.0]), 1000.0, 600.0);

        assert_eq!(geometry.title, "Ranking de Atividades Inspecionadas - 2024");
        assert_eq!(geometry.bars.len(), 3);
        assert!(geometry.bars[0].rect.y < geometry.bars[1].rect.y);
        assert!(geometry.bars[1].rect.y < geometry.bars[2].rect.y);

        let w0 = geometry.bars[0].rect.w;
        let w1 = geometry.bars[1].rect.w;
        assert!((w0 / w1 - 2.0).abs() < 1e-3);
        assert!(geometry.bars[0].rect.right() < geometry.plot.right());
        assert!(geometry.bars[0].value_x > geometry.bars[0].rect.right());
        assert_eq!(geometry.bars[2].value_label, "10.0%");
    }

    #[test]
    fn test_layout_most_frequent_activity_on_top() {
        let geometry = layout(&ranking(&[60.0, 25.0, 15.0]), 1000.0, 600.0);
        let top = geometry
            .bars
            .iter()
            .min_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
            .expect("bars");
        assert_eq!(top.activity, "Atividade 0");
        assert_eq!(top.count, 60);
    }

    #[test]
    fn test_layout_bars_stay_inside_plot() {
        let geometry = layout(&ranking(&[30.0, 30.0, 20.0, 10.0, 10.0]), 800.0, 500.0);
        for bar in &geometry.bars {
            assert!(bar.rect.y >= geometry.plot.y);
            assert!(bar.rect.bottom() <= geometry.plot.bottom() + 1e-3);
        }
    }

    #[test]
    fn test_layout_ticks_span_axis() {
        let geometry = layout(&ranking(&[50.0]), 1000.0, 600.0);
        let labels: Vec<&str> = geometry.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "20", "40", "60"]);
        assert!((geometry.ticks[0].x - geometry.plot.x).abs() < 1e-3);
        assert!((geometry.ticks[3].x - geometry.plot.right()).abs() < 1e-3);
    }

    #[test]
    fn test_layout_empty_ranking() {
        let geometry = layout(&ranking(&[]), 640.0, 480.0);
        assert!(geometry.bars.is_empty());
        assert!(!geometry.ticks.is_empty());
    }
}
