//! PNG charts of decade trends
//!
//! Every chart owns its bitmap for the duration of a single call: the drawing
//! area is created, drawn on and presented inside [`with_bitmap`], and the
//! backend is dropped before returning, on success and on error alike.

use std::{iter, ops::Range, path::Path};

use anyhow::Context;
use lexitrend_analysis::{
    config::{PeriodAnnotation, Rgb, TrendChartConfig},
    normalization::NormalizedTrends,
    trend::CategoryTrend,
};
use plotters::{coord::Shift, prelude::*};

use crate::util;

const FONT: &str = "sans-serif";
const ANNOTATION_PADDING: i32 = 6;
const ANNOTATION_CORNER_RADIUS: i32 = 6;
const GRID_DASH: f64 = 4.0;
const GRID_GAP: f64 = 3.0;

fn with_bitmap<F>(path: &Path, size: (u32, u32), draw: F) -> anyhow::Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> anyhow::Result<()>,
{
    util::ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw(&root).with_context(|| format!("Failed to draw chart: {}", path.display()))?;
    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    let Rgb(r, g, b) = color;
    RGBColor(r, g, b)
}

/// Scatter of decade means with the fitted line and its confidence band.
pub fn draw_trend_chart(
    path: &Path,
    size: (u32, u32),
    trend: &CategoryTrend,
) -> anyhow::Result<()> {
    let x_range = padded_range(trend.decades.iter().copied(), 0.05);
    let y_range = padded_range(
        trend.means.iter().copied().chain(
            trend
                .band
                .iter()
                .flat_map(|p| [p.ci_lower, p.ci_upper]),
        ),
        0.08,
    );

    with_bitmap(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(trend.chart_title(), (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Decade")
            .y_desc(trend.category.as_str())
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .draw()?;

        let band = trend
            .band
            .iter()
            .map(|p| (p.x, p.ci_upper))
            .chain(trend.band.iter().rev().map(|p| (p.x, p.ci_lower)))
            .collect::<Vec<_>>();
        chart
            .draw_series(iter::once(Polygon::new(band, BLUE.mix(0.15).filled())))?
            .label("95% CI")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.15).filled())
            });

        chart
            .draw_series(LineSeries::new(
                trend.band.iter().map(|p| (p.x, p.mean)),
                BLUE.stroke_width(2),
            ))?
            .label("OLS fit")
            .legend(|(x, y)| PathElement::new([(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .draw_series(
                iter::zip(&trend.decades, &trend.means)
                    .map(|(&x, &y)| Cross::new((x, y), 5, BLACK.stroke_width(2))),
            )?
            .label("Decade mean")
            .legend(|(x, y)| Cross::new((x + 10, y), 5, BLACK.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

/// All normalized series on one chart, with period annotations.
pub fn draw_normalized_trends(
    path: &Path,
    config: &TrendChartConfig,
    trends: &NormalizedTrends,
) -> anyhow::Result<()> {
    let (x0, x1) = config.x_range;
    let (y0, y1) = config.y_range;

    with_bitmap(path, config.pixel_size(), |root| {
        let mut body = root.margin(0, 0, 0, 0);
        for (i, line) in config.title.iter().enumerate() {
            let size = if i == 0 { 28 } else { 22 };
            body = body.titled(line, (FONT, size))?;
        }

        let mut chart = ChartBuilder::on(&body)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str())
            .y_labels(tick_count(y0, y1, config.y_tick_step))
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .label_style((FONT, 18))
            .axis_desc_style((FONT, 20))
            .draw()?;

        let grid_style = BLACK.mix(0.3).stroke_width(1);
        for y in grid_levels(y0, y1, config.y_tick_step) {
            chart.draw_series(
                dash_segments(x0, x1, GRID_DASH, GRID_GAP)
                    .map(|(a, b)| PathElement::new([(a, y), (b, y)], grid_style)),
            )?;
        }

        for series in &trends.series {
            let color = rgb(config.color_of(&series.category));
            chart
                .draw_series(LineSeries::new(
                    iter::zip(&series.decades, &series.smoothed).map(|(&x, &y)| (x, y)),
                    color.stroke_width(2),
                ))?
                .label(series.category.as_str())
                .legend(move |(x, y)| {
                    PathElement::new([(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(
                iter::zip(&series.decades, &series.normalized)
                    .map(|(&x, &y)| Circle::new((x, y), 4, color.mix(0.6).filled())),
            )?;
        }

        for annotation in &config.annotations {
            let anchor = chart.backend_coord(&(annotation.year, annotation.y));
            draw_annotation(root, anchor, annotation)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::MiddleRight)
            .label_font((FONT, 18))
            .background_style(&WHITE.mix(0.9))
            .border_style(&BLACK.mix(0.5))
            .draw()?;
        Ok(())
    })
}

/// Multi-line label in a rounded box, centred on `anchor` horizontally, box
/// bottom at `anchor`.
fn draw_annotation(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    anchor: (i32, i32),
    annotation: &PeriodAnnotation,
) -> anyhow::Result<()> {
    let style = TextStyle::from((FONT, 16).into_font()).color(&BLACK);
    let lines = annotation
        .lines()
        .map(|line| -> anyhow::Result<(&str, i32, i32)> {
            let (w, h) = root.estimate_text_size(line, &style)?;
            Ok((line, to_i32(w), to_i32(h)))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let line_gap = 2;
    let text_width = lines.iter().map(|&(_, w, _)| w).max().unwrap_or_default();
    let text_height = lines.iter().map(|&(_, _, h)| h + line_gap).sum::<i32>() - line_gap;

    let (ax, ay) = anchor;
    let width = text_width + 2 * ANNOTATION_PADDING;
    let height = text_height + 2 * ANNOTATION_PADDING;
    let left = ax - width / 2;
    let top = ay - height;
    let outline = rounded_rect(
        (left, top),
        (left + width, ay),
        ANNOTATION_CORNER_RADIUS,
    );

    root.draw(&Polygon::new(outline.clone(), WHITE.mix(0.85).filled()))?;
    let closed = outline.iter().copied().chain(outline.first().copied()).collect::<Vec<_>>();
    root.draw(&PathElement::new(closed, RGBColor(128, 128, 128).stroke_width(1)))?;

    let mut y = top + ANNOTATION_PADDING;
    for (line, w, h) in lines {
        root.draw(&Text::new(line.to_owned(), (ax - w / 2, y), style.clone()))?;
        y += h + line_gap;
    }
    Ok(())
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Outline of a rectangle with quarter-circle corners, clockwise from the
/// top-left corner.
fn rounded_rect(top_left: (i32, i32), bottom_right: (i32, i32), radius: i32) -> Vec<(i32, i32)> {
    const STEPS: i32 = 6;
    let (left, top) = top_left;
    let (right, bottom) = bottom_right;
    let radius = radius
        .min((right - left) / 2)
        .min((bottom - top) / 2)
        .max(0);
    // corner centres with the angle each quarter arc starts at
    let corners = [
        ((left + radius, top + radius), 180.0),
        ((right - radius, top + radius), 270.0),
        ((right - radius, bottom - radius), 0.0),
        ((left + radius, bottom - radius), 90.0),
    ];
    corners
        .into_iter()
        .flat_map(|((cx, cy), start): ((i32, i32), f64)| {
            (0..=STEPS).map(move |step| {
                let angle = (start + 90.0 * f64::from(step) / f64::from(STEPS)).to_radians();
                let r = f64::from(radius);
                (
                    cx + round_i32(r * angle.cos()),
                    cy + round_i32(r * angle.sin()),
                )
            })
        })
        .collect()
}

#[expect(clippy::cast_possible_truncation)]
fn round_i32(value: f64) -> i32 {
    value.round() as i32
}

/// `[min, max]` of `values` widened by `fraction` of the span on both
/// sides; a unit range around the value when the span is zero.
fn padded_range<I>(values: I, fraction: f64) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * fraction } else { 1.0 };
    (min - pad)..(max + pad)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tick_count(lo: f64, hi: f64, step: f64) -> usize {
    if step <= 0.0 || hi <= lo {
        return 2;
    }
    ((hi - lo) / step).floor() as usize + 1
}

/// Multiples of `step` from `lo` up to `hi` inclusive.
fn grid_levels(lo: f64, hi: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 { tick_count(lo, hi, step) } else { 0 };
    (0..count).map(move |i| {
        #[expect(clippy::cast_precision_loss)]
        let offset = i as f64 * step;
        lo + offset
    })
}

/// `(start, end)` of each dash between `lo` and `hi`.
fn dash_segments(lo: f64, hi: f64, dash: f64, gap: f64) -> impl Iterator<Item = (f64, f64)> {
    iter::successors(Some(lo), move |&start| {
        let next = start + dash + gap;
        (next < hi).then_some(next)
    })
    .filter(move |_| dash > 0.0)
    .map(move |start| (start, (start + dash).min(hi)))
}
