use std::{fs, ops::Range, path::Path};

use eyre::{Context, Result};
use plotters::{prelude::*, series::DashedLineSeries};
use tracing::debug;

use crate::chart::{Axis, Chart, LegendPosition, Marker, Pattern, Scale, SeriesStyle, Ticks};

const MARKER_SIZE: i32 = 5;

/// Turns a finished [`Chart`] into a file
pub trait ChartRenderer {
    /// File extension of the rendered output, without the dot
    fn extension(&self) -> &'static str;
    fn render(&self, chart: &Chart, path: &Path) -> Result<()>;
}

/// Writes the chart model itself, useful to inspect what would be drawn.
/// Uses `.chart.json` so that the output is not taken for a results file.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl ChartRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "chart.json"
    }

    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(chart)
            .wrap_err_with(|| format!("Serialize chart {}", chart.name))?;
        fs::write(path, data).wrap_err_with(|| format!("Write {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let xs = chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .chain(chart.reference_lines.iter().map(|l| l.x));
        let ys = chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1));
        let x_range = axis_range(&chart.x, xs);
        let y_range = axis_range(&chart.y, ys);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 28).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), y_range.clone())?;

        let x_fmt = |v: &f64| format_tick(chart.x.scale, *v);
        let y_fmt = |v: &f64| format_tick(chart.y.scale, *v);
        ctx.configure_mesh()
            .x_desc(chart.x.label.as_str())
            .y_desc(chart.y.label.as_str())
            .x_labels(label_count(&chart.x, &x_range))
            .y_labels(label_count(&chart.y, &y_range))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .axis_desc_style(("sans-serif", 20).into_font())
            .draw()?;

        for line in &chart.reference_lines {
            let (Some(x), Some(y_min), Some(y_max)) = (
                project(chart.x.scale, line.x),
                project(chart.y.scale, line.y_min),
                project(chart.y.scale, line.y_max),
            ) else {
                debug!("Reference line {} is outside a log axis", line.label);
                continue;
            };
            let style = series_color(&line.style, 0).stroke_width(line.style.thickness);
            ctx.draw_series(DashedLineSeries::new(
                vec![(x, y_min), (x, y_max)],
                6,
                4,
                style,
            ))?;
            ctx.draw_series(std::iter::once(Text::new(
                line.label.clone(),
                (x, y_max),
                ("sans-serif", 14).into_font(),
            )))?;
        }

        for (idx, series) in chart.series.iter().enumerate() {
            let color = series_color(&series.style, idx);
            let style = color.stroke_width(series.style.thickness);
            let points = series
                .points
                .iter()
                .filter_map(|&(x, y)| {
                    Some((project(chart.x.scale, x)?, project(chart.y.scale, y)?))
                })
                .collect::<Vec<_>>();
            if points.len() < series.points.len() {
                debug!(
                    "Skipped {} non-positive points of {} on a log axis",
                    series.points.len() - points.len(),
                    series.label
                );
            }

            if series.style.line {
                let anno = match series.style.pattern {
                    Pattern::Solid => ctx.draw_series(LineSeries::new(points.clone(), style))?,
                    Pattern::Dashed => {
                        ctx.draw_series(DashedLineSeries::new(points.clone(), 6, 4, style))?
                    }
                };
                anno.label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }

            // markers carry the legend entry when there is no line
            macro_rules! draw_markers {
                ($make:expr) => {{
                    let anno = ctx.draw_series(points.iter().map(|&p| ($make)(p)))?;
                    if !series.style.line {
                        anno.label(series.label.as_str())
                            .legend(move |c| ($make)(c));
                    }
                }};
            }
            match series.style.marker {
                Some(Marker::Circle) => draw_markers!(|p| Circle::new(p, MARKER_SIZE, style)),
                Some(Marker::Bullet) => {
                    draw_markers!(|p| Circle::new(p, MARKER_SIZE, color.filled()))
                }
                Some(Marker::Triangle) => {
                    draw_markers!(|p| TriangleMarker::new(p, MARKER_SIZE, style))
                }
                Some(Marker::Plus) => draw_markers!(|p| Cross::new(p, MARKER_SIZE, style)),
                None => {}
            }
        }

        if let Some(position) = chart.legend
            && !chart.series.is_empty()
        {
            ctx.configure_series_labels()
                .position(legend_position(position))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        root.present()
            .wrap_err_with(|| format!("Write {}", path.display()))?;
        Ok(())
    }
}

/// Maps a data value onto the drawn axis, log axes are drawn in exponent space
fn project(scale: Scale, value: f64) -> Option<f64> {
    match scale {
        Scale::Linear => value.is_finite().then_some(value),
        Scale::Logarithmic => (value > 0.0 && value.is_finite()).then(|| value.log10()),
    }
}

/// Axis bounds and ticks are already in drawn space, data values are not
fn axis_range(axis: &Axis, values: impl Iterator<Item = f64>) -> Range<f64> {
    let ticks = match &axis.ticks {
        Ticks::At(ticks) => ticks.as_slice(),
        _ => &[],
    };
    let (mut lo, mut hi) = values
        .filter_map(|v| project(axis.scale, v))
        .chain(ticks.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if let Some(min) = axis.min {
        lo = min;
    }
    if let Some(max) = axis.max {
        hi = max;
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if lo >= hi {
        hi = lo + 1.0;
    }
    lo..hi
}

fn label_count(axis: &Axis, range: &Range<f64>) -> usize {
    match &axis.ticks {
        Ticks::At(ticks) => ticks.len().max(2),
        Ticks::Every(step) if *step > 0.0 => {
            (((range.end - range.start) / step).floor() as usize + 1).clamp(2, 40)
        }
        _ => 10,
    }
}

fn format_tick(scale: Scale, value: f64) -> String {
    match scale {
        Scale::Logarithmic if value.fract().abs() < 1e-9 => format!("10^{value:.0}"),
        Scale::Logarithmic => trim_number(10f64.powf(value)),
        Scale::Linear => trim_number(value),
    }
}

fn trim_number(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}

fn series_color(style: &SeriesStyle, idx: usize) -> RGBColor {
    let (r, g, b) = style.color.unwrap_or_else(|| Palette99::pick(idx).rgb());
    RGBColor(r, g, b)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::NorthEast => SeriesLabelPosition::UpperRight,
        LegendPosition::SouthEast => SeriesLabelPosition::LowerRight,
    }
}
