use std::path::{Path, PathBuf};

use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::render::ChartRenderer;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Linear,
    /// Values are plotted by their decimal logarithm, tick values are exponents
    Logarithmic,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ticks {
    #[default]
    Auto,
    /// Ticks at exactly these positions
    At(Vec<f64>),
    /// A tick at every multiple of the step
    Every(f64),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub scale: Scale,
    /// Bounds and ticks are given in drawn units, ie. exponents on a log axis
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub ticks: Ticks,
}

impl Axis {
    pub fn linear(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            ..Default::default()
        }
    }

    pub fn logarithmic(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            scale: Scale::Logarithmic,
            ..Default::default()
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_ticks(mut self, ticks: Ticks) -> Self {
        self.ticks = ticks;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    NorthEast,
    SouthEast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Circle,
    Triangle,
    Bullet,
    Plus,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Marker drawn at every point, `None` draws no markers
    pub marker: Option<Marker>,
    pub line: bool,
    /// RGB, picked from the palette by series index when unset
    pub color: Option<(u8, u8, u8)>,
    pub thickness: u32,
    pub pattern: Pattern,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            marker: None,
            line: true,
            color: None,
            thickness: 2,
            pattern: Pattern::Solid,
        }
    }
}

impl SeriesStyle {
    pub fn markers_only(marker: Marker) -> Self {
        Self {
            marker: Some(marker),
            line: false,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

/// Vertical line with a label at its top, drawn beneath the data series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub style: SeriesStyle,
}

impl ReferenceLine {
    pub fn vertical(label: &str, x: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            label: label.to_owned(),
            x,
            y_min,
            y_max,
            style: SeriesStyle {
                color: Some((128, 128, 128)),
                thickness: 1,
                pattern: Pattern::Dashed,
                ..Default::default()
            },
        }
    }
}

/// A chart under construction. Nothing is written until [`Chart::finish`],
/// which consumes the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub name: String,
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
    pub legend: Option<LegendPosition>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl Chart {
    pub fn new(name: &str, title: &str) -> Self {
        Self {
            name: name.to_owned(),
            title: title.to_owned(),
            x: Axis::default(),
            y: Axis::default(),
            series: Vec::new(),
            legend: None,
            reference_lines: Vec::new(),
        }
    }

    pub fn axes(mut self, x: Axis, y: Axis) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn add_series(&mut self, label: &str, points: Vec<(f64, f64)>, style: SeriesStyle) {
        self.series.push(Series {
            label: label.to_owned(),
            points,
            style,
        });
    }

    pub fn set_legend(&mut self, position: LegendPosition) {
        self.legend = Some(position);
    }

    pub fn add_reference_line(&mut self, line: ReferenceLine) {
        self.reference_lines.push(line);
    }

    /// The y range covered by the chart: the axis bounds where set, otherwise
    /// the extent of the series data. `(0, 1)` when there is no data.
    /// Only meaningful for a linear y-axis.
    pub fn y_bounds(&self) -> (f64, f64) {
        let ys = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let (lo, hi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        let (lo, hi) = if lo > hi { (0.0, 1.0) } else { (lo, hi) };
        (self.y.min.unwrap_or(lo), self.y.max.unwrap_or(hi))
    }

    /// Renders the chart to `<dir>/<name>.<ext>` and returns that path
    pub fn finish(self, renderer: &dyn ChartRenderer, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.{}", self.name, renderer.extension()));
        renderer.render(&self, &path)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
