use common::{
    chart::{Axis, Chart, LegendPosition, Marker, SeriesStyle, Ticks},
    plot::{Plot, PlotContext},
    record::{ResultKind, ResultsRecord},
};
use eyre::Result;

/// Relative error over condition number, both on log axes, drawn as markers
#[derive(Debug, Default, Clone, Copy)]
pub struct Accuracy;

impl Plot for Accuracy {
    fn kind(&self) -> ResultKind {
        ResultKind::Accuracy
    }

    fn plot(&self, name: &str, record: &ResultsRecord, _: &PlotContext<'_>) -> Result<Chart> {
        let mut chart = Chart::new(name, &record.title).axes(
            Axis::logarithmic("Condition number")
                .with_min(0.0)
                .with_ticks(Ticks::At((0..5).map(|i| 10.0 * i as f64).collect())),
            Axis::logarithmic("Relative error")
                .with_min(-16.0)
                .with_ticks(Ticks::At((0..5).map(|i| -16.0 + 4.0 * i as f64).collect())),
        );

        for (idx, (label, points)) in record.series().into_iter().enumerate() {
            chart.add_series(label, points, SeriesStyle::markers_only(marker(idx)));
        }
        chart.set_legend(LegendPosition::SouthEast);
        Ok(chart)
    }
}

fn marker(idx: usize) -> Marker {
    match idx {
        0 => Marker::Triangle,
        1 => Marker::Bullet,
        3 => Marker::Plus,
        _ => Marker::Circle,
    }
}
