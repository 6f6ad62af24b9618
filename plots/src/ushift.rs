use common::{
    chart::{Axis, Chart, LegendPosition, SeriesStyle, Ticks},
    plot::{Plot, PlotContext},
    record::{ResultKind, ResultsRecord},
};
use eyre::Result;

/// Time per element over the shift parameter, one line per vector size
#[derive(Debug, Default, Clone, Copy)]
pub struct Ushift;

impl Plot for Ushift {
    fn kind(&self) -> ResultKind {
        ResultKind::Ushift
    }

    fn plot(&self, name: &str, record: &ResultsRecord, _: &PlotContext<'_>) -> Result<Chart> {
        let mut chart = Chart::new(name, &record.title).axes(
            Axis::linear("log2(U)").with_ticks(Ticks::At((0..=4).map(f64::from).collect())),
            Axis::linear("Time [ns/elem]").with_ticks(Ticks::Every(0.05)),
        );

        for (label, points) in record.series() {
            chart.add_series(&format!("{label} elems"), points, SeriesStyle::default());
        }
        chart.set_legend(LegendPosition::NorthEast);
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use common::{chart::Scale, config::Settings};

    use super::*;

    #[test]
    fn series_are_labelled_by_element_count() {
        let record: ResultsRecord = serde_json::from_str(
            r#"{"type":"ushift","title":"T","labels":["a","2","4"],
                "data":[[0,1,2,3,4],[1,2,3,4,5],[2,3,4,5,6]]}"#,
        )
        .unwrap();
        let settings = Settings::default();
        let ctx = PlotContext {
            settings: &settings,
            cache: None,
        };

        let chart = Ushift.plot("t", &record, &ctx).unwrap();
        assert_eq!(chart.title, "T");
        let labels = chart.series.iter().map(|s| s.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["2 elems", "4 elems"]);
        assert_eq!(
            chart.series[0].points,
            vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0), (4.0, 5.0)]
        );
        assert_eq!(chart.x.scale, Scale::Linear);
        assert_eq!(chart.x.label, "log2(U)");
        assert_eq!(chart.x.ticks, Ticks::At(vec![0.0, 1.0, 2.0, 3.0, 4.0]));
        assert_eq!(chart.y.label, "Time [ns/elem]");
        assert_eq!(chart.y.ticks, Ticks::Every(0.05));
        assert_eq!(chart.legend, Some(LegendPosition::NorthEast));
    }
}
