use common::{
    chart::{Axis, Chart, LegendPosition, ReferenceLine, SeriesStyle, Ticks},
    plot::{Plot, PlotContext},
    record::{RecordError, ResultKind, ResultsRecord},
    util::{cache_thresholds, smooth_series},
};
use eyre::{Result, ensure};
use tracing::debug;

/// Time per element over vector size, with the cache sizes marked in elements
#[derive(Debug, Default, Clone, Copy)]
pub struct Performance;

impl Plot for Performance {
    fn kind(&self) -> ResultKind {
        ResultKind::Performance
    }

    fn requires_cache(&self) -> bool {
        true
    }

    fn plot(&self, name: &str, record: &ResultsRecord, ctx: &PlotContext<'_>) -> Result<Chart> {
        let settings = ctx.settings;
        let mut chart = Chart::new(name, &record.title).axes(
            Axis::logarithmic("Vector size")
                .with_ticks(Ticks::At((2..=7).map(f64::from).collect())),
            Axis::linear("Time [ns/elem]")
                .with_min(0.0)
                .with_ticks(Ticks::Every(0.2)),
        );

        for (label, mut points) in record.series() {
            smooth_series(
                &mut points,
                settings.smoothing,
                settings.smoothing_threshold,
            );
            chart.add_series(label, points, SeriesStyle::default());
        }

        match (record.elem_size, ctx.cache) {
            (Some(elem_size), Some(cache)) => {
                ensure!(elem_size > 0, RecordError::ZeroElemSize);
                let (y_min, y_max) = chart.y_bounds();
                for (level, elements) in cache_thresholds(cache, elem_size)? {
                    debug!("{name}: {level} holds {elements} elements");
                    chart.add_reference_line(ReferenceLine::vertical(
                        &level,
                        elements as f64,
                        y_min,
                        y_max,
                    ));
                }
            }
            (None, _) => debug!("{name}: no elem_size, skipping cache levels"),
            (_, None) => debug!("{name}: no cache levels loaded"),
        }

        chart.set_legend(if record.elem_size == Some(16) {
            LegendPosition::SouthEast
        } else {
            LegendPosition::NorthEast
        });
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use common::{
        chart::{Pattern, Scale},
        config::{CacheLevels, Settings},
    };

    use super::*;

    fn record(elem_size: Option<u64>) -> ResultsRecord {
        ResultsRecord {
            kind: ResultKind::Performance,
            title: "Dot product".to_owned(),
            labels: vec!["simd".to_owned(), "scalar".to_owned()],
            data: vec![
                vec![10.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0],
                vec![1.0, 0.5, 0.5, 0.9, 0.5, 0.5, 0.5],
                vec![2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            ],
            elem_size,
        }
    }

    #[test]
    fn series_are_smoothed_and_trimmed() {
        let settings = Settings::default();
        let ctx = PlotContext {
            settings: &settings,
            cache: None,
        };
        let chart = Performance.plot("dot", &record(Some(8)), &ctx).unwrap();

        assert_eq!(chart.series.len(), 2);
        assert_eq!(
            chart.series[0].points,
            vec![(10.0, 1.0), (100.0, 0.5), (200.0, 0.5), (300.0, 0.5)]
        );
        assert_eq!(chart.x.scale, Scale::Logarithmic);
        assert_eq!(chart.x.label, "Vector size");
        assert_eq!(chart.x.ticks, Ticks::At(vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        assert_eq!(chart.y.min, Some(0.0));
        assert_eq!(chart.y.ticks, Ticks::Every(0.2));
        assert_eq!(chart.legend, Some(LegendPosition::NorthEast));
        assert!(chart.reference_lines.is_empty());
    }

    #[test]
    fn cache_levels_become_reference_lines() {
        let settings = Settings::default();
        let cache = CacheLevels::from([("L1", 32)]);
        let ctx = PlotContext {
            settings: &settings,
            cache: Some(&cache),
        };
        let chart = Performance.plot("dot", &record(Some(16)), &ctx).unwrap();

        assert_eq!(chart.legend, Some(LegendPosition::SouthEast));
        assert_eq!(chart.reference_lines.len(), 1);
        let line = &chart.reference_lines[0];
        assert_eq!(line.label, "L1");
        assert_eq!(line.x, 2048.0);
        assert_eq!((line.y_min, line.y_max), (0.0, 2.0));
        assert_eq!(line.style.pattern, Pattern::Dashed);
    }

    #[test]
    fn no_reference_lines_without_elem_size() {
        let settings = Settings::default();
        let cache = CacheLevels::from([("L1", 32)]);
        let ctx = PlotContext {
            settings: &settings,
            cache: Some(&cache),
        };
        let chart = Performance.plot("dot", &record(None), &ctx).unwrap();
        assert!(chart.reference_lines.is_empty());
        assert_eq!(chart.legend, Some(LegendPosition::NorthEast));
    }

    #[test]
    fn smoothing_follows_settings() {
        let settings = Settings {
            smoothing: 0,
            ..Default::default()
        };
        let ctx = PlotContext {
            settings: &settings,
            cache: None,
        };
        let chart = Performance.plot("dot", &record(None), &ctx).unwrap();
        assert_eq!(chart.series[0].points.len(), 7);
        assert_eq!(chart.series[0].points[3], (300.0, 0.9));
    }

    #[test]
    fn plotting_is_repeatable() {
        let settings = Settings::default();
        let cache = CacheLevels::from([("L1", 32), ("L2", 1024)]);
        let ctx = PlotContext {
            settings: &settings,
            cache: Some(&cache),
        };
        let record = record(Some(16));
        assert_eq!(
            Performance.plot("dot", &record, &ctx).unwrap(),
            Performance.plot("dot", &record, &ctx).unwrap()
        );
    }
}
