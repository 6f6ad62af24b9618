use core::fmt::Debug;

use eyre::Result;

use crate::{
    chart::Chart,
    config::{CacheLevels, Settings},
    record::{ResultKind, ResultsRecord},
};

/// Everything besides the record itself that a plot may draw on
#[derive(Debug, Clone, Copy)]
pub struct PlotContext<'a> {
    pub settings: &'a Settings,
    /// Loaded before plotting if [`Plot::requires_cache`] is set
    pub cache: Option<&'a CacheLevels>,
}

pub trait Plot: Debug + Send + Sync {
    /// The `type` of results this plot draws
    fn kind(&self) -> ResultKind;
    /// Whether the cache level table has to be loaded for this plot
    fn requires_cache(&self) -> bool {
        false
    }
    /// Builds the chart for a validated record
    ///
    /// Arguments:
    /// * `name` - The chart name, ie. the results file stem
    /// * `record` - The parsed results
    /// * `ctx` - Settings and the shared cache level table
    fn plot(&self, name: &str, record: &ResultsRecord, ctx: &PlotContext<'_>) -> Result<Chart>;
}
