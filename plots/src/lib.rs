use std::path::{Path, PathBuf};

use common::{
    chart::Chart,
    config::{CacheLevels, Settings},
    plot::{Plot, PlotContext},
    record::{ResultKind, ResultsRecord},
    render::ChartRenderer,
    util::read_results_file,
};
use eyre::{Context, Result};
use tokio::fs::{create_dir_all, read_dir};
use tracing::{debug, warn};

mod accuracy;
mod performance;
mod ushift;

pub use accuracy::Accuracy;
pub use performance::Performance;
pub use ushift::Ushift;

static PLOTS: [&dyn Plot; 3] = [&Accuracy, &Ushift, &Performance];

/// The plot for a result type, `None` for types without one
pub fn plot_for(kind: ResultKind) -> Option<&'static dyn Plot> {
    PLOTS.iter().copied().find(|plot| plot.kind() == kind)
}

/// Validates the record and builds its chart. Records of an unknown type
/// yield `None`.
pub fn build_chart(
    name: &str,
    record: &ResultsRecord,
    ctx: &PlotContext<'_>,
) -> Result<Option<Chart>> {
    let Some(plot) = plot_for(record.kind) else {
        debug!("{name}: no plot for this result type");
        return Ok(None);
    };
    record
        .validate()
        .wrap_err_with(|| format!("Invalid results in {name}"))?;
    plot.plot(name, record, ctx).map(Some)
}

/// Plots every results file of a directory, one chart per file
pub struct ResultPlotter {
    settings: Settings,
    input_dir: PathBuf,
    output_dir: PathBuf,
    renderer: Box<dyn ChartRenderer>,
    /// Loaded with the first plot that needs it
    cache: Option<CacheLevels>,
}

impl ResultPlotter {
    pub fn new(
        settings: Settings,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        renderer: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            settings,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            renderer,
            cache: None,
        }
    }

    /// Stems of all results files in the input directory, sorted
    pub async fn result_files(&self) -> Result<Vec<String>> {
        let mut items = read_dir(&self.input_dir)
            .await
            .wrap_err_with(|| format!("List {}", self.input_dir.display()))?;
        let mut stems = Vec::new();
        while let Some(entry) = items.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || !is_results_file(&path, &self.settings) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stems.push(stem.to_owned()),
                None => warn!("Skipping non UTF-8 file name {}", path.display()),
            }
        }
        stems.sort();
        Ok(stems)
    }

    /// Plots all results files, stopping at the first failure
    pub async fn plot_all(&mut self) -> Result<Vec<PathBuf>> {
        let stems = self.result_files().await?;
        debug!("Found {} results files", stems.len());
        let mut written = Vec::new();
        for stem in stems {
            if let Some(path) = self.plot_results(&stem).await? {
                written.push(path);
            }
        }
        Ok(written)
    }

    /// Plots `<stem>.json`, returning the written chart if the result type
    /// has a plot
    pub async fn plot_results(&mut self, stem: &str) -> Result<Option<PathBuf>> {
        println!("-> {stem}");
        let Some(record) = read_results_file(self.input_dir.join(format!("{stem}.json"))).await?
        else {
            debug!("{stem}: no plot for this result type");
            return Ok(None);
        };

        if plot_for(record.kind).is_some_and(|plot| plot.requires_cache()) && self.cache.is_none()
        {
            let path = self.input_dir.join(&self.settings.cache_file);
            self.cache = Some(CacheLevels::load(&path).await?);
        }

        let ctx = PlotContext {
            settings: &self.settings,
            cache: self.cache.as_ref(),
        };
        let Some(chart) = build_chart(stem, &record, &ctx)? else {
            return Ok(None);
        };

        create_dir_all(&self.output_dir)
            .await
            .wrap_err_with(|| format!("Create {}", self.output_dir.display()))?;
        chart.finish(self.renderer.as_ref(), &self.output_dir).map(Some)
    }
}

/// `*.json`, except the cache table and rendered chart models
fn is_results_file(path: &Path, settings: &Settings) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") && name != settings.cache_file && !name.ends_with(".chart.json")
}
