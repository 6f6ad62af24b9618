use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use common::{
    config::Settings,
    render::{ChartRenderer, JsonRenderer, SvgRenderer},
};
use eyre::{Context, Result};
use result_plots::ResultPlotter;
use tokio::fs::read_to_string;
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const MODULES: &[&str] = &["common", "result_plots"];

#[derive(Parser)]
#[command(about = "Plot benchmark results")]
struct Cli {
    /// Results to plot, by file stem. Every results file is plotted when empty
    stems: Vec<String>,
    /// Directory with the results files and the cache table
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
    /// Output directory, defaults to the results directory
    #[arg(short, long)]
    out: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,
    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    /// The chart model as JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(&args.log)?;

    if let Err(err) = run(args).await {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}

fn init_logging(directives: &[String]) -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let mut env_filter = EnvFilter::new(format!("perfplots={log_level}"));
    for directive in directives {
        env_filter = env_filter.add_directive(directive.parse()?);
    }
    for module in MODULES {
        if !directives.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();
    Ok(())
}

async fn run(args: Cli) -> Result<()> {
    let settings = match &args.config {
        Some(path) => load_settings(path).await?,
        None => Settings::default(),
    };
    debug!("Settings: {settings:?}");

    let renderer: Box<dyn ChartRenderer> = match args.format {
        Format::Svg => Box::new(SvgRenderer {
            width: settings.width,
            height: settings.height,
        }),
        Format::Json => Box::new(JsonRenderer),
    };
    let out = args.out.unwrap_or_else(|| args.dir.clone());
    let mut plotter = ResultPlotter::new(settings, args.dir, out, renderer);

    if args.stems.is_empty() {
        println!("Generating all plots...");
        plotter.plot_all().await?;
    } else {
        for stem in &args.stems {
            plotter.plot_results(stem_of(stem)).await?;
        }
    }
    Ok(())
}

async fn load_settings(path: &Path) -> Result<Settings> {
    let data = read_to_string(path)
        .await
        .wrap_err_with(|| format!("Read {}", path.display()))?;
    parse_settings(&data).wrap_err_with(|| format!("Parse {}", path.display()))
}

fn parse_settings(data: &str) -> Result<Settings> {
    Ok(serde_yml::from_str(data)?)
}

/// Accepts `name` as well as `name.json`
fn stem_of(arg: &str) -> &str {
    arg.strip_suffix(".json").unwrap_or(arg)
}
