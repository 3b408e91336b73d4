//! ChartDeck CLI: generate bars, compute chart series, read the crosshair.
//!
//! Commands:
//! - `generate` - write a synthetic random-walk bar history as CSV
//! - `indicators` - print the chart snapshot (candles, volume, enabled indicators) as JSON
//! - `readout` - print the crosshair values at one bar time as JSON
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `warn`).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chartdeck_core::chart::ChartContext;
use chartdeck_core::config::ChartConfig;
use chartdeck_core::data::{write_bars, write_bars_to, BarSource, CsvSource, SyntheticSource};
use chartdeck_core::domain::{Timeframe, Timestamp};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartdeck",
    version,
    about = "ChartDeck CLI - candlestick chart indicator engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic bar history as CSV.
    Generate {
        /// Symbol name; also seeds the generator when --seed is absent.
        #[arg(long)]
        symbol: Option<String>,

        /// Bar spacing: minutes (1, 5, 15, 60) or D for daily.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Number of bars.
        #[arg(long)]
        count: Option<usize>,

        /// Random seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Unix seconds the history ends at. Defaults to the start of the
        /// current timeframe interval.
        #[arg(long)]
        end_time: Option<Timestamp>,

        /// Output CSV path. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to a TOML chart config providing defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute every enabled indicator and print the chart snapshot as JSON.
    Indicators {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the crosshair readout at one bar time as JSON.
    Readout {
        /// Bar open time in unix seconds.
        #[arg(long)]
        time: Timestamp,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// CSV file with time,open,high,low,close[,volume]. Synthetic bars when absent.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to a TOML chart config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured timeframe.
    #[arg(long)]
    timeframe: Option<Timeframe>,

    /// Override the configured end time of synthetic bars (unix seconds).
    #[arg(long)]
    end_time: Option<Timestamp>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            symbol,
            timeframe,
            count,
            seed,
            end_time,
            output,
            config,
        } => run_generate(symbol, timeframe, count, seed, end_time, output, config),
        Commands::Indicators { source, pretty } => run_indicators(&source, pretty),
        Commands::Readout { time, source } => run_readout(time, &source),
    }
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ChartConfig::default()),
    }
}

/// Synthetic source from config values; explicit seed and end time are
/// applied when present.
fn synthetic_feed(
    symbol: String,
    timeframe: Timeframe,
    count: usize,
    seed: Option<u64>,
    end_time: Option<Timestamp>,
) -> SyntheticSource {
    let mut feed = SyntheticSource::new(symbol, timeframe).with_count(count);
    if let Some(seed) = seed {
        feed = feed.with_seed(seed);
    }
    if let Some(end_time) = end_time {
        feed = feed.with_end_time(end_time);
    }
    feed
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    symbol: Option<String>,
    timeframe: Option<Timeframe>,
    count: Option<usize>,
    seed: Option<u64>,
    end_time: Option<Timestamp>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let feed = synthetic_feed(
        symbol.unwrap_or(config.data.symbol),
        timeframe.unwrap_or(config.data.timeframe),
        count.unwrap_or(config.data.bar_count),
        seed.or(config.data.seed),
        end_time.or(config.data.end_time),
    );

    let bars = feed
        .load()
        .with_context(|| format!("failed to generate bars for {}", feed.symbol))?;

    match output {
        Some(path) => write_bars(&path, &bars)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => write_bars_to(std::io::stdout().lock(), &bars)
            .context("failed to write bars to stdout")?,
    }

    info!(
        symbol = %feed.symbol,
        bars = bars.len(),
        seed = feed.effective_seed(),
        "generated synthetic history"
    );
    Ok(())
}

/// Build the chart context from either the CSV input or the configured
/// synthetic source.
fn load_chart(args: &SourceArgs) -> Result<(ChartContext, ChartConfig)> {
    let config = load_config(args.config.as_deref())?;
    let timeframe = args.timeframe.unwrap_or(config.data.timeframe);

    let source: Box<dyn BarSource> = match &args.input {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(synthetic_feed(
            config.data.symbol.clone(),
            timeframe,
            config.data.bar_count,
            config.data.seed,
            args.end_time.or(config.data.end_time),
        )),
    };

    let bars = source
        .load()
        .with_context(|| format!("failed to load bars from {}", source.name()))?;
    info!(source = %source.name(), kind = ?source.kind(), bars = bars.len(), "loaded bars");

    Ok((ChartContext::new(bars, timeframe), config))
}

fn run_indicators(args: &SourceArgs, pretty: bool) -> Result<()> {
    let (ctx, config) = load_chart(args)?;
    let snapshot = ctx.snapshot(&config.indicators);
    print_json(&snapshot, pretty)
}

fn run_readout(time: Timestamp, args: &SourceArgs) -> Result<()> {
    let (ctx, config) = load_chart(args)?;
    let snapshot = ctx.snapshot(&config.indicators);

    let Some(readout) = ctx.readout(time, &snapshot) else {
        let range = ctx
            .time_bounds()
            .map(|b| format!("{} .. {}", format_time(b.min), format_time(b.max)))
            .unwrap_or_else(|| "no bars".into());
        bail!("no bar opens at {} (chart covers {range})", format_time(time));
    };

    info!(time = %format_time(time), "crosshair readout");
    print_json(&readout, true)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize JSON")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write to stdout")?;
    Ok(())
}

/// Unix seconds as `YYYY-MM-DD HH:MM UTC`, falling back to the raw number.
fn format_time(time: Timestamp) -> String {
    chrono::DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_readout_args() {
        let cli = Cli::try_parse_from([
            "chartdeck",
            "readout",
            "--time",
            "1700000000",
            "--timeframe",
            "D",
        ])
        .unwrap();
        match cli.command {
            Commands::Readout { time, source } => {
                assert_eq!(time, 1_700_000_000);
                assert_eq!(source.timeframe, Some(Timeframe::Daily));
                assert!(source.input.is_none());
            }
            _ => panic!("expected readout command"),
        }
    }

    #[test]
    fn rejects_bad_timeframe() {
        assert!(Cli::try_parse_from(["chartdeck", "generate", "--timeframe", "W"]).is_err());
    }

    #[test]
    fn formats_unix_time() {
        assert_eq!(format_time(0), "1970-01-01 00:00 UTC");
    }

    fn source_args(input: Option<PathBuf>, config: Option<PathBuf>) -> SourceArgs {
        SourceArgs {
            input,
            config,
            timeframe: None,
            end_time: None,
        }
    }

    fn write_config(dir: &Path, toml: &str) -> PathBuf {
        let path = dir.join("chart.toml");
        std::fs::write(&path, toml).unwrap();
        path
    }

    #[test]
    fn synthetic_chart_uses_config_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[data]\nbar_count = 50\nseed = 3\n");

        let (ctx, config) = load_chart(&source_args(None, Some(path))).unwrap();
        assert_eq!(ctx.len(), 50);
        assert_eq!(ctx.timeframe(), config.data.timeframe);
        let last = ctx.time_bounds().unwrap().max;
        assert_eq!(last % config.data.timeframe.seconds(), 0);
    }

    #[test]
    fn synthetic_chart_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let toml = "[data]\nbar_count = 50\nseed = 3\nend_time = 1720000000\n";
        let path = write_config(dir.path(), toml);
        let args = source_args(None, Some(path));

        let (first, config) = load_chart(&args).unwrap();
        let (second, _) = load_chart(&args).unwrap();
        assert_eq!(first.bars(), second.bars());

        let time = first.bars()[10].time;
        let snapshot = second.snapshot(&config.indicators);
        let readout = second.readout(time, &snapshot).unwrap();
        assert_eq!(readout.close, first.bars()[10].close);
        assert!(run_readout(time, &args).is_ok());
    }

    #[test]
    fn end_time_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[data]\nbar_count = 10\nend_time = 1720000000\n");
        let mut args = source_args(None, Some(path));
        args.end_time = Some(1_730_000_000);

        let (ctx, config) = load_chart(&args).unwrap();
        let step = config.data.timeframe.seconds();
        assert_eq!(ctx.time_bounds().unwrap().max, 1_730_000_000 - step);
    }

    #[test]
    fn readout_at_unknown_time_fails() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("bars.csv");
        run_generate(
            None,
            None,
            Some(30),
            Some(9),
            Some(1_720_000_000),
            Some(csv.clone()),
            None,
        )
        .unwrap();

        let args = source_args(Some(csv), None);
        let (ctx, _) = load_chart(&args).unwrap();
        let first = ctx.bars()[0].time;
        assert!(run_readout(first, &args).is_ok());

        let err = run_readout(first + 1, &args).unwrap_err();
        assert!(err.to_string().contains("no bar opens at"), "{err}");
    }

    #[test]
    fn generate_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("demo.csv");
        run_generate(
            Some("ACME".into()),
            Some(Timeframe::Minutes(15)),
            Some(40),
            Some(1),
            Some(1_720_000_800),
            Some(csv.clone()),
            None,
        )
        .unwrap();

        let bars = chartdeck_core::data::read_bars(&csv).unwrap();
        assert_eq!(bars.len(), 40);
        assert_eq!(bars[1].time - bars[0].time, 900);
        assert_eq!(bars[39].time, 1_720_000_800 - 900);
    }

    #[test]
    fn generate_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("missing").join("demo.csv");
        let result = run_generate(None, None, Some(5), Some(1), None, Some(csv), None);
        assert!(result.is_err());
    }
}
