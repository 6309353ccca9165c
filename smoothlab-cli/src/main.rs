//! SmoothLab CLI — backfill, range fetch, ledger, and streaming commands.
//!
//! Commands:
//! - `backfill` — walk backward year-by-year per instrument, store bars,
//!   record first listing years in the ledger
//! - `fetch` — fetch an explicit year range for one symbol
//! - `ledger list` — query the listing-year ledger
//! - `stream` — run an indicator over cached bars and emit its series

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use smoothlab_core::data::{
    backfill_universe, fetch_range, CircuitBreaker, CsvBarStore, ListingLedger, StdoutProgress,
    Universe, YahooProvider,
};
use smoothlab_core::domain::Sample;
use smoothlab_core::filter::WindowedCascade;
use smoothlab_core::stream::Fanout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "smoothlab",
    about = "SmoothLab CLI — streaming FIR indicators over daily bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk backward through the years per instrument, storing bars and
    /// recording each first listing year in the ledger.
    Backfill {
        /// Symbols to walk. Defaults to the universe file (or the
        /// built-in US list).
        symbols: Vec<String>,

        /// TOML universe file to take symbols from.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Bar store directory.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Ledger CSV path.
        #[arg(long, default_value = "data/listing_years.csv")]
        ledger: PathBuf,

        /// Most recent year to walk back from. Defaults to the current year.
        #[arg(long)]
        newest_year: Option<i32>,
    },
    /// Fetch an explicit inclusive year range for one symbol.
    Fetch {
        symbol: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        /// Bar store directory.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Listing-ledger queries.
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
    /// Stream an indicator over cached bars and emit its output series.
    Stream {
        symbol: String,

        #[arg(long, value_enum, default_value_t = IndicatorKind::Ema)]
        indicator: IndicatorKind,

        /// Filter length.
        #[arg(long, default_value_t = 10)]
        flen: usize,

        /// Decay parameter(s): one value for ema, three comma-separated
        /// values for trix/hull.
        #[arg(long, default_value = "0.3", value_delimiter = ',')]
        alpha: Vec<f64>,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        /// Bar store directory.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Write the output series as CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LedgerAction {
    /// List ledger rows, optionally only instruments listed before a year.
    List {
        #[arg(long)]
        before: Option<i32>,

        /// Ledger CSV path.
        #[arg(long, default_value = "data/listing_years.csv")]
        ledger: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IndicatorKind {
    Ema,
    Derivative,
    Zero,
    Trix,
    Hull,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backfill {
            symbols,
            universe,
            data_dir,
            ledger,
            newest_year,
        } => run_backfill(symbols, universe, data_dir, ledger, newest_year),
        Commands::Fetch {
            symbol,
            start_year,
            end_year,
            data_dir,
        } => run_fetch(&symbol, start_year, end_year, data_dir),
        Commands::Ledger { action } => match action {
            LedgerAction::List { before, ledger } => run_ledger_list(before, &ledger),
        },
        Commands::Stream {
            symbol,
            indicator,
            flen,
            alpha,
            start_year,
            end_year,
            data_dir,
            out,
        } => run_stream(
            &symbol, indicator, flen, &alpha, start_year, end_year, data_dir, out,
        ),
    }
}

fn run_backfill(
    symbols: Vec<String>,
    universe_path: Option<PathBuf>,
    data_dir: PathBuf,
    ledger_path: PathBuf,
    newest_year: Option<i32>,
) -> Result<()> {
    let symbols = if !symbols.is_empty() {
        symbols
    } else {
        let universe = match universe_path {
            Some(path) => Universe::from_file(&path)
                .with_context(|| format!("loading universe {}", path.display()))?,
            None => Universe::default_us(),
        };
        universe.all_tickers().iter().map(|s| s.to_string()).collect()
    };

    let newest_year = newest_year.unwrap_or_else(|| chrono::Local::now().year());
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker);
    let store = CsvBarStore::new(&data_dir);
    let mut ledger = ListingLedger::load(&ledger_path)?;

    let sym_refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
    let summary = backfill_universe(
        &provider,
        &store,
        &mut ledger,
        &ledger_path,
        &sym_refs,
        newest_year,
        &StdoutProgress,
    );

    if !summary.all_succeeded() {
        for (sym, err) in &summary.errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_fetch(symbol: &str, start_year: i32, end_year: i32, data_dir: PathBuf) -> Result<()> {
    if start_year > end_year {
        bail!("start year {start_year} is after end year {end_year}");
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker);
    let store = CsvBarStore::new(&data_dir);

    let stored = fetch_range(&provider, &store, symbol, start_year, end_year)?;
    println!("{symbol}: stored {stored} bars for {start_year}..={end_year}");
    Ok(())
}

fn run_ledger_list(before: Option<i32>, ledger_path: &Path) -> Result<()> {
    let ledger = ListingLedger::load(ledger_path)?;
    if ledger.is_empty() {
        println!("Ledger {} is empty", ledger_path.display());
        return Ok(());
    }

    match before {
        Some(year) => {
            for symbol in ledger.listed_before(year) {
                println!("{symbol}");
            }
        }
        None => {
            for (symbol, span) in ledger.entries() {
                println!("{symbol},{},{}", span.first_year, span.last_year);
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_stream(
    symbol: &str,
    kind: IndicatorKind,
    flen: usize,
    alphas: &[f64],
    start_year: i32,
    end_year: i32,
    data_dir: PathBuf,
    out: Option<PathBuf>,
) -> Result<()> {
    let cascade = build_cascade(kind, flen, alphas)?;
    let store = CsvBarStore::new(&data_dir);
    let bars = store
        .read_range(symbol, start_year, end_year)
        .with_context(|| format!("reading cached bars for {symbol}"))?;

    let mut fanout = Fanout::new(format!("{symbol} close"));
    let output = fanout.subscribe(format!("{symbol} {kind:?}"), cascade);
    for bar in &bars {
        let at = bar
            .date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid");
        fanout.deliver(Sample::new(at, bar.close))?;
    }

    let series = fanout.output(output).expect("subscription exists");
    match out {
        Some(path) => {
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            writer.write_record(["date", "value"])?;
            for sample in series.samples() {
                writer.write_record([sample.at.date().to_string(), sample.value.to_string()])?;
            }
            writer.flush()?;
            println!(
                "{}: wrote {} values to {}",
                series.name(),
                series.len(),
                path.display()
            );
        }
        None => {
            for sample in series.samples() {
                println!("{},{}", sample.at.date(), sample.value);
            }
        }
    }
    Ok(())
}

fn build_cascade(kind: IndicatorKind, flen: usize, alphas: &[f64]) -> Result<WindowedCascade> {
    let cascade = match kind {
        IndicatorKind::Ema => {
            let [alpha] = alphas else {
                bail!("ema takes exactly one alpha, got {}", alphas.len());
            };
            WindowedCascade::ema(flen, *alpha)?
        }
        IndicatorKind::Derivative => WindowedCascade::derivative(),
        IndicatorKind::Zero => WindowedCascade::zero_baseline(),
        IndicatorKind::Trix => {
            let [a1, a2, a3] = alphas else {
                bail!("trix takes exactly three alphas, got {}", alphas.len());
            };
            WindowedCascade::trix(flen, [*a1, *a2, *a3])?
        }
        IndicatorKind::Hull => {
            let [a1, a2, a3] = alphas else {
                bail!("hull takes exactly three alphas, got {}", alphas.len());
            };
            WindowedCascade::hull(flen, [*a1, *a2, *a3])?
        }
    };
    Ok(cascade)
}
