use std::io::{stderr, stdout};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use fraud_form_engine::engine::BatchEngine;
use fraud_form_engine::policy::{LocalClock, Preset, RandomSource, Scorer, ScoringPolicy, SeededRandom, ThreadRandom};
use fraud_form_engine::storage::VerdictStorage;

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Positional arguments keep the interface small, a richer CLI would move to the clap crate
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: fraud-form-engine [input].csv [preset:optional] [log_level:optional] [seed:optional] > [output].csv");
        eprintln!("Available presets: type-weighted, time-weighted (default: type-weighted)");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let preset = args.get(2)
        .map(|s| parse_preset(s)).unwrap_or_default();
    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);
    let seed = args.get(4).and_then(|s| parse_seed(s));

    setup_logging(log_level);

    let random: Arc<dyn RandomSource> = match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom)
    };

    let scorer = Scorer::new(ScoringPolicy::new(preset.config()), random, Arc::new(LocalClock));
    let storage = Arc::new(VerdictStorage::new());
    let engine = BatchEngine::new(storage.clone(), scorer);

    info!("Analyzing transactions with the [{preset}] preset");

    let timer = Instant::now();
    engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Analyzed {} transactions in: {duration:?}", storage.len());

    write_results_to_stdout(storage)?;

    Ok(())
}

fn parse_preset(preset: &str) -> Preset {
    preset.parse().unwrap_or_else(|error| {
        eprintln!("{error}, defaulting to '{}'", Preset::default());
        Preset::default()
    })
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn parse_seed(seed: &str) -> Option<u64> {
    match seed.parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            eprintln!("Invalid seed '{}', using an unseeded random source", seed);
            None
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Results go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_results_to_stdout(storage: Arc<VerdictStorage>) -> Result<()> {
    let mut output = csv::Writer::from_writer(stdout().lock());

    output.write_record(["transaction_id", "verdict", "confidence"])?;

    for (_, outcome) in storage.sorted() {
        let confidence = outcome.verdict.display_confidence()
            .map(|percentage| format!("{percentage:.1}"))
            .unwrap_or_default();

        output.write_record([outcome.transaction_id.as_str(), outcome.verdict.label(), confidence.as_str()])?;
    }

    output.flush()?;

    Ok(())
}
