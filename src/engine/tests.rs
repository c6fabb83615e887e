use super::BatchEngine;

use anyhow::{anyhow, Result};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::time::Instant;

use crate::models::Verdict;
use crate::policy::{FixedClock, Preset, RandomSource, Scorer, ScoringPolicy};
use crate::storage::{Storage, VerdictStorage};

const HEADER: &str = "transaction_id,transaction_date,amount,merchant_id,transaction_type,location";

struct ConstantRandom(f64);

impl RandomSource for ConstantRandom {
    fn draw(&self) -> f64 {
        self.0
    }
}

fn create_engine(storage: Arc<VerdictStorage>, preset: Preset, draw: f64) -> BatchEngine {
    let scorer = Scorer::new(ScoringPolicy::new(preset.config()), Arc::new(ConstantRandom(draw)), Arc::new(FixedClock(12)));
    BatchEngine::new(storage, scorer)
}

fn create_temporary_csv(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{HEADER}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    Ok(file)
}

fn path_of(file: &NamedTempFile) -> Result<&str> {
    file.path().to_str().ok_or_else(|| anyhow!("Temporary path is not valid UTF-8"))
}

#[tokio::test(start_paused = true)]
async fn test_engine_scores_every_row_in_its_own_session() -> Result<()> {
    let file = create_temporary_csv(&[
        "TXN-1,2026-10-19T10:00,6000,MER-1,online,Chicago",
        "TXN-2,2026-10-19T10:05,100,MER-2,purchase,Chicago",
        "TXN-3,2026-10-19T10:10,7500,MER-3,refund,Chicago"
    ])?;

    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TypeWeighted, 0.5);
    engine.run(path_of(&file)?).await?;

    let outcomes = storage.sorted();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].1.transaction_id, "TXN-1");
    assert_eq!(outcomes[0].1.verdict, Verdict::Fraudulent);
    assert_eq!(outcomes[1].1.verdict, Verdict::Legitimate);
    assert_eq!(outcomes[2].1.verdict, Verdict::Legitimate);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_engine_leaves_incomplete_rows_unset() -> Result<()> {
    let file = create_temporary_csv(&[
        "TXN-1,2026-10-19T10:00,15000,MER-1,transfer,Oslo",
        "TXN-2,2026-10-19T10:05,,MER-2,payment,Oslo",
        "TXN-3,2026-10-19T10:10,200"
    ])?;

    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TimeWeighted, 0.5);
    engine.run(path_of(&file)?).await?;

    let first = storage.load(0).ok_or_else(|| anyhow!("Row 0 missing from storage"))?;
    let second = storage.load(1).ok_or_else(|| anyhow!("Row 1 missing from storage"))?;
    let third = storage.load(2).ok_or_else(|| anyhow!("Row 2 missing from storage"))?;

    assert_eq!(first.verdict, Verdict::Fraudulent);
    assert_eq!(second.verdict, Verdict::Unset);
    assert_eq!(third.transaction_id, "TXN-3");
    assert_eq!(third.verdict, Verdict::Unset);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_engine_gracefully_skips_malformed_csv_input() -> Result<()> {
    let mut file = create_temporary_csv(&["TXN-1,2026-10-19T10:00,100,MER-1,purchase,Rome"])?;
    file.write_all(b"TXN-\xFF,2026-10-19T10:05,100,MER-2,purchase,Rome\n")?;
    writeln!(file, "TXN-3,2026-10-19T10:10,100,MER-3,purchase,Rome")?;

    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TypeWeighted, 0.95);
    engine.run(path_of(&file)?).await?;

    assert_eq!(storage.len(), 2);
    assert!(storage.load(1).is_none());
    assert_eq!(storage.load(2).map(|outcome| outcome.verdict), Some(Verdict::Fraudulent));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_engine_handles_missing_csv_file_without_error() -> Result<()> {
    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TypeWeighted, 0.5);

    assert!(engine.run("missing.csv").await.is_ok());
    assert_eq!(storage.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_engine_completes_with_minimal_backpressure() -> Result<()> {
    let rows: Vec<String> = (0..20)
        .map(|n| format!("TXN-{n},2026-10-19T11:00,{},MER-{n},atm,Lyon", n * 1000))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let file = create_temporary_csv(&row_refs)?;

    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TypeWeighted, 0.5)
        .with_backpressure(1);
    engine.run(path_of(&file)?).await?;

    let outcomes = storage.sorted();

    assert_eq!(outcomes.len(), 20);
    assert!(outcomes.iter().all(|(_, outcome)| outcome.verdict.is_set()));
    assert_eq!(outcomes[19].1.transaction_id, "TXN-19");

    Ok(())
}

#[tokio::test]
async fn test_engine_limits_concurrent_sessions_to_backpressure() -> Result<()> {
    let rows: Vec<String> = (0..6)
        .map(|n| format!("TXN-{n},2026-10-19T11:00,100,MER-{n},purchase,Graz"))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let file = create_temporary_csv(&row_refs)?;

    let storage = Arc::new(VerdictStorage::new());
    let engine = create_engine(storage.clone(), Preset::TypeWeighted, 0.5)
        .with_backpressure(2);

    let started = Instant::now();
    engine.run(path_of(&file)?).await?;

    // Six rows, two at a time, each waiting out the two second scoring delay
    assert!(started.elapsed() >= Duration::from_millis(6000), "elapsed {:?}", started.elapsed());
    assert_eq!(storage.len(), 6);

    Ok(())
}
