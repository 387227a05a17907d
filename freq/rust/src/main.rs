use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use freq::chart::Chart;
use freq::tokenize::Mode;
use freq::FrequencyIndex;
use tracing::{info, warn};

mod config;
mod telemetry;

fn main() -> Result<()> {
    telemetry::init()?;
    let config = config::get();

    info!(%config, "initialized config");

    let mut index = FrequencyIndex::new();
    for path in &config.files {
        ingest_file(&mut index, path, config.mode)?;
    }

    let length = chart_length(config.length, index.distinct_token_count());
    let rows = index.extract_top(length)?;
    let chart = Chart::new(&rows, index.total_token_count(), config.scaling);

    let mut out = BufWriter::new(io::stdout().lock());
    write!(out, "{chart}")?;
    out.flush()?;

    Ok(())
}

/// Clamps the requested row count to what the index can deliver.
fn chart_length(requested: usize, available: usize) -> usize {
    if requested > available {
        warn!(requested, available, "not enough distinct tokens, charting all of them");
        return available;
    }

    requested
}

fn ingest_file(index: &mut FrequencyIndex, path: &Path, mode: Mode) -> Result<u64> {
    let bytes = fs::read(path).with_context(|| format!("cannot open {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let count = index
        .ingest_text(&text, mode)
        .with_context(|| format!("failed to count tokens in {}", path.display()))?;

    info!(path = %path.display(), tokens = count, distinct = index.distinct_token_count(), "ingested file");
    Ok(count)
}
