//! `reffinder stats` command implementation.

use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;
use reffinder::{AssetState, Config, Session};

/// Run the stats command.
pub fn run(root: &Path, config: Config) -> Result<(), reffinder::Error> {
    let session = Session::open(root, config)?;
    let index = session.index();

    let cache_path = session.cache_path();
    let cache_size = match std::fs::metadata(&cache_path) {
        Ok(meta) => format_size(meta.len()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get cache file size");
            "not written".to_string()
        }
    };

    println!("{}", "Reference Index Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} ({})",
        "Cache".white().bold(),
        cache_path.display(),
        cache_size
    );
    if let Some(built_at) = index.built_at() {
        println!(
            "  {}: {}",
            "Built".white().bold(),
            built_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if let Some(fingerprint) = index.fingerprint() {
        println!("  {}: {}", "Fingerprint".white().bold(), fingerprint);
    }
    println!();

    println!(
        "  {}: {}",
        "Assets".white().bold(),
        index.len().to_string().green()
    );
    println!(
        "  {}: {}",
        "Dependency Edges".white().bold(),
        index.edge_count().to_string().green()
    );

    let mut by_state: HashMap<AssetState, usize> = HashMap::new();
    for record in index.records() {
        *by_state.entry(record.state).or_default() += 1;
    }
    for state in [
        AssetState::Unchanged,
        AssetState::Changed,
        AssetState::Missing,
        AssetState::NoData,
    ] {
        if let Some(count) = by_state.get(&state) {
            println!("    {}: {}", state.to_string().dimmed(), count);
        }
    }

    let unreferenced = index.records().filter(|r| r.references.is_empty()).count();
    println!(
        "  {}: {}",
        "Unreferenced Assets".white().bold(),
        unreferenced.to_string().yellow()
    );

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
