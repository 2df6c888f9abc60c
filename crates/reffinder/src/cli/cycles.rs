//! `reffinder cycles` command implementation.

use std::path::Path;

use colored::Colorize;
use reffinder::{Config, Session};

/// Run the cycles command.
pub fn run(root: &Path, config: Config) -> Result<(), reffinder::Error> {
    let session = Session::open(root, config)?;
    let index = session.index();

    let cycles = index.find_cycles();

    if cycles.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular dependencies:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);

        for id in &cycle.assets {
            let label = index
                .lookup(id)
                .map_or_else(|| id.to_string(), |r| r.path.clone());
            println!("    {} {}", "•".dimmed(), label);
        }
    }

    Ok(())
}
