//! Common display utilities for CLI commands.

use colored::Colorize;
use reffinder::{IndexStats, LoadOutcome, ScanIssue};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Describe where the index came from: the cache, or a fresh build.
pub fn print_index_origin(outcome: &LoadOutcome, stats: Option<&IndexStats>) {
    match (outcome, stats) {
        (LoadOutcome::Loaded { assets }, None) => {
            println!(
                "{} {} assets from cache",
                "Loaded".green().bold(),
                assets.to_string().cyan()
            );
        }
        (_, Some(stats)) => {
            println!(
                "{} {} assets, {} dependency edges in {:.2?}",
                "Indexed".green().bold(),
                stats.assets_indexed.to_string().cyan(),
                stats.dependency_edges.to_string().cyan(),
                stats.duration
            );
            if stats.unresolved_references > 0 {
                println!(
                    "  {} references to unknown assets dropped",
                    stats.unresolved_references.to_string().yellow()
                );
            }
            print_issues("Unreadable assets", &stats.unreadable);
        }
        (other, None) => println!("{}", other.to_string().dimmed()),
    }
}

/// Display scan issues with truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` issues with bullet points. If there are
/// more, shows "... and N more". Prints nothing when there are none.
pub fn print_issues(title: &str, issues: &[ScanIssue]) {
    if issues.is_empty() {
        return;
    }

    println!("  {} ({}):", title.yellow().bold(), issues.len());
    for issue in issues.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {}", "•".dimmed(), issue);
    }

    if issues.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            issues.len() - MAX_DISPLAY_ITEMS
        );
    }
}
