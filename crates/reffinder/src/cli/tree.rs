//! `reffinder deps`, `refs` and `tree` command implementation.

use std::io::{self, Write};
use std::path::Path;

use reffinder::output::{tree_to_json, write_tree_text, OutputConfig};
use reffinder::{Config, Direction, Session};

/// Options for a tree command.
pub struct TreeOptions {
    /// Selected asset or folder paths
    pub paths: Vec<String>,
    /// Skip refreshing visited assets
    pub no_refresh: bool,
    /// Emit JSON instead of text
    pub json: bool,
    /// Force ASCII connectors
    pub ascii: bool,
}

/// Run a tree command in `direction`.
pub fn run(
    root: &Path,
    config: Config,
    options: &TreeOptions,
    direction: Direction,
) -> Result<(), reffinder::Error> {
    let refresh = config.refresh_before_visit && !options.no_refresh;
    let mut session = Session::open(root, config)?;

    let tree = session.materialize(&options.paths, direction, refresh);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if options.json {
        let json = tree_to_json(&tree, direction);
        let text = serde_json::to_string_pretty(&json)?;
        writeln!(handle, "{text}")?;
    } else {
        let mut output = OutputConfig::from_env();
        output.use_ascii |= options.ascii;
        write_tree_text(&mut handle, &tree, direction, &output)?;
    }
    drop(tree);

    // Keep refreshed records for the next run
    if refresh {
        if let Err(e) = session.save() {
            tracing::warn!(error = %e, "Failed to update index cache");
        }
    }
    Ok(())
}
