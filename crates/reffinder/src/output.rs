//! Tree rendering for terminal and JSON output.

use std::env;
use std::io::{self, Write};

use colored::Colorize;

use crate::tree::TreeNode;
use crate::types::{AssetState, Direction};

/// Configuration for output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only connectors instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `REFFINDER_ASCII`: set to "1" or "true" for ASCII-only connectors
    /// - `NO_COLOR`: standard env var to disable colors (any value disables colors)
    #[must_use]
    pub fn from_env() -> Self {
        let use_ascii = match env::var("REFFINDER_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "REFFINDER_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        Self {
            use_ascii,
            use_colors: env::var("NO_COLOR").is_err(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Render a materialized tree with ASCII/Unicode connectors.
///
/// Each selected asset starts its own block:
/// ```text
/// ◆ Hero.prefab
/// ├── Sword.asset
/// │   └── Steel.mat
/// └── Shield.asset [changed]
/// ```
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn write_tree_text<W: Write>(
    w: &mut W,
    root: &TreeNode<'_>,
    direction: Direction,
    config: &OutputConfig,
) -> io::Result<()> {
    if root.children.is_empty() {
        let message = "No matching assets selected.";
        if config.use_colors {
            writeln!(w, "{}", message.dimmed())?;
        } else {
            writeln!(w, "{message}")?;
        }
        return Ok(());
    }

    let root_icon = if config.use_ascii { "*" } else { "◆" };
    let root_icon = if config.use_colors {
        root_icon.cyan().bold().to_string()
    } else {
        root_icon.to_string()
    };

    for (i, selected) in root.children.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "{} {}", root_icon, node_label(selected, config))?;
        write_children(w, &selected.children, &[], config)?;
        if selected.children.is_empty() {
            let empty = match direction {
                Direction::Dependencies => "(no dependencies)",
                Direction::References => "(not referenced)",
            };
            if config.use_colors {
                writeln!(w, "  {}", empty.dimmed())?;
            } else {
                writeln!(w, "  {empty}")?;
            }
        }
    }
    Ok(())
}

/// Recursively render children with connector lines.
///
/// `prefix_segments` tracks which ancestor levels still have siblings below,
/// used to draw the vertical continuation lines.
fn write_children<W: Write>(
    w: &mut W,
    children: &[TreeNode<'_>],
    prefix_segments: &[bool],
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;

        let mut prefix = String::new();
        for &has_more in prefix_segments {
            let segment = if has_more { pipe } else { space };
            if config.use_colors {
                prefix.push_str(&segment.dimmed().to_string());
            } else {
                prefix.push_str(segment);
            }
        }

        let connector = if is_last { corner } else { branch };
        let connector = if config.use_colors {
            connector.dimmed().to_string()
        } else {
            connector.to_string()
        };

        writeln!(w, "{}{}{}", prefix, connector, node_label(child, config))?;

        if !child.children.is_empty() {
            let mut next_segments = prefix_segments.to_vec();
            next_segments.push(!is_last);
            write_children(w, &child.children, &next_segments, config)?;
        }
    }
    Ok(())
}

/// Display name plus a state marker for anything not known to be current.
fn node_label(node: &TreeNode<'_>, config: &OutputConfig) -> String {
    let state = node.record.map_or(AssetState::Unchanged, |r| r.state);
    let marker = match state {
        AssetState::Unchanged => return node.display_name.clone(),
        AssetState::Changed => "[changed]",
        AssetState::Missing => "[missing]",
        AssetState::NoData => "[no data]",
    };
    let marker = if config.use_colors {
        match state {
            AssetState::Missing => marker.red().to_string(),
            _ => marker.yellow().to_string(),
        }
    } else {
        marker.to_string()
    };
    format!("{} {}", node.display_name, marker)
}

/// Convert a materialized tree to JSON for programmatic output.
#[must_use]
pub fn tree_to_json(root: &TreeNode<'_>, direction: Direction) -> serde_json::Value {
    serde_json::json!({
        "direction": direction,
        "roots": root.children.iter().map(node_to_json).collect::<Vec<_>>(),
    })
}

fn node_to_json(node: &TreeNode<'_>) -> serde_json::Value {
    let mut obj = serde_json::json!({
        "node": node.id,
        "depth": node.depth,
        "name": node.display_name,
    });
    if let Some(record) = node.record {
        obj["id"] = serde_json::json!(record.id);
        obj["path"] = serde_json::json!(record.path);
        obj["state"] = serde_json::json!(record.state);
    }
    obj["children"] = serde_json::json!(node
        .children
        .iter()
        .map(node_to_json)
        .collect::<Vec<_>>());
    obj
}
