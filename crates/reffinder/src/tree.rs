//! Cycle-safe tree materialization.
//!
//! A tree is built by a depth-first walk from each selected root, following
//! either dependency or reference edges. The walk keeps an explicit stack of
//! the asset IDs on the current path:
//!
//! - an ID already on the path is not expanded again, which guarantees
//!   termination on cyclic graphs
//! - an ID reached through a different path (a diamond) is expanded again,
//!   producing a second node for the same record
//!
//! When refreshing is requested, each distinct asset is refreshed at most once
//! per walk, just before its node is created, so the edges followed are the
//! ones in the asset's current content.
//!
//! The walk runs in two stages. The first stage mutates the index (refreshes)
//! and records the tree shape by asset ID; the second stage borrows the index
//! immutably and attaches records to nodes. The shape is fixed when each node
//! is visited, so a later refresh in the same walk never reshapes a subtree
//! that was already built.

use std::collections::HashSet;

use tracing::debug;

use crate::corpus::Corpus;
use crate::index::DependencyIndex;
use crate::types::{AssetId, AssetRecord, Direction};

/// Display name of the synthetic root.
pub const ROOT_DISPLAY_NAME: &str = "Root";

/// A node in a materialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<'a> {
    /// Sequential node number: 0 for the synthetic root, then pre-order
    pub id: u32,
    /// Depth below the synthetic root (-1); selected roots are depth 0
    pub depth: i32,
    /// Text shown for the node
    pub display_name: String,
    /// Record the node represents; `None` only for the synthetic root
    pub record: Option<&'a AssetRecord>,
    /// Child nodes in edge order
    pub children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    /// Whether this is the synthetic root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.record.is_none()
    }

    /// Asset represented by this node.
    #[must_use]
    pub fn asset_id(&self) -> Option<&'a AssetId> {
        self.record.map(|r| &r.id)
    }

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode<'a>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Tree shape recorded during the mutating stage.
struct Shape {
    id: u32,
    depth: i32,
    asset: AssetId,
    children: Vec<Shape>,
}

struct Walk<'i, 'c, C: ?Sized> {
    index: &'i mut DependencyIndex,
    corpus: &'c C,
    direction: Direction,
    refresh_before_visit: bool,
    path: Vec<AssetId>,
    refreshed: HashSet<AssetId>,
    next_id: u32,
}

impl<C: Corpus + ?Sized> Walk<'_, '_, C> {
    fn visit(&mut self, id: &AssetId, depth: i32) -> Option<Shape> {
        // Cycle-break rule: never expand an ancestor of this node
        if self.path.contains(id) {
            debug!(asset = %id, depth, "Cycle detected, not expanding");
            return None;
        }

        if self.refresh_before_visit && self.refreshed.insert(id.clone()) {
            self.index.refresh(self.corpus, id);
        }

        let Some(record) = self.index.lookup(id) else {
            debug!(asset = %id, "Dangling reference, node omitted");
            return None;
        };
        let edges = record.edges(self.direction).to_vec();

        self.next_id += 1;
        let node_id = self.next_id;

        self.path.push(id.clone());
        let children = edges
            .iter()
            .filter_map(|child| self.visit(child, depth + 1))
            .collect();
        self.path.pop();

        Some(Shape {
            id: node_id,
            depth,
            asset: id.clone(),
            children,
        })
    }
}

/// Build the tree for `root_ids`, following `direction`.
///
/// Returns a synthetic root (id 0, depth -1, no record) with one child per
/// root ID that resolves to a record, in the given order. Unknown IDs and
/// edges closing a cycle simply produce no node. With
/// `refresh_before_visit`, every distinct asset reached is refreshed from
/// `corpus` once, before its node is built.
///
/// A child is attached because of its parent's edge list as read when the
/// parent was visited; the child's own refresh may have since removed the
/// mirror edge.
pub fn materialize<'a, C: Corpus + ?Sized>(
    index: &'a mut DependencyIndex,
    corpus: &C,
    root_ids: &[AssetId],
    direction: Direction,
    refresh_before_visit: bool,
) -> TreeNode<'a> {
    let shapes: Vec<Shape> = {
        let mut walk = Walk {
            index: &mut *index,
            corpus,
            direction,
            refresh_before_visit,
            path: Vec::new(),
            refreshed: HashSet::new(),
            next_id: 0,
        };
        root_ids
            .iter()
            .filter_map(|id| walk.visit(id, 0))
            .collect()
    };

    let index: &'a DependencyIndex = index;
    let root = TreeNode {
        id: 0,
        depth: -1,
        display_name: ROOT_DISPLAY_NAME.to_string(),
        record: None,
        children: shapes.into_iter().filter_map(|s| attach(index, s)).collect(),
    };
    debug!(
        roots = root_ids.len(),
        nodes = root.node_count() - 1,
        %direction,
        refresh_before_visit,
        "Tree materialized"
    );
    root
}

/// Attach records to a recorded shape. Records are never removed during a
/// walk, so every shape resolves.
fn attach(index: &DependencyIndex, shape: Shape) -> Option<TreeNode<'_>> {
    let record = index.lookup(&shape.asset)?;
    Some(TreeNode {
        id: shape.id,
        depth: shape.depth,
        display_name: record.name.clone(),
        record: Some(record),
        children: shape
            .children
            .into_iter()
            .filter_map(|child| attach(index, child))
            .collect(),
    })
}
