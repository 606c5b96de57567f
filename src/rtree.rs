//! ## R-tree Implementation
//!
//! This module implements Guttman's R-tree over axis-aligned rectangles in
//! the integer 2D plane, with quadratic node splitting. The tree supports
//! dynamic insertion of points and rectangles, window (overlap) search, and
//! a pre-order traversal used for printing and testing.
//!
//! Nodes live in an arena owned by the tree and refer to each other through
//! stable [`NodeId`] indices; each non-root node records the parent entry
//! that covers it as a `(node, slot)` pair. Fan-out is fixed at 2..=4
//! entries per non-root node.
//!
//! # Examples
//!
//! ```
//! use grit::geometry::{Point, Rect};
//! use grit::rtree::RTree;
//!
//! let mut tree = RTree::new();
//! tree.insert(Point::new(3, 3), Point::new(3, 3)).unwrap();
//! tree.insert(Point::new(10, 4), Point::new(12, 6)).unwrap();
//!
//! let window = Rect::new(Point::new(0, 0), Point::new(10, 10));
//! // Touching edges count as overlap, so both rectangles match.
//! assert_eq!(tree.range_search(&window).len(), 2);
//! ```

use crate::errors::GritError;
use crate::geometry::{Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::mem;
use tracing::{debug, info};

/// Maximum number of entries a node may hold.
pub const MAX_ENTRIES: usize = 4;
/// Minimum number of entries a non-root node may hold.
pub const MIN_ENTRIES: usize = 2;

/// Stable index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

/// Location of the entry that covers a node: the parent node and the slot of
/// the entry within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParentLink {
    pub node: NodeId,
    pub slot: usize,
}

/// An entry in a node: an MBR plus, for non-leaf nodes, the covered subtree.
/// Leaf entries have no child; their MBR is the indexed rectangle itself.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    mbr: Rect,
    child: Option<NodeId>,
}

impl Entry {
    /// Returns the minimum bounding rectangle of this entry.
    pub fn mbr(&self) -> Rect {
        self.mbr
    }

    /// Returns the subtree covered by this entry, or `None` for leaf entries.
    pub fn child(&self) -> Option<NodeId> {
        self.child
    }
}

/// A node in the R-tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    is_leaf: bool,
    entries: Vec<Entry>,
    parent: Option<ParentLink>,
}

impl Node {
    /// Indicates whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Returns the entries stored in this node, in insertion/split order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the parent entry covering this node, or `None` for the root.
    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }
}

/// Node classification reported by [`RTree::preorder`].
///
/// A root that is also a leaf reports as `Leaf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Internal,
    Leaf,
}

/// Outcome of inserting into a subtree, consumed bottom-up by the adjuster.
#[derive(Clone, Copy)]
enum SplitOutcome {
    /// The node absorbed the change without splitting.
    Unchanged(NodeId),
    /// The node split; `left` reuses the original arena slot, `right` is new.
    Split { left: NodeId, right: NodeId },
}

/// R-tree over integer rectangles with quadratic node splitting.
///
/// The tree starts as a single empty leaf and grows in height only when the
/// root splits. All leaves sit at the same depth at all times.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RTree {
    nodes: Vec<Node>,
    root: NodeId,
    len: usize,
}

impl RTree {
    /// Creates an empty R-tree whose root is a single empty leaf.
    pub fn new() -> Self {
        info!("Creating new RTree");
        RTree {
            nodes: vec![Node {
                is_leaf: true,
                entries: Vec::with_capacity(MAX_ENTRIES + 1),
                parent: None,
            }],
            root: NodeId(0),
            len: 0,
        }
    }

    /// Returns the number of rectangles stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no rectangle has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels in the tree; a tree whose root is a leaf
    /// has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.root;
        while !self.node(node).is_leaf {
            height += 1;
            node = self.node(node).entries[0]
                .child
                .expect("non-leaf entry has a child");
        }
        height
    }

    /// Returns the MBR of the whole tree, or `None` if the tree is empty.
    pub fn mbr(&self) -> Option<Rect> {
        self.node(self.root)
            .entries
            .iter()
            .map(|entry| entry.mbr)
            .reduce(|acc, mbr| acc.union(&mbr))
    }

    /// Returns the id of the root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns the node stored under `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Inserts the rectangle spanning `bottom_left` to `top_right`.
    ///
    /// A point is inserted as a degenerate rectangle with both corners equal.
    /// Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns [`GritError::InvalidRectangle`] when `bottom_left` exceeds
    /// `top_right` in either coordinate; the tree is left untouched.
    pub fn insert(&mut self, bottom_left: Point, top_right: Point) -> Result<(), GritError> {
        if bottom_left.x > top_right.x || bottom_left.y > top_right.y {
            return Err(GritError::InvalidRectangle {
                bottom_left,
                top_right,
            });
        }
        let rect = Rect::new(bottom_left, top_right);
        info!("Inserting rectangle into RTree: {}", rect);

        let leaf = self.choose_leaf(&rect);
        self.node_mut(leaf).entries.push(Entry {
            mbr: rect,
            child: None,
        });

        let outcome = if self.node(leaf).entries.len() > MAX_ENTRIES {
            self.split_node(leaf)
        } else {
            SplitOutcome::Unchanged(leaf)
        };
        self.adjust_tree(outcome);
        self.len += 1;
        Ok(())
    }

    /// Descends from the root to the leaf best suited to hold `rect`.
    fn choose_leaf(&self, rect: &Rect) -> NodeId {
        let mut node = self.root;
        while !self.node(node).is_leaf {
            let slot = self.choose_subtree(node, rect);
            node = self.node(node).entries[slot]
                .child
                .expect("non-leaf entry has a child");
        }
        debug!("ChooseLeaf selected {:?} for {}", node, rect);
        node
    }

    /// Picks the entry of a non-leaf node whose subtree needs the least
    /// enlargement to cover `rect`; ties go to the smaller MBR, then to the
    /// earlier entry.
    fn choose_subtree(&self, node: NodeId, rect: &Rect) -> usize {
        let entries = &self.node(node).entries;
        let mut best = 0;
        let mut best_enlargement = entries[0].mbr.enlargement(rect);
        let mut best_area = entries[0].mbr.area();
        for (slot, entry) in entries.iter().enumerate().skip(1) {
            let enlargement = entry.mbr.enlargement(rect);
            let area = entry.mbr.area();
            if enlargement < best_enlargement
                || (enlargement == best_enlargement && area < best_area)
            {
                best = slot;
                best_enlargement = enlargement;
                best_area = area;
            }
        }
        best
    }

    /// Quadratic split of an overflowing node.
    ///
    /// The original arena slot keeps the first group, so the entry covering
    /// it in the parent stays valid; the second group goes to a fresh node
    /// that the adjuster will hook into the parent.
    fn split_node(&mut self, id: NodeId) -> SplitOutcome {
        let source = mem::take(&mut self.node_mut(id).entries);
        debug!("Splitting {:?} with {} entries", id, source.len());

        let (seed1, seed2) = pick_seeds(&source);
        let mut group1 = vec![seed1];
        let mut group2 = vec![seed2];
        let mut remaining: Vec<usize> = (0..source.len())
            .filter(|&index| index != seed1 && index != seed2)
            .collect();

        while !remaining.is_empty() {
            let mbr1 = group_mbr(&source, &group1);
            let mbr2 = group_mbr(&source, &group2);

            if MAX_ENTRIES + 1 - group1.len() == MIN_ENTRIES {
                // One more entry for group1 would starve group2.
                group2.append(&mut remaining);
            } else if MAX_ENTRIES + 1 - group2.len() == MIN_ENTRIES {
                group1.append(&mut remaining);
            } else {
                let (pos, d1, d2) = pick_next(&source, &remaining, &mbr1, &mbr2);
                let index = remaining.remove(pos);
                let to_first = if d1 != d2 {
                    d1 < d2
                } else if mbr1.area() != mbr2.area() {
                    mbr1.area() < mbr2.area()
                } else if group1.len() != group2.len() {
                    group1.len() < group2.len()
                } else {
                    true
                };
                if to_first {
                    group1.push(index);
                } else {
                    group2.push(index);
                }
            }
        }

        let is_leaf = self.node(id).is_leaf;
        let right = NodeId(self.nodes.len());
        let mut slots: Vec<Option<Entry>> = source.into_iter().map(Some).collect();
        let mut take = |index: usize| {
            slots[index]
                .take()
                .expect("split assigns each entry to exactly one group")
        };
        let left_entries: Vec<Entry> = group1.iter().map(|&index| take(index)).collect();
        let right_entries: Vec<Entry> = group2.iter().map(|&index| take(index)).collect();

        self.node_mut(id).entries = left_entries;
        self.nodes.push(Node {
            is_leaf,
            entries: right_entries,
            parent: None,
        });
        self.relink_children(id);
        self.relink_children(right);

        debug!(
            "Split produced {:?} ({} entries) and {:?} ({} entries)",
            id,
            self.node(id).entries.len(),
            right,
            self.node(right).entries.len()
        );
        SplitOutcome::Split { left: id, right }
    }

    /// Repoints the parent links of all children of `id` at their current
    /// slots. Needed after a split reshuffles entries between nodes.
    fn relink_children(&mut self, id: NodeId) {
        for slot in 0..self.nodes[id.0].entries.len() {
            if let Some(child) = self.nodes[id.0].entries[slot].child {
                self.nodes[child.0].parent = Some(ParentLink { node: id, slot });
            }
        }
    }

    /// Walks from the insertion point back to the root, refreshing parent
    /// MBRs, hooking in split siblings, and cascading further splits.
    fn adjust_tree(&mut self, mut outcome: SplitOutcome) {
        loop {
            let node = match outcome {
                SplitOutcome::Unchanged(node) => node,
                SplitOutcome::Split { left, .. } => left,
            };
            let Some(link) = self.node(node).parent else {
                break;
            };

            let mbr = self.node_mbr(node);
            self.node_mut(link.node).entries[link.slot].mbr = mbr;
            if let SplitOutcome::Split { right, .. } = outcome {
                let right_mbr = self.node_mbr(right);
                let slot = self.node(link.node).entries.len();
                self.node_mut(link.node).entries.push(Entry {
                    mbr: right_mbr,
                    child: Some(right),
                });
                self.node_mut(right).parent = Some(ParentLink {
                    node: link.node,
                    slot,
                });
            }

            outcome = if self.node(link.node).entries.len() > MAX_ENTRIES {
                self.split_node(link.node)
            } else {
                SplitOutcome::Unchanged(link.node)
            };
        }

        if let SplitOutcome::Split { left, right } = outcome {
            self.promote_root(left, right);
        }
    }

    /// Installs a new non-leaf root over the two halves of a split root.
    fn promote_root(&mut self, left: NodeId, right: NodeId) {
        let left_mbr = self.node_mbr(left);
        let right_mbr = self.node_mbr(right);
        let root = NodeId(self.nodes.len());
        self.nodes.push(Node {
            is_leaf: false,
            entries: vec![
                Entry {
                    mbr: left_mbr,
                    child: Some(left),
                },
                Entry {
                    mbr: right_mbr,
                    child: Some(right),
                },
            ],
            parent: None,
        });
        self.node_mut(left).parent = Some(ParentLink { node: root, slot: 0 });
        self.node_mut(right).parent = Some(ParentLink { node: root, slot: 1 });
        self.root = root;
        debug!("Root split; tree height is now {}", self.height());
    }

    /// Recomputes the MBR of a node from its entries.
    fn node_mbr(&self, id: NodeId) -> Rect {
        let mut iter = self.node(id).entries.iter();
        let first = iter.next().expect("an adjusted node is never empty");
        iter.fold(first.mbr, |acc, entry| acc.union(&entry.mbr))
    }

    /// Invokes `visit` once for every stored rectangle overlapping `window`,
    /// in depth-first entry order. Performs no allocation.
    pub fn search<F>(&self, window: &Rect, mut visit: F)
    where
        F: FnMut(&Rect),
    {
        info!("Searching RTree with window: {}", window);
        self.search_node(self.root, window, &mut visit);
    }

    fn search_node<F>(&self, id: NodeId, window: &Rect, visit: &mut F)
    where
        F: FnMut(&Rect),
    {
        let node = self.node(id);
        for entry in &node.entries {
            if !window.overlaps(&entry.mbr) {
                continue;
            }
            if node.is_leaf {
                visit(&entry.mbr);
            } else if let Some(child) = entry.child {
                self.search_node(child, window, visit);
            }
        }
    }

    /// Collects references to every stored rectangle overlapping `window`,
    /// in the same order [`RTree::search`] would emit them.
    pub fn range_search(&self, window: &Rect) -> Vec<&Rect> {
        info!("Performing range search with window: {}", window);
        let mut result = Vec::new();
        self.collect_node(self.root, window, &mut result);
        result
    }

    fn collect_node<'a>(&'a self, id: NodeId, window: &Rect, result: &mut Vec<&'a Rect>) {
        let node = self.node(id);
        for entry in &node.entries {
            if !window.overlaps(&entry.mbr) {
                continue;
            }
            if node.is_leaf {
                result.push(&entry.mbr);
            } else if let Some(child) = entry.child {
                self.collect_node(child, window, result);
            }
        }
    }

    /// Pre-order traversal: invokes `visit` with each node's kind and entry
    /// MBRs, the node itself before its children, children in entry order.
    pub fn preorder<F>(&self, mut visit: F)
    where
        F: FnMut(NodeKind, &[Rect]),
    {
        self.preorder_node(self.root, &mut visit);
    }

    fn preorder_node<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(NodeKind, &[Rect]),
    {
        let node = self.node(id);
        let kind = if node.is_leaf {
            NodeKind::Leaf
        } else if node.parent.is_none() {
            NodeKind::Root
        } else {
            NodeKind::Internal
        };
        let mbrs: Vec<Rect> = node.entries.iter().map(|entry| entry.mbr).collect();
        visit(kind, &mbrs);
        for entry in &node.entries {
            if let Some(child) = entry.child {
                self.preorder_node(child, visit);
            }
        }
    }
}

impl Default for RTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Area wasted by covering `a` and `b` with one rectangle.
fn wasted_area(a: &Rect, b: &Rect) -> i64 {
    a.union(b).area() - a.area() - b.area()
}

/// Picks the pair of entries that would waste the most area if grouped
/// together; they seed the two split groups. The first scanned maximum wins.
fn pick_seeds(entries: &[Entry]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut max_waste = wasted_area(&entries[0].mbr, &entries[1].mbr);
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let waste = wasted_area(&entries[i].mbr, &entries[j].mbr);
            if waste > max_waste {
                max_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// Picks the unassigned entry preferring one group most strongly, i.e. with
/// the largest `|d1 - d2|` where `d1`/`d2` are the enlargements the entry
/// causes on the two group MBRs. The last scanned maximum wins a tie.
///
/// Returns the position within `remaining` plus both enlargements.
fn pick_next(
    entries: &[Entry],
    remaining: &[usize],
    mbr1: &Rect,
    mbr2: &Rect,
) -> (usize, i64, i64) {
    let mut selected: Option<(usize, i64, i64, i64)> = None;
    for (pos, &index) in remaining.iter().enumerate() {
        let d1 = mbr1.enlargement(&entries[index].mbr);
        let d2 = mbr2.enlargement(&entries[index].mbr);
        let diff = (d1 - d2).abs();
        match selected {
            Some((_, _, _, max_diff)) if diff < max_diff => {}
            _ => selected = Some((pos, d1, d2, diff)),
        }
    }
    let (pos, d1, d2, _) = selected.expect("pick_next requires an unassigned entry");
    (pos, d1, d2)
}

/// MBR of the entries selected by `group`.
fn group_mbr(entries: &[Entry], group: &[usize]) -> Rect {
    let mut iter = group.iter();
    let first = *iter.next().expect("a split group is never empty");
    iter.fold(entries[first].mbr, |acc, &index| {
        acc.union(&entries[index].mbr)
    })
}
