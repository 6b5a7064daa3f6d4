//! Slicing-tree representation of the floorplan.
//!
//! The tree owns every node in an arena of integer-handle slots; parents
//! reference children (and children their parent) by [`NodeId`], never by
//! pointer, so restructuring can't create ownership cycles. Internal
//! [`Slice`](NodeKind::Slice) nodes stack their children along one axis —
//! left-to-right for horizontal slices, bottom-to-top for vertical — and a
//! leaf carries exactly one component. Absolute coordinates are derived by
//! composing ancestor offsets; relative-placement edges are derived from
//! child order on demand and never stored.
//!
//! Every structural mutation is followed by a relayout pass restricted to
//! the modified node's ancestor chain, keeping edits amortized-local.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tessera_common::{define_id, InternalError};
use tessera_model::ComponentId;

define_id!(
    /// Opaque handle for a node slot in the floorplan tree.
    NodeId
);

/// Stacking direction of a slice node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Axis {
    /// Children are stacked left-to-right.
    Horizontal,
    /// Children are stacked bottom-to-top.
    Vertical,
}

impl Axis {
    /// Returns the other axis.
    pub fn flipped(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Rotation state of a placed leaf.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Unrotated.
    #[default]
    North,
    /// Rotated 90 degrees; width and height swap.
    East,
}

impl Orientation {
    /// Returns `true` if width and height are swapped.
    pub fn is_rotated(self) -> bool {
        self == Orientation::East
    }

    /// Returns the opposite orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }
}

/// What a tree node represents.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A placed component.
    Leaf {
        /// The component occupying this leaf.
        component: ComponentId,
        /// Component width (unrotated).
        width: u32,
        /// Component height (unrotated).
        height: u32,
        /// Current rotation state.
        orientation: Orientation,
    },
    /// A partition boundary stacking its children along an axis.
    Slice {
        /// The stacking axis.
        axis: Axis,
    },
}

/// One node slot in the tree arena.
#[derive(Clone, Debug)]
struct TreeNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position relative to the parent's origin, derived by relayout.
    offset: (i64, i64),
    /// Bounding box: oriented size for leaves, tight child union for slices.
    size: (u32, u32),
    kind: NodeKind,
}

/// The direction of a derived relative-placement relation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Relation {
    /// `from` is placed immediately left of `to`.
    LeftOf,
    /// `from` is placed immediately below `to`.
    Above,
}

/// A derived edge between two sibling nodes.
///
/// Edges encode child order; they are rebuilt from topology by
/// [`FloorplanTree::edges`] whenever asked for, so they can never dangle
/// across restructuring.
#[derive(Clone, Copy, Debug)]
pub struct PlacementEdge {
    /// The earlier sibling.
    pub from: NodeId,
    /// The later sibling.
    pub to: NodeId,
    /// How `from` relates to `to`.
    pub relation: Relation,
}

/// The absolute placement of one leaf, derived from ancestor offsets.
#[derive(Clone, Copy, Debug)]
pub struct LeafPosition {
    /// The component at this leaf.
    pub component: ComponentId,
    /// Absolute lower-left x coordinate.
    pub x: i64,
    /// Absolute lower-left y coordinate.
    pub y: i64,
    /// The leaf's rotation state.
    pub orientation: Orientation,
}

/// Errors raised by structural tree operations.
///
/// These are all recoverable at the call site — the optimizer rejects the
/// offending proposal and moves on. None of them fail a run.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced node slot does not exist or was removed.
    #[error("node {0} does not exist")]
    MissingNode(NodeId),

    /// The operation requires a slice node but got a leaf.
    #[error("node {0} is not a slice node")]
    NotInternal(NodeId),

    /// The operation requires a leaf node but got a slice.
    #[error("node {0} is not a leaf")]
    NotLeaf(NodeId),

    /// The component already occupies a leaf.
    #[error("component {0} is already placed in the tree")]
    DuplicateComponent(ComponentId),

    /// The move would make a node its own descendant.
    #[error("relocating node {0} under {1} would create a cycle")]
    WouldCycle(NodeId, NodeId),

    /// Removing the root of a non-trivial tree is not allowed.
    #[error("cannot remove the root of a non-trivial tree")]
    RootRemoval,
}

/// An arena-backed slicing tree with a single root slice.
#[derive(Clone, Debug)]
pub struct FloorplanTree {
    slots: Vec<Option<TreeNode>>,
    free: Vec<NodeId>,
    root: NodeId,
    leaves: HashMap<ComponentId, NodeId>,
}

impl FloorplanTree {
    /// Creates a tree containing only an empty root slice.
    pub fn new(root_axis: Axis) -> Self {
        let root_node = TreeNode {
            parent: None,
            children: Vec::new(),
            offset: (0, 0),
            size: (0, 0),
            kind: NodeKind::Slice { axis: root_axis },
        };
        Self {
            slots: vec![Some(root_node)],
            free: Vec::new(),
            root: NodeId::from_raw(0),
            leaves: HashMap::new(),
        }
    }

    /// Returns the root node handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root bounding box.
    pub fn bounding_box(&self) -> (u32, u32) {
        self.node_ref(self.root).map(|n| n.size).unwrap_or((0, 0))
    }

    /// Returns the number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Returns the leaf handle occupied by a component, if any.
    pub fn leaf_of(&self, component: ComponentId) -> Option<NodeId> {
        self.leaves.get(&component).copied()
    }

    /// Returns all leaf handles, sorted for deterministic iteration.
    pub fn leaf_handles(&self) -> Vec<NodeId> {
        let mut handles: Vec<NodeId> = self.leaves.values().copied().collect();
        handles.sort();
        handles
    }

    /// Returns all slice handles (including the root), in slot order.
    pub fn slice_handles(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Some(TreeNode {
                    kind: NodeKind::Slice { .. },
                    ..
                }) => Some(NodeId::from_raw(i as u32)),
                _ => None,
            })
            .collect()
    }

    /// Returns the kind of a node.
    pub fn kind(&self, node: NodeId) -> Result<&NodeKind, TreeError> {
        self.node_ref(node).map(|n| &n.kind)
    }

    /// Returns the parent of a node, `None` for the root.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.node_ref(node).map(|n| n.parent)
    }

    /// Returns the children of a node in stacking order.
    pub fn children(&self, node: NodeId) -> Result<&[NodeId], TreeError> {
        self.node_ref(node).map(|n| n.children.as_slice())
    }

    fn node_ref(&self, node: NodeId) -> Result<&TreeNode, TreeError> {
        self.slots
            .get(node.as_raw() as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or(TreeError::MissingNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut TreeNode, TreeError> {
        self.slots
            .get_mut(node.as_raw() as usize)
            .and_then(|slot| slot.as_mut())
            .ok_or(TreeError::MissingNode(node))
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.as_raw() as usize] = Some(node);
                id
            }
            None => {
                let id = NodeId::from_raw(self.slots.len() as u32);
                self.slots.push(Some(node));
                id
            }
        }
    }

    fn require_slice(&self, node: NodeId) -> Result<(), TreeError> {
        match &self.node_ref(node)?.kind {
            NodeKind::Slice { .. } => Ok(()),
            NodeKind::Leaf { .. } => Err(TreeError::NotInternal(node)),
        }
    }

    /// Inserts a new slice node under `parent` and returns its handle.
    pub fn insert_slice(&mut self, parent: NodeId, axis: Axis) -> Result<NodeId, TreeError> {
        self.require_slice(parent)?;
        let id = self.alloc(TreeNode {
            parent: Some(parent),
            children: Vec::new(),
            offset: (0, 0),
            size: (0, 0),
            kind: NodeKind::Slice { axis },
        });
        self.node_mut(parent)?.children.push(id);
        self.relayout_upward(parent)?;
        Ok(id)
    }

    /// Inserts a new leaf for `component` under `parent`.
    ///
    /// Fails if the component is already present anywhere in the tree.
    pub fn insert_leaf(
        &mut self,
        parent: NodeId,
        component: ComponentId,
        width: u32,
        height: u32,
    ) -> Result<NodeId, TreeError> {
        self.require_slice(parent)?;
        if self.leaves.contains_key(&component) {
            return Err(TreeError::DuplicateComponent(component));
        }
        let id = self.alloc(TreeNode {
            parent: Some(parent),
            children: Vec::new(),
            offset: (0, 0),
            size: (width, height),
            kind: NodeKind::Leaf {
                component,
                width,
                height,
                orientation: Orientation::North,
            },
        });
        self.node_mut(parent)?.children.push(id);
        self.leaves.insert(component, id);
        self.relayout_upward(parent)?;
        Ok(id)
    }

    /// Relocates a subtree under a new parent at the given child index.
    ///
    /// Fails with [`TreeError::WouldCycle`] if `new_parent` lies inside the
    /// moved subtree (including `node` itself), which also covers any
    /// attempt to move the root.
    pub fn relocate(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.node_ref(node)?;
        self.require_slice(new_parent)?;
        if self.is_in_subtree(new_parent, node)? {
            return Err(TreeError::WouldCycle(node, new_parent));
        }

        let old_parent = self
            .node_ref(node)?
            .parent
            .ok_or(TreeError::WouldCycle(node, new_parent))?;

        Self::detach_child(self.node_mut(old_parent)?, node);
        {
            let parent_node = self.node_mut(new_parent)?;
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, node);
        }
        self.node_mut(node)?.parent = Some(new_parent);

        self.relayout_upward(old_parent)?;
        self.relayout_upward(new_parent)?;
        Ok(())
    }

    /// Detaches and frees a subtree.
    ///
    /// Fails with [`TreeError::RootRemoval`] when `node` is the root of a
    /// non-trivial tree; removing a bare root resets the tree to empty.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.node_ref(node)?;
        if node == self.root {
            if !self.node_ref(node)?.children.is_empty() {
                return Err(TreeError::RootRemoval);
            }
            // A trivial tree resets in place; the root slot stays live.
            return Ok(());
        }

        let parent = self
            .node_ref(node)?
            .parent
            .ok_or(TreeError::MissingNode(node))?;
        Self::detach_child(self.node_mut(parent)?, node);
        self.free_subtree(node);
        self.relayout_upward(parent)?;
        Ok(())
    }

    /// Exchanges the components (and their sizes/orientations) of two leaves.
    ///
    /// The tree structure is untouched; only the payloads swap, so the
    /// operation can never break single-ownership.
    pub fn swap_leaves(&mut self, a: NodeId, b: NodeId) -> Result<(), TreeError> {
        if a == b {
            return Ok(());
        }
        let kind_a = self.leaf_kind(a)?;
        let kind_b = self.leaf_kind(b)?;

        let (component_a, component_b) = match (&kind_a, &kind_b) {
            (
                NodeKind::Leaf { component: ca, .. },
                NodeKind::Leaf { component: cb, .. },
            ) => (*ca, *cb),
            _ => unreachable!("leaf_kind only returns leaves"),
        };

        self.set_leaf(a, kind_b)?;
        self.set_leaf(b, kind_a)?;
        self.leaves.insert(component_a, b);
        self.leaves.insert(component_b, a);

        let parent_a = self.node_ref(a)?.parent;
        let parent_b = self.node_ref(b)?.parent;
        if let Some(p) = parent_a {
            self.relayout_upward(p)?;
        }
        if let Some(p) = parent_b {
            self.relayout_upward(p)?;
        }
        Ok(())
    }

    /// Toggles the rotation of a leaf.
    pub fn flip_orientation(&mut self, node: NodeId) -> Result<(), TreeError> {
        let tree_node = self.node_mut(node)?;
        match &mut tree_node.kind {
            NodeKind::Leaf { orientation, .. } => {
                *orientation = orientation.flipped();
            }
            NodeKind::Slice { .. } => return Err(TreeError::NotLeaf(node)),
        }
        let parent = tree_node.parent;
        self.refresh_size(node)?;
        if let Some(p) = parent {
            self.relayout_upward(p)?;
        }
        Ok(())
    }

    /// Derives the absolute position of every leaf by composing ancestor offsets.
    pub fn positions(&self) -> Vec<LeafPosition> {
        let mut out = Vec::with_capacity(self.leaves.len());
        let mut stack = vec![(self.root, (0i64, 0i64))];
        while let Some((id, origin)) = stack.pop() {
            let Ok(node) = self.node_ref(id) else { continue };
            let absolute = (origin.0 + node.offset.0, origin.1 + node.offset.1);
            match &node.kind {
                NodeKind::Leaf {
                    component,
                    orientation,
                    ..
                } => out.push(LeafPosition {
                    component: *component,
                    x: absolute.0,
                    y: absolute.1,
                    orientation: *orientation,
                }),
                NodeKind::Slice { .. } => {
                    for &child in &node.children {
                        stack.push((child, absolute));
                    }
                }
            }
        }
        out.sort_by_key(|p| p.component);
        out
    }

    /// Rebuilds the relative-placement relation from the current topology.
    pub fn edges(&self) -> Vec<PlacementEdge> {
        let mut out = Vec::new();
        for slot in self.slots.iter().flatten() {
            let NodeKind::Slice { axis } = slot.kind else {
                continue;
            };
            let relation = match axis {
                Axis::Horizontal => Relation::LeftOf,
                Axis::Vertical => Relation::Above,
            };
            for pair in slot.children.windows(2) {
                out.push(PlacementEdge {
                    from: pair[0],
                    to: pair[1],
                    relation,
                });
            }
        }
        out
    }

    /// Re-derives every structural invariant and fails on the first breach.
    ///
    /// Used by tests and debug runs; normal operation relies on the
    /// construction rules instead.
    pub fn validate(&self) -> Result<(), InternalError> {
        let mut seen_components: HashMap<ComponentId, NodeId> = HashMap::new();
        let mut visited = 0usize;
        let mut stack = vec![self.root];

        if self.node_ref(self.root).is_err() {
            return Err(InternalError::new("root slot is vacant"));
        }

        while let Some(id) = stack.pop() {
            visited += 1;
            let node = self
                .node_ref(id)
                .map_err(|_| InternalError::new(format!("dangling child handle {id}")))?;

            match &node.kind {
                NodeKind::Leaf { component, .. } => {
                    if !node.children.is_empty() {
                        return Err(InternalError::new(format!("leaf {id} has children")));
                    }
                    if let Some(previous) = seen_components.insert(*component, id) {
                        return Err(InternalError::new(format!(
                            "component {component} occupies leaves {previous} and {id}"
                        )));
                    }
                    if self.leaves.get(component) != Some(&id) {
                        return Err(InternalError::new(format!(
                            "leaf index out of date for component {component}"
                        )));
                    }
                }
                NodeKind::Slice { .. } => {
                    let expected = self
                        .stacked_bbox(node)
                        .map_err(|e| InternalError::new(e.to_string()))?;
                    if expected != node.size {
                        return Err(InternalError::new(format!(
                            "slice {id} bounding box is not the tight union of its children"
                        )));
                    }
                    for &child in &node.children {
                        let child_node = self.node_ref(child).map_err(|_| {
                            InternalError::new(format!("dangling child handle {child}"))
                        })?;
                        if child_node.parent != Some(id) {
                            return Err(InternalError::new(format!(
                                "child {child} does not point back to parent {id}"
                            )));
                        }
                        stack.push(child);
                    }
                }
            }
        }

        if visited != self.node_count() {
            return Err(InternalError::new(
                "tree contains nodes unreachable from the root",
            ));
        }
        if seen_components.len() != self.leaves.len() {
            return Err(InternalError::new("leaf index size mismatch"));
        }
        Ok(())
    }

    fn leaf_kind(&self, node: NodeId) -> Result<NodeKind, TreeError> {
        match &self.node_ref(node)?.kind {
            kind @ NodeKind::Leaf { .. } => Ok(kind.clone()),
            NodeKind::Slice { .. } => Err(TreeError::NotLeaf(node)),
        }
    }

    fn set_leaf(&mut self, node: NodeId, kind: NodeKind) -> Result<(), TreeError> {
        self.node_mut(node)?.kind = kind;
        self.refresh_size(node)
    }

    /// Recomputes a single node's size from its kind (leaves) or children (slices).
    fn refresh_size(&mut self, node: NodeId) -> Result<(), TreeError> {
        let size = match &self.node_ref(node)?.kind {
            NodeKind::Leaf {
                width,
                height,
                orientation,
                ..
            } => {
                if orientation.is_rotated() {
                    (*height, *width)
                } else {
                    (*width, *height)
                }
            }
            NodeKind::Slice { .. } => self.stacked_bbox(self.node_ref(node)?)?,
        };
        self.node_mut(node)?.size = size;
        Ok(())
    }

    /// Computes the tight union of a slice's children along its axis.
    fn stacked_bbox(&self, node: &TreeNode) -> Result<(u32, u32), TreeError> {
        let NodeKind::Slice { axis } = node.kind else {
            return Ok(node.size);
        };
        let mut main = 0u32;
        let mut cross = 0u32;
        for &child in &node.children {
            let child_size = self.node_ref(child)?.size;
            match axis {
                Axis::Horizontal => {
                    main += child_size.0;
                    cross = cross.max(child_size.1);
                }
                Axis::Vertical => {
                    main += child_size.1;
                    cross = cross.max(child_size.0);
                }
            }
        }
        Ok(match axis {
            Axis::Horizontal => (main, cross),
            Axis::Vertical => (cross, main),
        })
    }

    /// Re-stacks children and recomputes bounding boxes along the ancestor
    /// chain of `start`, stopping at the root.
    ///
    /// This is the only layout pass; it never visits subtrees that did not
    /// change.
    fn relayout_upward(&mut self, start: NodeId) -> Result<(), TreeError> {
        let mut current = Some(start);
        while let Some(id) = current {
            self.restack_children(id)?;
            self.refresh_size(id)?;
            current = self.node_ref(id)?.parent;
        }
        Ok(())
    }

    /// Assigns offsets to the children of a slice along its axis.
    fn restack_children(&mut self, node: NodeId) -> Result<(), TreeError> {
        let (axis, children) = match &self.node_ref(node)?.kind {
            NodeKind::Slice { axis } => (*axis, self.node_ref(node)?.children.clone()),
            NodeKind::Leaf { .. } => return Ok(()),
        };
        let mut cursor = 0i64;
        for child in children {
            let child_node = self.node_mut(child)?;
            match axis {
                Axis::Horizontal => {
                    child_node.offset = (cursor, 0);
                    cursor += i64::from(child_node.size.0);
                }
                Axis::Vertical => {
                    child_node.offset = (0, cursor);
                    cursor += i64::from(child_node.size.1);
                }
            }
        }
        Ok(())
    }

    fn detach_child(parent: &mut TreeNode, child: NodeId) {
        parent.children.retain(|&c| c != child);
    }

    /// Returns whether `node` lies within the subtree rooted at `ancestor`.
    fn is_in_subtree(&self, node: NodeId, ancestor: NodeId) -> Result<bool, TreeError> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node_ref(id)?.parent;
        }
        Ok(false)
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.as_raw() as usize) else {
                continue;
            };
            let Some(tree_node) = slot.take() else { continue };
            if let NodeKind::Leaf { component, .. } = tree_node.kind {
                self.leaves.remove(&component);
            }
            stack.extend(tree_node.children);
            self.free.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(raw: u32) -> ComponentId {
        ComponentId::from_raw(raw)
    }

    /// Root (H) with three unit leaves.
    fn row_of_three() -> (FloorplanTree, Vec<NodeId>) {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let leaves = (0..3)
            .map(|i| tree.insert_leaf(root, component(i), 2, 3).unwrap())
            .collect();
        (tree, leaves)
    }

    fn position_of(tree: &FloorplanTree, raw: u32) -> (i64, i64) {
        tree.positions()
            .into_iter()
            .find(|p| p.component == component(raw))
            .map(|p| (p.x, p.y))
            .unwrap()
    }

    #[test]
    fn horizontal_row_stacks_left_to_right() {
        let (tree, _) = row_of_three();
        assert_eq!(position_of(&tree, 0), (0, 0));
        assert_eq!(position_of(&tree, 1), (2, 0));
        assert_eq!(position_of(&tree, 2), (4, 0));
        assert_eq!(tree.bounding_box(), (6, 3));
        tree.validate().unwrap();
    }

    #[test]
    fn vertical_slice_stacks_bottom_to_top() {
        let mut tree = FloorplanTree::new(Axis::Vertical);
        let root = tree.root();
        tree.insert_leaf(root, component(0), 4, 1).unwrap();
        tree.insert_leaf(root, component(1), 2, 5).unwrap();
        assert_eq!(position_of(&tree, 0), (0, 0));
        assert_eq!(position_of(&tree, 1), (0, 1));
        assert_eq!(tree.bounding_box(), (4, 6));
        tree.validate().unwrap();
    }

    #[test]
    fn nested_slices_compose_offsets() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        tree.insert_leaf(root, component(0), 3, 3).unwrap();
        let column = tree.insert_slice(root, Axis::Vertical).unwrap();
        tree.insert_leaf(column, component(1), 2, 2).unwrap();
        tree.insert_leaf(column, component(2), 2, 2).unwrap();

        assert_eq!(position_of(&tree, 1), (3, 0));
        assert_eq!(position_of(&tree, 2), (3, 2));
        assert_eq!(tree.bounding_box(), (5, 4));
        tree.validate().unwrap();
    }

    #[test]
    fn duplicate_component_rejected() {
        let (mut tree, _) = row_of_three();
        let root = tree.root();
        let err = tree.insert_leaf(root, component(1), 1, 1).unwrap_err();
        assert_eq!(err, TreeError::DuplicateComponent(component(1)));
        tree.validate().unwrap();
    }

    #[test]
    fn insert_under_leaf_rejected() {
        let (mut tree, leaves) = row_of_three();
        let err = tree.insert_leaf(leaves[0], component(9), 1, 1).unwrap_err();
        assert_eq!(err, TreeError::NotInternal(leaves[0]));
    }

    #[test]
    fn insert_under_missing_parent_rejected() {
        let (mut tree, _) = row_of_three();
        let ghost = NodeId::from_raw(999);
        let err = tree.insert_leaf(ghost, component(9), 1, 1).unwrap_err();
        assert_eq!(err, TreeError::MissingNode(ghost));
    }

    #[test]
    fn relocate_moves_subtree_and_relayouts() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let column = tree.insert_slice(root, Axis::Vertical).unwrap();
        tree.insert_leaf(column, component(0), 1, 1).unwrap();
        let stray = tree.insert_leaf(root, component(1), 1, 1).unwrap();

        tree.relocate(stray, column, 0).unwrap();

        // Both leaves are now stacked vertically at x = 0.
        assert_eq!(position_of(&tree, 1), (0, 0));
        assert_eq!(position_of(&tree, 0), (0, 1));
        assert_eq!(tree.bounding_box(), (1, 2));
        tree.validate().unwrap();
    }

    #[test]
    fn relocate_into_own_subtree_rejected() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let outer = tree.insert_slice(root, Axis::Vertical).unwrap();
        let inner = tree.insert_slice(outer, Axis::Horizontal).unwrap();
        tree.insert_leaf(inner, component(0), 1, 1).unwrap();

        let err = tree.relocate(outer, inner, 0).unwrap_err();
        assert_eq!(err, TreeError::WouldCycle(outer, inner));
        tree.validate().unwrap();
    }

    #[test]
    fn relocate_onto_itself_rejected() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let slice = tree.insert_slice(root, Axis::Vertical).unwrap();
        let err = tree.relocate(slice, slice, 0).unwrap_err();
        assert!(matches!(err, TreeError::WouldCycle(..)));
    }

    #[test]
    fn relocate_root_rejected() {
        let (mut tree, _) = row_of_three();
        let root = tree.root();
        let slice = tree.insert_slice(root, Axis::Vertical).unwrap();
        // The root contains every node, so any target is inside its subtree.
        let err = tree.relocate(root, slice, 0).unwrap_err();
        assert!(matches!(err, TreeError::WouldCycle(..)));
    }

    #[test]
    fn relocate_to_missing_parent_rejected() {
        let (mut tree, leaves) = row_of_three();
        let ghost = NodeId::from_raw(500);
        let err = tree.relocate(leaves[0], ghost, 0).unwrap_err();
        assert_eq!(err, TreeError::MissingNode(ghost));
    }

    #[test]
    fn remove_detaches_and_frees_subtree() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let column = tree.insert_slice(root, Axis::Vertical).unwrap();
        tree.insert_leaf(column, component(0), 1, 1).unwrap();
        tree.insert_leaf(column, component(1), 1, 1).unwrap();
        tree.insert_leaf(root, component(2), 1, 1).unwrap();

        tree.remove(column).unwrap();

        assert_eq!(tree.leaf_count(), 1);
        assert!(tree.leaf_of(component(0)).is_none());
        assert!(tree.leaf_of(component(1)).is_none());
        assert_eq!(tree.bounding_box(), (1, 1));
        tree.validate().unwrap();

        // Freed slots are reused.
        let before = tree.node_count();
        tree.insert_leaf(root, component(5), 1, 1).unwrap();
        assert_eq!(tree.node_count(), before + 1);
    }

    #[test]
    fn remove_root_of_populated_tree_rejected() {
        let (mut tree, _) = row_of_three();
        let err = tree.remove(tree.root()).unwrap_err();
        assert_eq!(err, TreeError::RootRemoval);
        tree.validate().unwrap();
    }

    #[test]
    fn remove_trivial_root_is_noop() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        tree.remove(tree.root()).unwrap();
        assert_eq!(tree.node_count(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn swap_leaves_exchanges_payloads() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let a = tree.insert_leaf(root, component(0), 1, 1).unwrap();
        let b = tree.insert_leaf(root, component(1), 4, 2).unwrap();

        tree.swap_leaves(a, b).unwrap();

        // Component 1 (4 wide) now sits first.
        assert_eq!(position_of(&tree, 1), (0, 0));
        assert_eq!(position_of(&tree, 0), (4, 0));
        assert_eq!(tree.leaf_of(component(0)), Some(b));
        assert_eq!(tree.leaf_of(component(1)), Some(a));
        tree.validate().unwrap();
    }

    #[test]
    fn swap_leaf_with_slice_rejected() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let leaf = tree.insert_leaf(root, component(0), 1, 1).unwrap();
        let slice = tree.insert_slice(root, Axis::Vertical).unwrap();
        let err = tree.swap_leaves(leaf, slice).unwrap_err();
        assert_eq!(err, TreeError::NotLeaf(slice));
        tree.validate().unwrap();
    }

    #[test]
    fn flip_orientation_swaps_footprint() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let leaf = tree.insert_leaf(root, component(0), 6, 2).unwrap();
        tree.insert_leaf(root, component(1), 1, 1).unwrap();

        assert_eq!(position_of(&tree, 1), (6, 0));
        tree.flip_orientation(leaf).unwrap();
        assert_eq!(position_of(&tree, 1), (2, 0));
        assert_eq!(tree.bounding_box(), (3, 6));

        tree.flip_orientation(leaf).unwrap();
        assert_eq!(position_of(&tree, 1), (6, 0));
        tree.validate().unwrap();
    }

    #[test]
    fn flip_slice_rejected() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let err = tree.flip_orientation(root).unwrap_err();
        assert_eq!(err, TreeError::NotLeaf(root));
    }

    #[test]
    fn edges_follow_child_order() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let a = tree.insert_leaf(root, component(0), 1, 1).unwrap();
        let b = tree.insert_leaf(root, component(1), 1, 1).unwrap();
        let column = tree.insert_slice(root, Axis::Vertical).unwrap();
        let c = tree.insert_leaf(column, component(2), 1, 1).unwrap();
        let d = tree.insert_leaf(column, component(3), 1, 1).unwrap();

        let edges = tree.edges();
        assert!(edges
            .iter()
            .any(|e| e.from == a && e.to == b && e.relation == Relation::LeftOf));
        assert!(edges
            .iter()
            .any(|e| e.from == b && e.to == column && e.relation == Relation::LeftOf));
        assert!(edges
            .iter()
            .any(|e| e.from == c && e.to == d && e.relation == Relation::Above));
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn edges_rebuilt_after_mutation() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let a = tree.insert_leaf(root, component(0), 1, 1).unwrap();
        let b = tree.insert_leaf(root, component(1), 1, 1).unwrap();
        assert_eq!(tree.edges().len(), 1);

        tree.remove(a).unwrap();
        assert!(tree.edges().is_empty());
        let _ = b;
    }

    #[test]
    fn bounding_boxes_stay_tight_through_mutation_sequence() {
        let mut tree = FloorplanTree::new(Axis::Horizontal);
        let root = tree.root();
        let column = tree.insert_slice(root, Axis::Vertical).unwrap();
        let a = tree.insert_leaf(column, component(0), 2, 2).unwrap();
        tree.insert_leaf(column, component(1), 3, 1).unwrap();
        let c = tree.insert_leaf(root, component(2), 1, 5).unwrap();

        tree.validate().unwrap();
        tree.flip_orientation(c).unwrap();
        tree.validate().unwrap();
        tree.relocate(a, root, 0).unwrap();
        tree.validate().unwrap();
        tree.swap_leaves(a, c).unwrap();
        tree.validate().unwrap();
        tree.remove(column).unwrap();
        tree.validate().unwrap();
    }

    #[test]
    fn positions_sorted_by_component() {
        let (tree, _) = row_of_three();
        let positions = tree.positions();
        let ids: Vec<u32> = positions.iter().map(|p| p.component.as_raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
