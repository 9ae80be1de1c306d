//! Per-frame update records and the tree walk that collects them.
//!
//! Every frame the tree is flattened into a [`FrameBuffer`] of
//! [`UpdateRecord`]s, one per visible node. Records carry the node's handle,
//! its cumulative z-priority and tree depth, and the passes it takes part in.
//! After [`FrameBuffer::sort`], records are ordered by ascending `(z, depth)`;
//! this is the only ordering draw and hit-testing may rely on.

use crate::tree::{HudTree, NodeId};
use bitflags::bitflags;
use hudkit_core::alloc::HashSet;
use hudkit_core::profiling::profile_function;

bitflags! {
    /// The four per-frame callbacks a node can take part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UpdatePasses: u8 {
        const DEPTH_TEST = 0b0001;
        const INPUT      = 0b0010;
        const LAYOUT     = 0b0100;
        const DRAW       = 0b1000;
    }
}

/// One node's work for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRecord {
    /// Cumulative z-priority: parent z plus the node's own offset.
    pub z: i16,
    /// Nesting level below the traversal root.
    pub depth: u16,
    pub node: NodeId,
    pub passes: UpdatePasses,
}

impl UpdateRecord {
    pub fn sort_key(&self) -> (i16, u16) {
        (self.z, self.depth)
    }

    pub fn takes_part(&self, pass: UpdatePasses) -> bool {
        self.passes.contains(pass)
    }
}

/// Reusable buffer of update records.
///
/// Cleared, not dropped, between frames so its allocation carries over.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    records: Vec<UpdateRecord>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.records.reserve(additional);
    }

    pub fn push(&mut self, record: UpdateRecord) {
        self.records.push(record);
    }

    /// Stable sort by ascending `(z, depth)`. Ties keep traversal order.
    pub fn sort(&mut self) {
        self.records.sort_by_key(UpdateRecord::sort_key);
    }

    pub fn records(&self) -> &[UpdateRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UpdateRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Number of records taking part in `pass`.
    pub fn count(&self, pass: UpdatePasses) -> usize {
        self.records.iter().filter(|r| r.takes_part(pass)).count()
    }
}

/// Append update records for `id` and everything visible below it.
///
/// The node's own record comes first, tagged with `depth` and `parent_z`
/// plus its z offset. Collection containers follow in list order, then any
/// other registered children, all one level deeper. Invisible nodes are
/// skipped together with their subtrees. Capacity for the whole subtree is
/// reserved before the walk starts.
///
/// Returns the number of records appended.
pub fn get_update_accessors(
    tree: &HudTree,
    id: NodeId,
    buffer: &mut FrameBuffer,
    depth: u16,
    parent_z: i16,
) -> usize {
    profile_function!();

    let before = buffer.len();
    buffer.reserve(tree.subtree_len(id));
    collect(tree, id, buffer, depth, parent_z);
    buffer.len() - before
}

fn collect(tree: &HudTree, id: NodeId, buffer: &mut FrameBuffer, depth: u16, parent_z: i16) {
    let (Ok(base), Ok(node)) = (tree.base(id), tree.node(id)) else {
        return;
    };
    if !base.is_visible() {
        return;
    }

    let z = parent_z.saturating_add(i16::from(base.z_offset()));
    buffer.push(UpdateRecord {
        z,
        depth,
        node: id,
        passes: node.update_passes(),
    });

    let child_depth = depth.saturating_add(1);
    match node.as_collection() {
        Some(collection) => {
            for container in collection.iter() {
                collect(tree, container.node, buffer, child_depth, z);
            }
            // Every child is a container unless something registered extras.
            if base.children().len() > collection.len() {
                let containers: HashSet<NodeId> = collection.iter().map(|c| c.node).collect();
                for &child in base.children() {
                    if !containers.contains(&child) {
                        collect(tree, child, buffer, child_depth, z);
                    }
                }
            }
        }
        None => {
            for &child in base.children() {
                collect(tree, child, buffer, child_depth, z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::HudCollection;
    use crate::widgets::Block;

    #[test]
    fn test_sort_is_stable_by_z_then_depth() {
        let mut buffer = FrameBuffer::new();
        let record = |node, z, depth| UpdateRecord {
            z,
            depth,
            node: NodeId(node),
            passes: UpdatePasses::all(),
        };
        buffer.push(record(0, 1, 0));
        buffer.push(record(1, 0, 2));
        buffer.push(record(2, 0, 1));
        buffer.push(record(3, 0, 1));
        buffer.push(record(4, -1, 5));
        buffer.sort();

        let order: Vec<u64> = buffer.iter().map(|r| r.node.0).collect();
        assert_eq!(order, vec![4, 2, 3, 1, 0]);
    }

    #[test]
    fn test_walk_order_and_depths() {
        let mut tree = HudTree::new();
        let root = tree.add_node(HudCollection::new());
        let a = tree.add_node(Block::new());
        let b = tree.add_node(HudCollection::new());
        let c = tree.add_node(Block::new());
        let loose = tree.add_node(Block::new());

        tree.collection_mut(root).unwrap().add(a).unwrap();
        tree.collection_mut(root).unwrap().add(b).unwrap();
        tree.collection_mut(b).unwrap().add(c).unwrap();
        tree.register(loose, root).unwrap();

        let mut buffer = FrameBuffer::new();
        let count = get_update_accessors(&tree, root, &mut buffer, 0, 0);
        assert_eq!(count, 5);

        let walk: Vec<(NodeId, u16)> = buffer.iter().map(|r| (r.node, r.depth)).collect();
        assert_eq!(walk, vec![(root, 0), (a, 1), (b, 1), (c, 2), (loose, 1)]);
        assert!(buffer.capacity() >= 5);
    }

    #[test]
    fn test_z_accumulates_and_hidden_subtrees_are_skipped() {
        let mut tree = HudTree::new();
        let root = tree.add_node(HudCollection::new());
        let panel = tree.add_node(HudCollection::new());
        let leaf = tree.add_node(Block::new());
        let hidden = tree.add_node(HudCollection::new());
        let under_hidden = tree.add_node(Block::new());

        tree.collection_mut(root).unwrap().add(panel).unwrap();
        tree.collection_mut(root).unwrap().add(hidden).unwrap();
        tree.collection_mut(panel).unwrap().add(leaf).unwrap();
        tree.collection_mut(hidden).unwrap().add(under_hidden).unwrap();

        tree.base_mut(panel).unwrap().set_z_offset(3);
        tree.base_mut(leaf).unwrap().set_z_offset(-1);
        tree.base_mut(hidden).unwrap().set_visible(false);

        let mut buffer = FrameBuffer::new();
        get_update_accessors(&tree, root, &mut buffer, 0, 10);

        let zs: Vec<(NodeId, i16)> = buffer.iter().map(|r| (r.node, r.z)).collect();
        assert_eq!(zs, vec![(root, 10), (panel, 13), (leaf, 12)]);
    }

    #[test]
    fn test_buffer_reuse_keeps_capacity() {
        let mut tree = HudTree::new();
        let root = tree.add_node(HudCollection::new());
        for _ in 0..16 {
            let id = tree.add_node(Block::new());
            tree.collection_mut(root).unwrap().add(id).unwrap();
        }

        let mut buffer = FrameBuffer::new();
        get_update_accessors(&tree, root, &mut buffer, 0, 0);
        let capacity = buffer.capacity();

        buffer.clear();
        get_update_accessors(&tree, root, &mut buffer, 0, 0);
        assert_eq!(buffer.len(), 17);
        assert_eq!(buffer.capacity(), capacity);
        assert_eq!(buffer.count(UpdatePasses::DRAW), 16);
    }

    #[test]
    fn test_wide_collection_visits_each_child_once() {
        let mut tree = HudTree::new();
        let root = tree.add_node(HudCollection::new());
        let members: Vec<NodeId> = (0..2000).map(|_| tree.add_node(Block::new())).collect();
        for &id in &members {
            tree.collection_mut(root).unwrap().add(id).unwrap();
        }

        let mut buffer = FrameBuffer::new();
        assert_eq!(get_update_accessors(&tree, root, &mut buffer, 0, 0), 2001);

        let loose = tree.add_node(Block::new());
        tree.register(loose, root).unwrap();
        buffer.clear();
        assert_eq!(get_update_accessors(&tree, root, &mut buffer, 0, 0), 2002);
        assert_eq!(buffer.records().last().map(|r| r.node), Some(loose));
        assert_eq!(buffer.iter().filter(|r| r.node == members[7]).count(), 1);
    }
}
