//! Node arena and parent/child registration.

use crate::collection::{Collection, CollectionMut};
use crate::error::{HudError, HudResult};
use crate::node::{Node, NodeState, ParentAlignments};
use hudkit_core::geometry::Bounds;
use hudkit_core::math::Vec2;
use hudkit_core::profiling::profile_function;
use indexmap::IndexMap;

/// Node identifier in the HUD tree.
///
/// Identifiers are handed out in creation order and never reused by a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Layout and state data the tree keeps for every node.
#[derive(Debug, Clone)]
pub struct NodeBase {
    size: Vec2,
    padding: Vec2,
    offset: Vec2,
    /// Resolved centre in screen space, written during the layout pass.
    position: Vec2,
    state: NodeState,
    alignment: ParentAlignments,
    z_offset: i8,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Default for NodeBase {
    fn default() -> Self {
        Self {
            size: Vec2::ZERO,
            padding: Vec2::ZERO,
            offset: Vec2::ZERO,
            position: Vec2::ZERO,
            state: NodeState::default(),
            alignment: ParentAlignments::empty(),
            z_offset: 0,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl NodeBase {
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
    }

    pub fn padding(&self) -> Vec2 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Vec2) {
        self.padding = padding.max(Vec2::ZERO);
    }

    /// Size minus padding, never negative.
    pub fn content_size(&self) -> Vec2 {
        (self.size - self.padding).max(Vec2::ZERO)
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn set_state(&mut self, flags: NodeState, value: bool) {
        self.state.set(flags, value);
    }

    pub fn is_visible(&self) -> bool {
        self.state.contains(NodeState::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state.set(NodeState::VISIBLE, visible);
    }

    pub fn is_input_enabled(&self) -> bool {
        self.state.contains(NodeState::INPUT_ENABLED)
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.state.set(NodeState::INPUT_ENABLED, enabled);
    }

    pub fn is_mouse_over(&self) -> bool {
        self.state.contains(NodeState::MOUSE_OVER)
    }

    pub fn alignment(&self) -> ParentAlignments {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: ParentAlignments) {
        self.alignment = alignment;
    }

    /// Stacking offset added to the parent's z-priority.
    pub fn z_offset(&self) -> i8 {
        self.z_offset
    }

    pub fn set_z_offset(&mut self, z_offset: i8) {
        self.z_offset = z_offset;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// All registered children, in registration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena owning every node of a HUD.
///
/// Layout state and behaviour live in two maps keyed by the same [`NodeId`]
/// so that a node's hook can run while the tree lends out its children's
/// layout state.
pub struct HudTree {
    bases: IndexMap<NodeId, NodeBase>,
    nodes: IndexMap<NodeId, Box<dyn Node>>,
    root: Option<NodeId>,
    next_id: u64,
}

impl HudTree {
    pub fn new() -> Self {
        Self {
            bases: IndexMap::new(),
            nodes: IndexMap::new(),
            root: None,
            next_id: 0,
        }
    }

    /// Add a node to the arena, unparented, and return its id.
    pub fn add_node(&mut self, node: impl Node) -> NodeId {
        self.add_boxed(Box::new(node))
    }

    pub fn add_boxed(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        tracing::trace!("add {:?} ({})", id, node.debug_name());
        self.bases.insert(id, NodeBase::default());
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its whole subtree. Returns the number of nodes removed.
    pub fn remove_node(&mut self, id: NodeId) -> HudResult<usize> {
        profile_function!();

        if !self.contains(id) {
            return Err(HudError::NodeNotFound(id));
        }
        self.detach(id);

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            if let Some(base) = self.bases.shift_remove(&current) {
                stack.extend(base.children);
            }
            self.nodes.shift_remove(&current);
            if self.root == Some(current) {
                self.root = None;
            }
            removed += 1;
        }

        tracing::debug!("removed {:?} ({} nodes)", id, removed);
        Ok(removed)
    }

    /// Transfer ownership of `child` to `parent`.
    ///
    /// A child registered elsewhere is detached from its old parent first.
    /// Fails with [`HudError::AlreadyRegistered`] when `parent` already owns
    /// `child`, and with [`HudError::RegistrationFailed`] when the transfer
    /// would make a node its own ancestor. Neither failure modifies the tree.
    pub fn register(&mut self, child: NodeId, parent: NodeId) -> HudResult<()> {
        let current = self.base(child)?.parent;
        if !self.contains(parent) {
            return Err(HudError::NodeNotFound(parent));
        }

        if current == Some(parent) {
            tracing::error!("{:?} is already registered to {:?}", child, parent);
            return Err(HudError::AlreadyRegistered { node: child, parent });
        }

        if child == parent || self.is_ancestor(child, parent) {
            tracing::error!("registering {:?} to {:?} would create a cycle", child, parent);
            return Err(HudError::RegistrationFailed { node: child, parent });
        }

        self.detach(child);
        if let Some(base) = self.bases.get_mut(&child) {
            base.parent = Some(parent);
        }
        if let Some(base) = self.bases.get_mut(&parent) {
            base.children.push(child);
        }

        if self.bases.get(&child).and_then(|b| b.parent) != Some(parent) {
            tracing::error!("ownership of {:?} did not pass to {:?}", child, parent);
            return Err(HudError::RegistrationFailed { node: child, parent });
        }

        tracing::trace!("registered {:?} -> {:?}", child, parent);
        Ok(())
    }

    /// Release `child` from its parent. Unparented nodes are left untouched.
    pub fn unregister(&mut self, child: NodeId) -> HudResult<()> {
        if !self.contains(child) {
            return Err(HudError::NodeNotFound(child));
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink a node from its parent's child list and container list.
    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.bases.get_mut(&child).and_then(|b| b.parent.take()) else {
            return;
        };

        if let Some(base) = self.bases.get_mut(&parent) {
            base.children.retain(|&c| c != child);
        }
        if let Some(collection) = self
            .nodes
            .get_mut(&parent)
            .and_then(|n| n.as_collection_mut())
        {
            collection.remove_node(child);
        }
        tracing::trace!("unregistered {:?} from {:?}", child, parent);
    }

    /// Returns true if `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.bases.get(&node).and_then(|b| b.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.bases.get(&id).and_then(|b| b.parent);
        }
        false
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_len(&self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut count = 0;
        while let Some(current) = stack.pop() {
            if let Some(base) = self.bases.get(&current) {
                count += 1;
                stack.extend_from_slice(&base.children);
            }
        }
        count
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.bases.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn base(&self, id: NodeId) -> HudResult<&NodeBase> {
        self.bases.get(&id).ok_or(HudError::NodeNotFound(id))
    }

    /// Host-side access to a node's layout state, only reachable between
    /// frames. Size and offset of a chain member are rewritten by the chain's
    /// next layout; use this for roots and plain collection children.
    pub fn base_mut(&mut self, id: NodeId) -> HudResult<&mut NodeBase> {
        self.bases.get_mut(&id).ok_or(HudError::NodeNotFound(id))
    }

    pub fn node(&self, id: NodeId) -> HudResult<&dyn Node> {
        self.nodes
            .get(&id)
            .map(|n| &**n)
            .ok_or(HudError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> HudResult<&mut (dyn Node + 'static)> {
        match self.nodes.get_mut(&id) {
            Some(node) => Ok(node.as_mut()),
            None => Err(HudError::NodeNotFound(id)),
        }
    }

    /// Downcast a node's behaviour to a concrete type.
    pub fn node_as<T: Node>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(&id)?.as_any().downcast_ref::<T>()
    }

    pub fn node_as_mut<T: Node>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn collection(&self, id: NodeId) -> HudResult<&Collection> {
        self.node(id)?
            .as_collection()
            .ok_or(HudError::NotACollection(id))
    }

    /// Mutable access to a collection's container list.
    ///
    /// The returned guard keeps container entries and parent links in step.
    pub fn collection_mut(&mut self, id: NodeId) -> HudResult<CollectionMut<'_>> {
        self.collection(id)?;
        Ok(CollectionMut::new(self, id))
    }

    pub(crate) fn collection_entries_mut(&mut self, id: NodeId) -> Option<&mut Collection> {
        self.nodes.get_mut(&id)?.as_collection_mut()
    }

    /// Borrow a node's behaviour together with the whole layout arena.
    pub(crate) fn split_arena_mut(
        &mut self,
        id: NodeId,
    ) -> Option<(&mut (dyn Node + 'static), &mut IndexMap<NodeId, NodeBase>)> {
        let node = self.nodes.get_mut(&id)?;
        Some((node.as_mut(), &mut self.bases))
    }

    /// Borrow a node's behaviour together with its own layout state.
    pub(crate) fn split_mut(
        &mut self,
        id: NodeId,
    ) -> Option<(&mut (dyn Node + 'static), &mut NodeBase)> {
        let node = self.nodes.get_mut(&id)?;
        let base = self.bases.get_mut(&id)?;
        Some((node.as_mut(), base))
    }

    /// Resolve a node's screen-space centre from its parent's placement, its
    /// alignment and its offset. Parents must be resolved first.
    pub(crate) fn resolve_position(&mut self, id: NodeId) {
        let Some(base) = self.bases.get(&id) else {
            return;
        };
        let parent = base
            .parent
            .and_then(|p| self.bases.get(&p))
            .map(|p| (p.position, p.size, p.padding));

        let position = match parent {
            Some((pos, size, padding)) => base.alignment.origin(pos, size, padding, base.size) + base.offset,
            None => base.offset,
        };
        if let Some(base) = self.bases.get_mut(&id) {
            base.set_position(position);
        }
    }

    /// Iterate over all node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bases.keys().copied()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.bases.clear();
        self.nodes.clear();
        self.root = None;
    }
}

impl Default for HudTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Block;

    fn tree_with(n: usize) -> (HudTree, Vec<NodeId>) {
        let mut tree = HudTree::new();
        let ids = (0..n).map(|_| tree.add_node(Block::new())).collect();
        (tree, ids)
    }

    #[test]
    fn test_register_links_both_sides() {
        let (mut tree, ids) = tree_with(2);
        tree.register(ids[1], ids[0]).unwrap();

        assert_eq!(tree.base(ids[1]).unwrap().parent(), Some(ids[0]));
        assert_eq!(tree.base(ids[0]).unwrap().children(), &[ids[1]]);
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let (mut tree, ids) = tree_with(2);
        tree.register(ids[1], ids[0]).unwrap();

        let err = tree.register(ids[1], ids[0]).unwrap_err();
        assert_eq!(
            err,
            HudError::AlreadyRegistered {
                node: ids[1],
                parent: ids[0]
            }
        );
        assert_eq!(tree.base(ids[0]).unwrap().children().len(), 1);
    }

    #[test]
    fn test_register_cycle_fails_without_mutation() {
        let (mut tree, ids) = tree_with(3);
        tree.register(ids[1], ids[0]).unwrap();
        tree.register(ids[2], ids[1]).unwrap();

        let err = tree.register(ids[0], ids[2]).unwrap_err();
        assert!(matches!(err, HudError::RegistrationFailed { .. }));
        assert_eq!(tree.base(ids[0]).unwrap().parent(), None);

        let err = tree.register(ids[0], ids[0]).unwrap_err();
        assert!(matches!(err, HudError::RegistrationFailed { .. }));
    }

    #[test]
    fn test_reparent_moves_child() {
        let (mut tree, ids) = tree_with(3);
        tree.register(ids[2], ids[0]).unwrap();
        tree.register(ids[2], ids[1]).unwrap();

        assert!(tree.base(ids[0]).unwrap().children().is_empty());
        assert_eq!(tree.base(ids[1]).unwrap().children(), &[ids[2]]);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, ids) = tree_with(4);
        tree.register(ids[1], ids[0]).unwrap();
        tree.register(ids[2], ids[1]).unwrap();
        tree.register(ids[3], ids[1]).unwrap();
        tree.set_root(ids[0]);

        assert_eq!(tree.subtree_len(ids[0]), 4);
        assert_eq!(tree.remove_node(ids[1]).unwrap(), 3);
        assert_eq!(tree.len(), 1);
        assert!(tree.base(ids[0]).unwrap().children().is_empty());
        assert_eq!(tree.root(), Some(ids[0]));
    }

    #[test]
    fn test_missing_nodes_report_not_found() {
        let (mut tree, ids) = tree_with(1);
        let ghost = NodeId(99);
        assert_eq!(tree.register(ghost, ids[0]), Err(HudError::NodeNotFound(ghost)));
        assert_eq!(tree.register(ids[0], ghost), Err(HudError::NodeNotFound(ghost)));
        assert!(matches!(
            tree.collection_mut(ids[0]),
            Err(HudError::NotACollection(_))
        ));
    }
}
