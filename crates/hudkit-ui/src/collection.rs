//! Ordered child containers and the ownership contract around them.
//!
//! A [`Collection`] is the list half: containers in order, plus search and
//! sort. Adding or removing entries changes parent links in the tree, so all
//! list mutation goes through [`CollectionMut`], which registers a child before
//! its container is inserted and unregisters it when the container leaves.

use crate::error::{HudError, HudResult};
use crate::frame::UpdatePasses;
use crate::node::Node;
use crate::tree::{HudTree, NodeId};
use std::any::Any;
use std::cmp::Ordering;

/// One collection entry: a child node and its share of leftover space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub node: NodeId,
    /// Weight along a chain's align axis. `0.0` keeps the child's own size;
    /// positive values split leftover space proportionally.
    pub align_axis_scale: f32,
}

impl Container {
    /// Fixed-size container.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            align_axis_scale: 0.0,
        }
    }

    pub fn with_scale(node: NodeId, align_axis_scale: f32) -> Self {
        Self {
            node,
            align_axis_scale: align_axis_scale.max(0.0),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.align_axis_scale <= 0.0
    }
}

impl From<NodeId> for Container {
    fn from(node: NodeId) -> Self {
        Container::new(node)
    }
}

/// Ordered list of containers owned by a collection node.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    containers: Vec<Container>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Container> {
        self.containers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Container> {
        self.containers.get(index)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.containers.iter().any(|c| c.node == node)
    }

    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.containers.iter().position(|c| c.node == node)
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<&Container>
    where
        P: FnMut(&Container) -> bool,
    {
        self.containers.iter().find(|c| predicate(c))
    }

    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&Container) -> bool,
    {
        self.containers.iter().position(predicate)
    }

    /// Stable sort with a caller-supplied comparator. Child state is untouched.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Container, &Container) -> Ordering,
    {
        self.containers.sort_by(compare);
    }

    /// Sort into node creation order.
    pub fn sort(&mut self) {
        self.containers.sort_by_key(|c| c.node);
    }

    /// Change a container's weight. Returns false if the index is out of range.
    pub fn set_scale(&mut self, index: usize, align_axis_scale: f32) -> bool {
        match self.containers.get_mut(index) {
            Some(container) => {
                container.align_axis_scale = align_axis_scale.max(0.0);
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_entry(&mut self, index: usize, container: Container) {
        self.containers.insert(index, container);
    }

    /// Drop the container for `node`, keeping the order of the rest.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> Option<Container> {
        let index = self.index_of(node)?;
        Some(self.containers.remove(index))
    }
}

/// Guard for mutating a collection node's containers.
///
/// Obtained from [`HudTree::collection_mut`]. Every operation either
/// completes fully or returns an error without touching the tree.
pub struct CollectionMut<'a> {
    tree: &'a mut HudTree,
    id: NodeId,
}

impl<'a> CollectionMut<'a> {
    pub(crate) fn new(tree: &'a mut HudTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn entries(&self) -> &Collection {
        // Construction checked the capability; an empty fallback keeps this total.
        static EMPTY: Collection = Collection {
            containers: Vec::new(),
        };
        self.tree.collection(self.id).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn collection(&self) -> &Collection {
        self.entries()
    }

    /// Append a container, registering its node to this collection.
    pub fn add(&mut self, container: impl Into<Container>) -> HudResult<()> {
        let index = self.len();
        self.insert(index, container)
    }

    /// Insert a container at `index`, registering its node to this collection.
    pub fn insert(&mut self, index: usize, container: impl Into<Container>) -> HudResult<()> {
        let container = container.into();
        let len = self.len();
        if index > len {
            return Err(HudError::IndexOutOfRange { index, len });
        }

        self.tree.register(container.node, self.id)?;

        match self.tree.collection_entries_mut(self.id) {
            Some(entries) => {
                entries.insert_entry(index, container);
                Ok(())
            }
            None => {
                // Registration succeeded but the list vanished; undo the link.
                self.tree.unregister(container.node)?;
                Err(HudError::NotACollection(self.id))
            }
        }
    }

    /// Remove the container holding `node`. Returns false if it is not here.
    pub fn remove(&mut self, node: NodeId) -> HudResult<bool> {
        if !self.entries().contains(node) {
            return Ok(false);
        }
        self.tree.unregister(node)?;
        Ok(true)
    }

    pub fn remove_at(&mut self, index: usize) -> HudResult<Container> {
        let len = self.len();
        let container = *self
            .entries()
            .get(index)
            .ok_or(HudError::IndexOutOfRange { index, len })?;
        self.tree.unregister(container.node)?;
        Ok(container)
    }

    /// Remove `count` containers starting at `start`.
    pub fn remove_range(&mut self, start: usize, count: usize) -> HudResult<()> {
        let len = self.len();
        let end = start
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(HudError::InvalidRange { start, count, len })?;

        let nodes: Vec<NodeId> = self.entries().containers()[start..end]
            .iter()
            .map(|c| c.node)
            .collect();
        for node in nodes {
            self.tree.unregister(node)?;
        }
        Ok(())
    }

    /// Remove every container.
    pub fn clear(&mut self) -> HudResult<()> {
        let len = self.len();
        self.remove_range(0, len)
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Container, &Container) -> Ordering,
    {
        if let Some(entries) = self.tree.collection_entries_mut(self.id) {
            entries.sort_by(compare);
        }
    }

    pub fn sort(&mut self) {
        if let Some(entries) = self.tree.collection_entries_mut(self.id) {
            entries.sort();
        }
    }

    pub fn set_scale(&mut self, index: usize, align_axis_scale: f32) -> HudResult<()> {
        let len = self.len();
        let updated = self
            .tree
            .collection_entries_mut(self.id)
            .is_some_and(|entries| entries.set_scale(index, align_axis_scale));
        if updated {
            Ok(())
        } else {
            Err(HudError::IndexOutOfRange { index, len })
        }
    }
}

/// Plain collection node: owns containers but leaves their placement to
/// each child's own offset and alignment.
#[derive(Debug, Default)]
pub struct HudCollection {
    collection: Collection,
}

impl HudCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Node for HudCollection {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &str {
        "HudCollection"
    }

    fn update_passes(&self) -> UpdatePasses {
        UpdatePasses::DEPTH_TEST | UpdatePasses::INPUT | UpdatePasses::LAYOUT
    }

    fn as_collection(&self) -> Option<&Collection> {
        Some(&self.collection)
    }

    fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        Some(&mut self.collection)
    }
}
