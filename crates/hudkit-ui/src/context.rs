//! Per-hook contexts handed to [`Node`](crate::node::Node) callbacks.
//!
//! Each context only lends out what its hook is allowed to touch. In
//! particular, [`LayoutContext::child_mut`] is the sole way for a node to write
//! the size and offset of another node, and it only grants a [`LayoutHandle`]
//! for direct children while the parent's `layout` call is running.

use crate::draw_list::{DrawList, QuadCommand};
use crate::node::{NodeState, ParentAlignments};
use crate::tree::{NodeBase, NodeId};
use hudkit_core::geometry::Bounds;
use hudkit_core::math::Vec2;
use indexmap::IndexMap;

/// Context for [`Node::measure`](crate::node::Node::measure).
///
/// Grants write access to the node's own size and read access to its direct
/// children.
pub struct MeasureContext<'a> {
    id: NodeId,
    bases: &'a mut IndexMap<NodeId, NodeBase>,
}

impl<'a> MeasureContext<'a> {
    pub(crate) fn new(id: NodeId, bases: &'a mut IndexMap<NodeId, NodeBase>) -> Self {
        Self { id, bases }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn base(&self) -> &NodeBase {
        &self.bases[&self.id]
    }

    pub fn set_size(&mut self, size: Vec2) {
        if let Some(base) = self.bases.get_mut(&self.id) {
            base.set_size(size);
        }
    }

    /// Read a direct child's layout state.
    pub fn child(&self, child: NodeId) -> Option<&NodeBase> {
        self.bases
            .get(&child)
            .filter(|base| base.parent() == Some(self.id))
    }
}

/// Context for [`Node::layout`](crate::node::Node::layout).
pub struct LayoutContext<'a> {
    id: NodeId,
    bases: &'a mut IndexMap<NodeId, NodeBase>,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(id: NodeId, bases: &'a mut IndexMap<NodeId, NodeBase>) -> Self {
        Self { id, bases }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn base(&self) -> &NodeBase {
        &self.bases[&self.id]
    }

    pub fn child(&self, child: NodeId) -> Option<&NodeBase> {
        self.bases
            .get(&child)
            .filter(|base| base.parent() == Some(self.id))
    }

    /// Borrow a direct child's size and offset for writing.
    ///
    /// Returns `None` for nodes that are not registered to this node.
    pub fn child_mut(&mut self, child: NodeId) -> Option<LayoutHandle<'_>> {
        let id = self.id;
        self.bases
            .get_mut(&child)
            .filter(|base| base.parent() == Some(id))
            .map(|base| LayoutHandle { base })
    }
}

/// Write access to one child's layout state, valid for a single parent
/// `layout` call.
pub struct LayoutHandle<'a> {
    base: &'a mut NodeBase,
}

impl LayoutHandle<'_> {
    pub fn size(&self) -> Vec2 {
        self.base.size()
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.base.set_size(size);
    }

    pub fn offset(&self) -> Vec2 {
        self.base.offset()
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.base.set_offset(offset);
    }

    pub fn alignment(&self) -> ParentAlignments {
        self.base.alignment()
    }

    pub fn set_alignment(&mut self, alignment: ParentAlignments) {
        self.base.set_alignment(alignment);
    }

    pub fn is_visible(&self) -> bool {
        self.base.is_visible()
    }
}

/// Cursor state shared by the depth-test and input passes of one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorState {
    /// Cursor position in screen space, `None` when no cursor is shown.
    pub position: Option<Vec2>,
    /// Last node in draw order whose depth test reported the cursor over it.
    pub hovered: Option<NodeId>,
    /// Node that captured the cursor during the input pass.
    pub captured: Option<NodeId>,
}

/// Context for the depth-test and input hooks.
pub struct InputContext<'a> {
    id: NodeId,
    base: &'a mut NodeBase,
    cursor: &'a mut CursorState,
}

impl<'a> InputContext<'a> {
    pub(crate) fn new(id: NodeId, base: &'a mut NodeBase, cursor: &'a mut CursorState) -> Self {
        Self { id, base, cursor }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn base(&self) -> &NodeBase {
        self.base
    }

    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor.position
    }

    pub fn is_mouse_over(&self) -> bool {
        self.base.is_mouse_over()
    }

    /// Override the result of the bounds test, e.g. for non-rectangular nodes.
    pub fn set_mouse_over(&mut self, over: bool) {
        self.base.set_state(NodeState::MOUSE_OVER, over);
    }

    /// Returns true if this node holds the cursor this frame.
    pub fn is_captured(&self) -> bool {
        self.cursor.captured == Some(self.id)
    }

    /// Take the cursor if nothing above this node has.
    pub fn capture(&mut self) -> bool {
        match self.cursor.captured {
            Some(owner) => owner == self.id,
            None => {
                self.cursor.captured = Some(self.id);
                self.base.set_state(NodeState::CAPTURED, true);
                true
            }
        }
    }

    pub fn release(&mut self) {
        if self.cursor.captured == Some(self.id) {
            self.cursor.captured = None;
            self.base.set_state(NodeState::CAPTURED, false);
        }
    }
}

/// Context for [`Node::draw`](crate::node::Node::draw).
pub struct DrawContext<'a> {
    id: NodeId,
    base: &'a NodeBase,
    z: i16,
    depth: u16,
    list: &'a mut DrawList,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(id: NodeId, base: &'a NodeBase, z: i16, depth: u16, list: &'a mut DrawList) -> Self {
        Self {
            id,
            base,
            z,
            depth,
            list,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn base(&self) -> &NodeBase {
        self.base
    }

    pub fn bounds(&self) -> Bounds {
        self.base.bounds()
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Emit a quad covering the node's bounds.
    pub fn push_quad(&mut self) {
        self.list.push(QuadCommand {
            node: self.id,
            position: self.base.position(),
            size: self.base.size(),
            z: self.z,
            depth: self.depth,
        });
    }
}
