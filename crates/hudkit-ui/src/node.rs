//! The node contract shared by every HUD element.
//!
//! A node is split in two: the [`NodeBase`](crate::tree::NodeBase) held by the
//! tree (size, padding, offset, state bits, alignment, parent link) and the
//! behaviour object implementing [`Node`]. The tree calls the behaviour hooks
//! once per frame in a fixed order: `depth_test`, `handle_input`, `measure`,
//! `layout`, `draw`.

use crate::collection::Collection;
use crate::context::{DrawContext, InputContext, LayoutContext, MeasureContext};
use crate::frame::UpdatePasses;
use bitflags::bitflags;
use hudkit_core::math::Vec2;
use std::any::Any;

bitflags! {
    /// Per-node state bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeState: u8 {
        /// Node (and its subtree) takes part in the frame.
        const VISIBLE       = 0b0000_0001;
        /// Node is hit-tested against the cursor.
        const INPUT_ENABLED = 0b0000_0010;
        /// Cursor was inside the node's bounds during the last depth test.
        const MOUSE_OVER    = 0b0000_0100;
        /// Node is the topmost element under the cursor this frame.
        const CAPTURED      = 0b0000_1000;
    }
}

impl Default for NodeState {
    fn default() -> Self {
        NodeState::VISIBLE
    }
}

bitflags! {
    /// Placement of a node relative to its parent's bounds.
    ///
    /// An empty set centres the node on its parent. Edge flags place the node
    /// just outside that edge unless the matching `INNER_*` flag is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParentAlignments: u8 {
        const LEFT        = 0b0000_0001;
        const TOP         = 0b0000_0010;
        const RIGHT       = 0b0000_0100;
        const BOTTOM      = 0b0000_1000;
        /// Keep horizontally aligned nodes inside the parent.
        const INNER_H     = 0b0001_0000;
        /// Keep vertically aligned nodes inside the parent.
        const INNER_V     = 0b0010_0000;
        /// Align against the parent's bounds minus its padding.
        const USE_PADDING = 0b0100_0000;

        const INNER       = Self::INNER_H.bits() | Self::INNER_V.bits();
    }
}

impl ParentAlignments {
    /// Horizontal edge flags.
    pub const HORIZONTAL_EDGES: Self = Self::LEFT.union(Self::RIGHT);
    /// Vertical edge flags.
    pub const VERTICAL_EDGES: Self = Self::TOP.union(Self::BOTTOM);

    /// Centre point for a child of `child_size` placed against a parent
    /// centred at `parent_pos`.
    ///
    /// Opposing edge flags on the same axis cancel out.
    pub fn origin(self, parent_pos: Vec2, parent_size: Vec2, parent_padding: Vec2, child_size: Vec2) -> Vec2 {
        let bounds = if self.contains(Self::USE_PADDING) {
            (parent_size - parent_padding).max(Vec2::ZERO)
        } else {
            parent_size
        };
        let half = bounds * 0.5;
        let child_half = child_size * 0.5;
        let mut origin = parent_pos;

        let (left, right) = (self.contains(Self::LEFT), self.contains(Self::RIGHT));
        if left != right {
            let inner = if self.contains(Self::INNER_H) { child_half.x } else { -child_half.x };
            if left {
                origin.x += -half.x + inner;
            } else {
                origin.x += half.x - inner;
            }
        }

        let (top, bottom) = (self.contains(Self::TOP), self.contains(Self::BOTTOM));
        if top != bottom {
            let inner = if self.contains(Self::INNER_V) { child_half.y } else { -child_half.y };
            if top {
                origin.y += -half.y + inner;
            } else {
                origin.y += half.y - inner;
            }
        }

        origin
    }
}

/// Behaviour half of a HUD node.
///
/// Every hook has a no-op default, so a leaf only overrides what it needs.
/// Nodes that own a [`Collection`] expose it through the capability queries so
/// that registration and traversal can reach their containers.
pub trait Node: Any {
    /// Get node type as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get mutable node type as Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Name used in logs.
    fn debug_name(&self) -> &str {
        "Node"
    }

    /// Which of the four per-frame callbacks this node takes part in.
    fn update_passes(&self) -> UpdatePasses {
        UpdatePasses::all()
    }

    /// Adjust hit-test state after the cursor has been tested against the
    /// node's bounds.
    fn depth_test(&mut self, _cx: &mut InputContext<'_>) {}

    /// React to input. Called topmost first.
    fn handle_input(&mut self, _cx: &mut InputContext<'_>) {}

    /// Resolve this node's own size. Called deepest first.
    fn measure(&mut self, _cx: &mut MeasureContext<'_>) {}

    /// Size and place direct children. Called shallowest first.
    fn layout(&mut self, _cx: &mut LayoutContext<'_>) {}

    fn draw(&mut self, _cx: &mut DrawContext<'_>) {}

    fn as_collection(&self) -> Option<&Collection> {
        None
    }

    fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: Vec2 = Vec2::new(100.0, 50.0);
    const PARENT_SIZE: Vec2 = Vec2::new(200.0, 100.0);
    const CHILD: Vec2 = Vec2::new(20.0, 10.0);

    #[test]
    fn test_empty_alignment_centres() {
        let origin = ParentAlignments::empty().origin(PARENT, PARENT_SIZE, Vec2::ZERO, CHILD);
        assert_eq!(origin, PARENT);
    }

    #[test]
    fn test_outer_and_inner_edges() {
        let outer = ParentAlignments::LEFT.origin(PARENT, PARENT_SIZE, Vec2::ZERO, CHILD);
        assert_eq!(outer, Vec2::new(100.0 - 100.0 - 10.0, 50.0));

        let inner = (ParentAlignments::LEFT | ParentAlignments::INNER_H).origin(
            PARENT,
            PARENT_SIZE,
            Vec2::ZERO,
            CHILD,
        );
        assert_eq!(inner, Vec2::new(100.0 - 100.0 + 10.0, 50.0));

        let bottom = (ParentAlignments::BOTTOM | ParentAlignments::INNER_V).origin(
            PARENT,
            PARENT_SIZE,
            Vec2::ZERO,
            CHILD,
        );
        assert_eq!(bottom, Vec2::new(100.0, 50.0 + 50.0 - 5.0));
    }

    #[test]
    fn test_padding_shrinks_bounds() {
        let flags = ParentAlignments::RIGHT | ParentAlignments::INNER_H | ParentAlignments::USE_PADDING;
        let origin = flags.origin(PARENT, PARENT_SIZE, Vec2::new(40.0, 0.0), CHILD);
        assert_eq!(origin.x, 100.0 + 80.0 - 10.0);
    }

    #[test]
    fn test_opposing_edges_cancel() {
        let flags = ParentAlignments::LEFT | ParentAlignments::RIGHT;
        let origin = flags.origin(PARENT, PARENT_SIZE, Vec2::ZERO, CHILD);
        assert_eq!(origin, PARENT);
    }

    #[test]
    fn test_default_state_is_visible() {
        assert!(NodeState::default().contains(NodeState::VISIBLE));
        assert!(!NodeState::default().contains(NodeState::INPUT_ENABLED));
    }
}
