//! Retained draw list filled by the draw pass.
//!
//! The list is API-agnostic: an external renderer walks the commands in order
//! and turns them into billboards, quads or text. Commands arrive already
//! sorted by (z, depth), so later commands occlude earlier ones.

use crate::tree::NodeId;
use hudkit_core::math::Vec2;

/// High-level draw command for a HUD element.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw a rectangle covering a node's bounds
    Quad(QuadCommand),
}

impl DrawCommand {
    /// Get the node ID that owns this command.
    pub fn node_id(&self) -> NodeId {
        match self {
            DrawCommand::Quad(q) => q.node,
        }
    }

    /// Get the z-priority the command was recorded with.
    pub fn z(&self) -> i16 {
        match self {
            DrawCommand::Quad(q) => q.z,
        }
    }
}

/// Command to draw a quad (rectangle).
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCommand {
    /// Node that owns this command
    pub node: NodeId,
    /// Centre in screen space
    pub position: Vec2,
    pub size: Vec2,
    pub z: i16,
    /// Tree depth of the owning node
    pub depth: u16,
}

impl From<QuadCommand> for DrawCommand {
    fn from(quad: QuadCommand) -> Self {
        DrawCommand::Quad(quad)
    }
}

/// Ordered list of draw commands for one frame.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: impl Into<DrawCommand>) {
        self.commands.push(command.into());
    }

    /// Drop all commands, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands emitted by a specific node.
    pub fn commands_for(&self, node: NodeId) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |cmd| cmd.node_id() == node)
    }

    /// Node ids in the order they were drawn.
    pub fn draw_order(&self) -> Vec<NodeId> {
        self.commands.iter().map(DrawCommand::node_id).collect()
    }
}
