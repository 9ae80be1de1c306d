//! Minimal leaf nodes.
//!
//! Real widgets live outside this crate; these are enough to build panels and
//! lists whose geometry reaches the draw list.

use crate::context::{DrawContext, MeasureContext};
use crate::frame::UpdatePasses;
use crate::node::Node;
use hudkit_core::math::Vec2;
use std::any::Any;

/// Solid rectangle covering its node's bounds.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Size re-applied on every measure, if set.
    preferred_size: Option<Vec2>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block that measures itself to `size` each frame.
    pub fn with_size(size: Vec2) -> Self {
        Self {
            preferred_size: Some(size),
        }
    }

    pub fn preferred_size(&self) -> Option<Vec2> {
        self.preferred_size
    }

    pub fn set_preferred_size(&mut self, size: Option<Vec2>) {
        self.preferred_size = size;
    }
}

impl Node for Block {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &str {
        "Block"
    }

    fn measure(&mut self, cx: &mut MeasureContext<'_>) {
        if let Some(size) = self.preferred_size {
            cx.set_size(size);
        }
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        if !cx.bounds().is_empty() {
            cx.push_quad();
        }
    }
}

/// Invisible filler. Give it a container weight to soak up leftover space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spacer;

impl Node for Spacer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &str {
        "Spacer"
    }

    fn update_passes(&self) -> UpdatePasses {
        UpdatePasses::empty()
    }
}
