//! Linear stacking collections.
//!
//! A [`Chain`] arranges its containers one after another along its align axis
//! (vertical by default) and sizes itself and its members according to a
//! [`SizingMode`]. Layout runs in two steps each frame:
//!
//! - `measure` (deepest first): sum the visible members and resize the chain
//!   on the axes its sizing mode lets it change.
//! - `layout` (shallowest first): resolve member sizes, then write each
//!   member's size, offset and alignment through its layout handle.
//!
//! Both steps depend only on the current sizes, so running them again with
//! nothing changed reproduces the same result.
//!
//! ```
//! use hudkit_ui::chain::{Chain, ChainConfig, Sizing, SizingMode};
//!
//! let chain = Chain::new(
//!     ChainConfig::vertical()
//!         .with_sizing(SizingMode::new().with_chain_align(Sizing::Fit))
//!         .with_spacing(4.0),
//! );
//! assert_eq!(chain.config().spacing, 4.0);
//! ```

pub mod layout;
pub mod sizing;

pub use layout::{MemberBounds, MemberSlot, Span};
pub use sizing::{ChainSizingFlags, MemberAlignment, Sizing, SizingMode};

use crate::collection::Collection;
use crate::context::{LayoutContext, MeasureContext};
use crate::frame::UpdatePasses;
use crate::node::Node;
use crate::tree::{NodeBase, NodeId};
use hudkit_core::math::Vec2;
use hudkit_core::profiling::profile_function;
use std::any::Any;

/// Chain settings. Normalised when handed to a [`Chain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    pub sizing: SizingMode,
    /// Gap between consecutive visible members.
    pub spacing: f32,
    /// Minimum member size. Zero components are unbounded.
    pub member_min_size: Vec2,
    /// Maximum member size. Zero components defer to the chain.
    pub member_max_size: Vec2,
    /// Stack along the screen's y axis instead of its x axis.
    pub align_vertical: bool,
    /// Inward shift applied to members aligned to an off-axis edge.
    pub off_axis_nudge: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            sizing: SizingMode::new(),
            spacing: 0.0,
            member_min_size: Vec2::ZERO,
            member_max_size: Vec2::ZERO,
            align_vertical: true,
            off_axis_nudge: 0.0,
        }
    }
}

impl ChainConfig {
    pub fn vertical() -> Self {
        Self::default()
    }

    pub fn horizontal() -> Self {
        Self {
            align_vertical: false,
            ..Self::default()
        }
    }

    pub fn with_sizing(mut self, sizing: impl Into<SizingMode>) -> Self {
        self.sizing = sizing.into();
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_member_min_size(mut self, size: Vec2) -> Self {
        self.member_min_size = size;
        self
    }

    pub fn with_member_max_size(mut self, size: Vec2) -> Self {
        self.member_max_size = size;
        self
    }

    pub fn with_align_vertical(mut self, vertical: bool) -> Self {
        self.align_vertical = vertical;
        self
    }

    pub fn with_off_axis_nudge(mut self, nudge: f32) -> Self {
        self.off_axis_nudge = nudge;
        self
    }

    /// Clamp negative and non-finite values to zero.
    pub fn normalized(self) -> Self {
        fn non_negative(v: f32) -> f32 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }
        let vec = |v: Vec2| Vec2::new(non_negative(v.x), non_negative(v.y));

        Self {
            spacing: non_negative(self.spacing),
            member_min_size: vec(self.member_min_size),
            member_max_size: vec(self.member_max_size),
            off_axis_nudge: if self.off_axis_nudge.is_finite() { self.off_axis_nudge } else { 0.0 },
            ..self
        }
    }

    fn bounds(&self) -> MemberBounds {
        let vertical = self.align_vertical;
        MemberBounds {
            min: Span::from_vec(self.member_min_size, vertical),
            max: Span::from_vec(self.member_max_size, vertical),
        }
    }
}

/// Collection node that stacks its members along one axis.
#[derive(Debug, Default)]
pub struct Chain {
    collection: Collection,
    config: ChainConfig,
    range_size: f32,
    slots: Vec<MemberSlot>,
}

impl Chain {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config: config.normalized(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChainConfig) {
        self.config = config.normalized();
    }

    pub fn sizing(&self) -> SizingMode {
        self.config.sizing
    }

    pub fn set_sizing(&mut self, sizing: impl Into<SizingMode>) {
        self.config.sizing = sizing.into();
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.set_config(self.config.with_spacing(spacing));
    }

    pub fn set_member_min_size(&mut self, size: Vec2) {
        self.set_config(self.config.with_member_min_size(size));
    }

    pub fn set_member_max_size(&mut self, size: Vec2) {
        self.set_config(self.config.with_member_max_size(size));
    }

    pub fn set_align_vertical(&mut self, vertical: bool) {
        self.config.align_vertical = vertical;
    }

    pub fn set_off_axis_nudge(&mut self, nudge: f32) {
        self.set_config(self.config.with_off_axis_nudge(nudge));
    }

    /// Align-axis span the visible members occupied in the last layout,
    /// spacing included.
    pub fn range_size(&self) -> f32 {
        self.range_size
    }

    /// Copy the containers' current state into the slot buffer.
    fn fill_slots<'b>(&mut self, lookup: impl Fn(NodeId) -> Option<&'b NodeBase>) {
        let vertical = self.config.align_vertical;
        self.slots.clear();
        for container in self.collection.iter() {
            // Containers always point at registered children; skip any that do not.
            let Some(base) = lookup(container.node) else {
                continue;
            };
            self.slots.push(MemberSlot::new(
                container.node,
                Span::from_vec(base.size(), vertical),
                container.align_axis_scale,
                base.is_visible(),
            ));
        }
    }
}

impl Node for Chain {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &str {
        "Chain"
    }

    fn update_passes(&self) -> UpdatePasses {
        UpdatePasses::LAYOUT
    }

    fn measure(&mut self, cx: &mut MeasureContext<'_>) {
        profile_function!();

        let vertical = self.config.align_vertical;
        let base = cx.base();
        let uninitialized = base.size() == Vec2::ZERO;

        let mut mode = self.config.sizing;
        if uninitialized {
            if mode.chain_align == Sizing::None {
                mode.chain_align = Sizing::Fit;
            }
            if mode.chain_off == Sizing::None {
                mode.chain_off = Sizing::Fit;
            }
        }
        if !mode.sizes_chain() {
            return;
        }

        let size = Span::from_vec(base.size(), vertical);
        let padding = Span::from_vec(base.padding(), vertical);
        let content = Span::from_vec(base.content_size(), vertical);

        // A chain that resizes itself off-axis must not cap members at its stale size.
        let implicit_off = if mode.chain_off == Sizing::None { content.off } else { 0.0 };

        let ctx: &MeasureContext<'_> = cx;
        self.fill_slots(move |id| ctx.child(id));
        let range = layout::measure_range(
            &self.slots,
            &mode,
            &self.config.bounds(),
            self.config.spacing,
            implicit_off,
        );

        let resized = Span::new(
            layout::apply_chain_sizing(mode.chain_align, size.align, range.align + padding.align),
            layout::apply_chain_sizing(mode.chain_off, size.off, range.off + padding.off),
        );
        if resized != size {
            tracing::trace!("chain {:?} measured {:?}", cx.id(), resized);
            cx.set_size(resized.to_vec(vertical));
        }
    }

    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        profile_function!();

        let vertical = self.config.align_vertical;
        let base = cx.base();
        let size = base.size();
        if size.x <= 0.0 || size.y <= 0.0 || self.collection.is_empty() {
            return;
        }
        let content = Span::from_vec(base.content_size(), vertical);

        let ctx: &LayoutContext<'_> = cx;
        self.fill_slots(move |id| ctx.child(id));

        let config = self.config;
        self.range_size = layout::resolve_member_sizes(
            &mut self.slots,
            &config.sizing,
            &config.bounds(),
            config.spacing,
            content,
        );
        layout::position_members(
            &mut self.slots,
            config.sizing.alignment,
            config.spacing,
            content.align,
            self.range_size,
        );

        for slot in self.slots.iter().filter(|s| s.visible) {
            let Some(mut member) = cx.child_mut(slot.node) else {
                continue;
            };
            let alignment = layout::mask_member_alignment(member.alignment(), vertical);
            let off = layout::off_axis_offset(alignment, vertical, config.off_axis_nudge);

            member.set_alignment(alignment);
            member.set_size(slot.size.to_vec(vertical));
            member.set_offset(Span::new(slot.offset, off).to_vec(vertical));
        }
    }

    fn as_collection(&self) -> Option<&Collection> {
        Some(&self.collection)
    }

    fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        Some(&mut self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Container;
    use crate::tree::HudTree;
    use crate::widgets::Block;

    fn build(config: ChainConfig, sizes: &[Vec2]) -> (HudTree, NodeId, Vec<NodeId>) {
        let mut tree = HudTree::new();
        let chain = tree.add_node(Chain::new(config));
        let mut ids = Vec::new();
        for &size in sizes {
            let id = tree.add_node(Block::new());
            tree.base_mut(id).unwrap().set_size(size);
            tree.collection_mut(chain).unwrap().add(id).unwrap();
            ids.push(id);
        }
        (tree, chain, ids)
    }

    fn measure(tree: &mut HudTree, id: NodeId) {
        let (node, bases) = tree.split_arena_mut(id).unwrap();
        node.measure(&mut MeasureContext::new(id, bases));
    }

    fn layout(tree: &mut HudTree, id: NodeId) {
        let (node, bases) = tree.split_arena_mut(id).unwrap();
        node.layout(&mut LayoutContext::new(id, bases));
    }

    #[test]
    fn test_config_normalizes() {
        let config = ChainConfig::horizontal()
            .with_spacing(-3.0)
            .with_member_max_size(Vec2::new(-1.0, f32::NAN))
            .normalized();
        assert_eq!(config.spacing, 0.0);
        assert_eq!(config.member_max_size, Vec2::ZERO);
        assert!(!config.align_vertical);
    }

    #[test]
    fn test_uninitialized_chain_fits() {
        let (mut tree, chain, _) = build(
            ChainConfig::vertical().with_spacing(2.0),
            &[Vec2::new(30.0, 10.0), Vec2::new(50.0, 20.0)],
        );
        measure(&mut tree, chain);
        assert_eq!(tree.base(chain).unwrap().size(), Vec2::new(50.0, 32.0));

        // Once sized, a chain with no self-sizing keeps its size.
        tree.base_mut(chain).unwrap().set_size(Vec2::new(100.0, 100.0));
        measure(&mut tree, chain);
        assert_eq!(tree.base(chain).unwrap().size(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_fit_includes_padding() {
        let (mut tree, chain, _) = build(
            ChainConfig::horizontal().with_sizing(SizingMode::fit_chain()),
            &[Vec2::new(30.0, 10.0), Vec2::new(50.0, 20.0)],
        );
        tree.base_mut(chain).unwrap().set_padding(Vec2::new(8.0, 4.0));
        measure(&mut tree, chain);
        assert_eq!(tree.base(chain).unwrap().size(), Vec2::new(88.0, 24.0));
    }

    #[test]
    fn test_layout_writes_through_handles() {
        let (mut tree, chain, ids) = build(
            ChainConfig::vertical()
                .with_sizing(SizingMode::new().with_member_off(Sizing::Fit))
                .with_off_axis_nudge(2.0),
            &[Vec2::new(20.0, 80.0), Vec2::new(20.0, 80.0)],
        );
        tree.base_mut(chain).unwrap().set_size(Vec2::new(60.0, 200.0));
        tree.base_mut(ids[1])
            .unwrap()
            .set_alignment(crate::node::ParentAlignments::LEFT);
        layout(&mut tree, chain);

        let first = tree.base(ids[0]).unwrap();
        assert_eq!(first.size(), Vec2::new(60.0, 80.0));
        assert!((first.offset().y - -60.0).abs() < 1e-4);
        assert_eq!(first.offset().x, 0.0);

        let second = tree.base(ids[1]).unwrap();
        assert!((second.offset().y - 20.0).abs() < 1e-4);
        assert_eq!(second.offset().x, 2.0);
        assert_eq!(tree.node_as::<Chain>(chain).unwrap().range_size(), 160.0);
    }

    #[test]
    fn test_layout_skips_zero_sized_chain() {
        let (mut tree, chain, ids) = build(ChainConfig::vertical(), &[Vec2::new(10.0, 10.0)]);
        tree.base_mut(ids[0]).unwrap().set_offset(Vec2::new(5.0, 5.0));
        tree.base_mut(chain).unwrap().set_size(Vec2::new(0.0, 100.0));
        layout(&mut tree, chain);
        assert_eq!(tree.base(ids[0]).unwrap().offset(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_weighted_container_fills_leftover() {
        let mut tree = HudTree::new();
        let chain = tree.add_node(Chain::new(ChainConfig::horizontal()));
        let fixed = tree.add_node(Block::new());
        let filler = tree.add_node(Block::new());
        tree.base_mut(fixed).unwrap().set_size(Vec2::new(40.0, 10.0));
        {
            let mut members = tree.collection_mut(chain).unwrap();
            members.add(fixed).unwrap();
            members.add(Container::with_scale(filler, 1.0)).unwrap();
        }
        tree.base_mut(chain).unwrap().set_size(Vec2::new(100.0, 10.0));
        layout(&mut tree, chain);

        assert_eq!(tree.base(filler).unwrap().size().x, 60.0);
        assert!((tree.base(filler).unwrap().offset().x - 20.0).abs() < 1e-4);
    }
}
