//! The per-frame driver.
//!
//! [`FrameDriver::run_frame`] flattens the tree into update records, sorts
//! them by `(z, depth)` and runs the four passes over the sorted buffer:
//!
//! 1. depth test, ascending: hit-test the cursor against each input-enabled
//!    node. The last hit is the topmost node.
//! 2. input, descending: the topmost hovered node captures the cursor, then
//!    every node handles input from the top down.
//! 3. layout: `measure` deepest first, then position resolution and `layout`
//!    shallowest first.
//! 4. draw, ascending: later commands occlude earlier ones.

use crate::context::{CursorState, DrawContext, InputContext, LayoutContext, MeasureContext};
use crate::draw_list::DrawList;
use crate::frame::{FrameBuffer, UpdatePasses, UpdateRecord, get_update_accessors};
use crate::metrics::{FrameMetrics, MetricsTimer};
use crate::node::NodeState;
use crate::tree::{HudTree, NodeId};
use hudkit_core::alloc::HashSet;
use hudkit_core::math::Vec2;
use hudkit_core::profiling::{profile_function, profile_scope};

/// Change in which nodes are under the cursor, relative to the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    /// Cursor entered the node's bounds.
    Enter(NodeId),
    /// Cursor left the node's bounds, or the node stopped being tested.
    Leave(NodeId),
}

/// Runs frames over a [`HudTree`], reusing its buffers between frames.
#[derive(Debug, Default)]
pub struct FrameDriver {
    buffer: FrameBuffer,
    /// Record indices ordered by depth, for the layout pass.
    layout_order: Vec<usize>,
    draw_list: DrawList,
    cursor: CursorState,
    hovered: HashSet<NodeId>,
    previous_hovered: HashSet<NodeId>,
    hover_events: Vec<HoverEvent>,
    metrics: FrameMetrics,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver with room for `capacity` records before the first reallocation.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: FrameBuffer::with_capacity(capacity),
            layout_order: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Run one frame over the subtree rooted at `root`.
    pub fn run_frame(&mut self, tree: &mut HudTree, root: NodeId, cursor: Option<Vec2>) -> FrameMetrics {
        profile_function!();
        let frame_timer = MetricsTimer::start();
        let mut metrics = FrameMetrics::new();

        if !tree.contains(root) {
            tracing::warn!("frame root {:?} is not in the tree", root);
        }

        let timer = MetricsTimer::start();
        self.buffer.clear();
        get_update_accessors(tree, root, &mut self.buffer, 0, 0);
        self.buffer.sort();
        metrics.records = self.buffer.len();
        metrics.traversal_time = timer.stop();

        let timer = MetricsTimer::start();
        metrics.depth_tested = self.depth_test_pass(tree, cursor);
        metrics.depth_test_time = timer.stop();

        let timer = MetricsTimer::start();
        metrics.input_handled = self.input_pass(tree);
        metrics.input_time = timer.stop();
        self.diff_hover(tree);
        metrics.hovered = self.hovered.len();

        let timer = MetricsTimer::start();
        metrics.laid_out = self.layout_pass(tree);
        metrics.layout_time = timer.stop();

        let timer = MetricsTimer::start();
        self.draw_pass(tree);
        metrics.draw_commands = self.draw_list.len();
        metrics.draw_time = timer.stop();

        metrics.total_time = frame_timer.stop();
        tracing::trace!("{}", metrics.format_summary());

        self.metrics = metrics.clone();
        metrics
    }

    fn depth_test_pass(&mut self, tree: &mut HudTree, cursor: Option<Vec2>) -> usize {
        profile_scope!("depth_test");

        std::mem::swap(&mut self.previous_hovered, &mut self.hovered);
        self.hovered.clear();
        self.cursor = CursorState {
            position: cursor,
            hovered: None,
            captured: None,
        };

        let mut tested = 0;
        for record in self.buffer.iter().filter(|r| r.takes_part(UpdatePasses::DEPTH_TEST)) {
            let Some((node, base)) = tree.split_mut(record.node) else {
                continue;
            };

            let over = base.is_input_enabled() && cursor.is_some_and(|p| base.bounds().contains(p));
            base.set_state(NodeState::MOUSE_OVER, over);
            node.depth_test(&mut InputContext::new(record.node, base, &mut self.cursor));

            if base.is_mouse_over() {
                self.cursor.hovered = Some(record.node);
                self.hovered.insert(record.node);
            }
            tested += 1;
        }
        tested
    }

    fn input_pass(&mut self, tree: &mut HudTree) -> usize {
        profile_scope!("input");

        let mut handled = 0;
        for record in self.buffer.iter().rev().filter(|r| r.takes_part(UpdatePasses::INPUT)) {
            let Some((node, base)) = tree.split_mut(record.node) else {
                continue;
            };

            base.set_state(NodeState::CAPTURED, false);
            if self.cursor.captured.is_none() && self.cursor.hovered == Some(record.node) {
                self.cursor.captured = Some(record.node);
                base.set_state(NodeState::CAPTURED, true);
            }
            node.handle_input(&mut InputContext::new(record.node, base, &mut self.cursor));
            handled += 1;
        }
        handled
    }

    fn diff_hover(&mut self, tree: &mut HudTree) {
        self.hover_events.clear();

        let mut left: Vec<NodeId> = self.previous_hovered.difference(&self.hovered).copied().collect();
        left.sort_unstable();
        for id in left {
            // Nodes that dropped out of the frame keep stale flags otherwise.
            if let Ok(base) = tree.base_mut(id) {
                base.set_state(NodeState::MOUSE_OVER | NodeState::CAPTURED, false);
            }
            self.hover_events.push(HoverEvent::Leave(id));
        }

        let mut entered: Vec<NodeId> = self.hovered.difference(&self.previous_hovered).copied().collect();
        entered.sort_unstable();
        self.hover_events.extend(entered.into_iter().map(HoverEvent::Enter));

        if !self.hover_events.is_empty() {
            tracing::trace!("hover changes: {:?}", self.hover_events);
        }
    }

    fn layout_pass(&mut self, tree: &mut HudTree) -> usize {
        profile_scope!("layout");

        let records = self.buffer.records();
        self.layout_order.clear();
        self.layout_order.extend(0..records.len());
        self.layout_order.sort_by_key(|&i| records[i].depth);

        {
            profile_scope!("measure");
            for &i in self.layout_order.iter().rev() {
                let UpdateRecord { node: id, passes, .. } = records[i];
                if !passes.contains(UpdatePasses::LAYOUT) {
                    continue;
                }
                if let Some((node, bases)) = tree.split_arena_mut(id) {
                    node.measure(&mut MeasureContext::new(id, bases));
                }
            }
        }

        let mut laid_out = 0;
        for &i in &self.layout_order {
            let UpdateRecord { node: id, passes, .. } = records[i];
            tree.resolve_position(id);
            if !passes.contains(UpdatePasses::LAYOUT) {
                continue;
            }
            if let Some((node, bases)) = tree.split_arena_mut(id) {
                node.layout(&mut LayoutContext::new(id, bases));
                laid_out += 1;
            }
        }
        laid_out
    }

    fn draw_pass(&mut self, tree: &mut HudTree) {
        profile_scope!("draw");

        self.draw_list.clear();
        for record in self.buffer.iter().filter(|r| r.takes_part(UpdatePasses::DRAW)) {
            let Some((node, base)) = tree.split_mut(record.node) else {
                continue;
            };
            node.draw(&mut DrawContext::new(
                record.node,
                base,
                record.z,
                record.depth,
                &mut self.draw_list,
            ));
        }
    }

    /// Sorted records of the last frame.
    pub fn records(&self) -> &[UpdateRecord] {
        self.buffer.records()
    }

    /// Records the buffer can hold before reallocating.
    pub fn record_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Topmost node under the cursor in the last frame.
    pub fn hovered(&self) -> Option<NodeId> {
        self.cursor.hovered
    }

    /// Node that captured the cursor in the last frame.
    pub fn captured(&self) -> Option<NodeId> {
        self.cursor.captured
    }

    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.hovered.contains(&id)
    }

    /// Enter and leave events from the last frame, leaves first.
    pub fn hover_events(&self) -> &[HoverEvent] {
        &self.hover_events
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }
}
