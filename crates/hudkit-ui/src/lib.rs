//! hudkit UI - retained-mode HUD layout and frame scheduling
//!
//! This crate provides the core of a HUD toolkit for panels anchored in a 3D
//! scene:
//! - An arena tree of nodes with explicit child ownership
//! - Collections and chains that stack children along one axis
//! - A frame driver that flattens the tree into records ordered by
//!   (z, depth) and runs the depth-test, input, layout and draw passes
//!
//! Rendering is left to the host: each frame produces a [`DrawList`].
//!
//! ## Quick Start
//!
//! ```rust
//! use hudkit_ui::{Chain, ChainConfig, HudCore, Sizing, SizingMode, Vec2};
//! use hudkit_ui::widgets::Block;
//!
//! let mut hud = HudCore::default();
//! let tree = hud.tree_mut();
//!
//! let list = tree.add_node(Chain::new(
//!     ChainConfig::vertical()
//!         .with_sizing(SizingMode::fit_chain())
//!         .with_spacing(4.0),
//! ));
//! for _ in 0..3 {
//!     let row = tree.add_node(Block::with_size(Vec2::new(120.0, 20.0)));
//!     tree.collection_mut(list).unwrap().add(row).unwrap();
//! }
//! tree.set_root(list);
//!
//! let metrics = hud.update(None);
//! assert_eq!(metrics.records, 4);
//! assert_eq!(hud.tree().base(list).unwrap().size(), Vec2::new(120.0, 68.0));
//! assert_eq!(hud.draw_list().len(), 3);
//! ```

pub mod chain;
pub mod collection;
pub mod context;
pub mod draw_list;
pub mod driver;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod node;
pub mod selection;
pub mod tree;
pub mod widgets;

pub use chain::{Chain, ChainConfig, ChainSizingFlags, MemberAlignment, Sizing, SizingMode};
pub use collection::{Collection, CollectionMut, Container, HudCollection};
pub use context::{CursorState, DrawContext, InputContext, LayoutContext, LayoutHandle, MeasureContext};
pub use draw_list::{DrawCommand, DrawList, QuadCommand};
pub use driver::{FrameDriver, HoverEvent};
pub use error::{HudError, HudResult};
pub use frame::{FrameBuffer, UpdatePasses, UpdateRecord, get_update_accessors};
pub use metrics::FrameMetrics;
pub use node::{Node, NodeState, ParentAlignments};
pub use selection::{HighlightPolicy, ListHighlight};
pub use tree::{HudTree, NodeBase, NodeId};

// Re-export common types from dependencies
pub use hudkit_core::config::{HudConfig, ProfilingMode};
pub use hudkit_core::math::Vec2;

use hudkit_core::profiling::{self, ProfilingBackend};

/// Render-agnostic HUD core owning the tree and the frame driver.
pub struct HudCore {
    tree: HudTree,
    driver: FrameDriver,
    config: HudConfig,
}

impl HudCore {
    /// Create a HUD core. Profiling starts here if the config asks for it.
    pub fn new(config: HudConfig) -> Self {
        match config.profiling {
            ProfilingMode::Off => {}
            ProfilingMode::On => profiling::init_profiling(ProfilingBackend::InProcess),
            #[cfg(feature = "profiling")]
            ProfilingMode::WithServer => profiling::init_profiling(ProfilingBackend::PuffinHttp),
            #[cfg(not(feature = "profiling"))]
            ProfilingMode::WithServer => {
                tracing::warn!("profiling server requested but the 'profiling' feature is off");
                profiling::init_profiling(ProfilingBackend::InProcess);
            }
        }

        Self {
            tree: HudTree::new(),
            driver: FrameDriver::with_capacity(config.frame_capacity),
            config,
        }
    }

    /// Install the log subscriber with the configured filter.
    pub fn init_logging(&self) {
        hudkit_core::logging::init_with_filter(&self.config.log_filter);
    }

    /// Run one frame from the tree's root.
    ///
    /// Returns empty metrics when no root is set.
    pub fn update(&mut self, cursor: Option<Vec2>) -> FrameMetrics {
        if self.config.profiling != ProfilingMode::Off {
            profiling::new_frame();
        }

        let Some(root) = self.tree.root() else {
            tracing::debug!("update skipped: no root node");
            return FrameMetrics::default();
        };
        self.driver.run_frame(&mut self.tree, root, cursor)
    }

    pub fn tree(&self) -> &HudTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut HudTree {
        &mut self.tree
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn draw_list(&self) -> &DrawList {
        self.driver.draw_list()
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }
}

impl Default for HudCore {
    fn default() -> Self {
        Self::new(HudConfig::default())
    }
}
