//! Chain measurement and placement, expressed over plain slot data.
//!
//! Everything here works in chain space: `align` is the stacking axis and
//! `off` the cross axis. The [`Chain`](super::Chain) node converts to and from
//! screen axes at the boundary.

use super::sizing::{MemberAlignment, Sizing, SizingMode};
use crate::node::ParentAlignments;
use crate::tree::NodeId;
use hudkit_core::math::{Vec2, axis, from_axes, safe_recip};

/// A size or offset split into align-axis and off-axis components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub align: f32,
    pub off: f32,
}

impl Span {
    pub const ZERO: Span = Span { align: 0.0, off: 0.0 };

    pub const fn new(align: f32, off: f32) -> Self {
        Self { align, off }
    }

    pub fn from_vec(v: Vec2, vertical: bool) -> Self {
        Span::new(axis(v, vertical), axis(v, !vertical))
    }

    pub fn to_vec(self, vertical: bool) -> Vec2 {
        from_axes(self.align, self.off, vertical)
    }
}

/// Member size bounds. A zero component has no explicit bound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemberBounds {
    pub min: Span,
    pub max: Span,
}

impl MemberBounds {
    fn max_align(&self) -> Option<f32> {
        (self.max.align > 0.0).then_some(self.max.align)
    }

    fn max_off(&self) -> Option<f32> {
        (self.max.off > 0.0).then_some(self.max.off)
    }
}

/// Working copy of one container's layout state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberSlot {
    pub node: NodeId,
    pub size: Span,
    pub scale: f32,
    pub visible: bool,
    /// Align-axis offset from the chain centre, written by [`position_members`].
    pub offset: f32,
}

impl MemberSlot {
    pub fn new(node: NodeId, size: Span, scale: f32, visible: bool) -> Self {
        Self {
            node,
            size,
            scale,
            visible,
            offset: 0.0,
        }
    }
}

/// `value.clamp(min, max)` that tolerates `min > max` by letting `max` win.
#[inline]
fn bound(value: f32, min: f32, max: Option<f32>) -> f32 {
    let value = value.max(min);
    match max {
        Some(max) => value.min(max),
        None => value,
    }
}

#[inline]
fn gaps(spacing: f32, visible: usize) -> f32 {
    spacing * visible.saturating_sub(1) as f32
}

/// Total space the visible members occupy: align-axis sizes summed with
/// spacing, off-axis sizes maxed.
///
/// When member sizing is variable the members' bounded sizes are used, with
/// `chain_off` standing in for a missing off-axis maximum.
pub fn measure_range(
    slots: &[MemberSlot],
    mode: &SizingMode,
    bounds: &MemberBounds,
    spacing: f32,
    chain_off: f32,
) -> Span {
    let implicit_off = bounds
        .max_off()
        .or((chain_off > 0.0).then_some(chain_off));

    let mut range = Span::ZERO;
    let mut visible = 0usize;
    for slot in slots.iter().filter(|s| s.visible) {
        let mut size = slot.size;
        if mode.member_align.is_variable() {
            size.align = bound(size.align, bounds.min.align, bounds.max_align());
        }
        if mode.member_off.is_variable() {
            size.off = bound(size.off, bounds.min.off, implicit_off);
        }

        range.align += size.align;
        range.off = range.off.max(size.off);
        visible += 1;
    }

    range.align += gaps(spacing, visible);
    range
}

/// New size for one chain axis given the measured content (padding included).
pub fn apply_chain_sizing(sizing: Sizing, current: f32, content: f32) -> f32 {
    match sizing {
        Sizing::None => current,
        Sizing::Clamp => current.max(content),
        Sizing::Fit => content,
    }
}

/// Resolve member sizes against the chain's content area. Returns the
/// realised range along the align axis.
pub fn resolve_member_sizes(
    slots: &mut [MemberSlot],
    mode: &SizingMode,
    bounds: &MemberBounds,
    spacing: f32,
    content: Span,
) -> f32 {
    let mut visible = 0usize;
    let mut total_scale = 0.0f32;
    let mut constant_span = 0.0f32;
    for slot in slots.iter().filter(|s| s.visible) {
        visible += 1;
        if slot.scale > 0.0 {
            total_scale += slot.scale;
        } else {
            constant_span += slot.size.align;
        }
    }
    if visible == 0 {
        return 0.0;
    }

    let gaps = gaps(spacing, visible);
    let share = (content.align - gaps).max(0.0) / visible as f32;
    // Capping the divisor at one keeps the shares within the leftover.
    let leftover = (content.align - constant_span - gaps).max(0.0);
    let per_weight = leftover / total_scale.max(1.0);
    let off_max = bounds.max_off().unwrap_or(content.off);

    let mut range = 0.0;
    for slot in slots.iter_mut().filter(|s| s.visible) {
        slot.size.align = match mode.member_align {
            Sizing::None if slot.scale > 0.0 => slot.scale * per_weight,
            Sizing::None => slot.size.align,
            Sizing::Fit => share.max(bounds.max.align),
            Sizing::Clamp => bound(slot.size.align, bounds.min.align, bounds.max_align()),
        };
        slot.size.off = match mode.member_off {
            Sizing::None => slot.size.off,
            Sizing::Fit => content.off.max(bounds.max.off),
            Sizing::Clamp => bound(slot.size.off, bounds.min.off, Some(off_max)),
        };
        range += slot.size.align;
    }

    range + gaps
}

/// Place visible members along the align axis.
///
/// Each offset is interpolated from the span's anchors instead of summed, so
/// members tile edge to edge without accumulated error.
pub fn position_members(
    slots: &mut [MemberSlot],
    alignment: MemberAlignment,
    spacing: f32,
    content_align: f32,
    range: f32,
) {
    let (start, end) = match alignment {
        MemberAlignment::Start => {
            let start = -content_align * 0.5;
            (start, start + range)
        }
        MemberAlignment::End => {
            let end = content_align * 0.5;
            (end - range, end)
        }
        MemberAlignment::Center => (-range * 0.5, range * 0.5),
    };
    let rcp = safe_recip(range);

    let mut j = 0.0f32;
    for slot in slots.iter_mut().filter(|s| s.visible) {
        let t = j + 0.5 * slot.size.align * rcp;
        slot.offset = start + (end - start) * t;
        j += (slot.size.align + spacing) * rcp;
    }
}

/// Restrict a member's parent alignment to what a chain can honour: edge
/// flags on the off axis only, placed inside the chain's padded bounds.
pub fn mask_member_alignment(alignment: ParentAlignments, vertical: bool) -> ParentAlignments {
    let (edges, cleared, inner) = if vertical {
        (
            ParentAlignments::HORIZONTAL_EDGES,
            ParentAlignments::VERTICAL_EDGES | ParentAlignments::INNER_V,
            ParentAlignments::INNER_H,
        )
    } else {
        (
            ParentAlignments::VERTICAL_EDGES,
            ParentAlignments::HORIZONTAL_EDGES | ParentAlignments::INNER_H,
            ParentAlignments::INNER_V,
        )
    };

    let mut masked = alignment.difference(cleared);
    if masked.contains(edges) {
        masked.remove(edges);
    }
    masked | inner | ParentAlignments::USE_PADDING
}

/// Off-axis offset pushing edge-aligned members inward by `nudge`.
pub fn off_axis_offset(alignment: ParentAlignments, vertical: bool, nudge: f32) -> f32 {
    let (leading, trailing) = if vertical {
        (ParentAlignments::LEFT, ParentAlignments::RIGHT)
    } else {
        (ParentAlignments::TOP, ParentAlignments::BOTTOM)
    };

    match (alignment.contains(leading), alignment.contains(trailing)) {
        (true, false) => nudge,
        (false, true) => -nudge,
        _ => 0.0,
    }
}
