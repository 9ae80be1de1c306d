//! Sizing configuration for chains.
//!
//! [`SizingMode`] is the normalised form used by the layout code. The packed
//! [`ChainSizingFlags`] form is accepted for convenience and converted once,
//! at configuration time.

use bitflags::bitflags;

/// How one axis of a chain or of its members resolves its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sizing {
    /// Size is left as-is.
    #[default]
    None,
    /// Size is kept within bounds but otherwise left as-is.
    Clamp,
    /// Size is forced to fit the content.
    Fit,
}

impl Sizing {
    /// Fit and Clamp both let the layout change the size.
    pub fn is_variable(self) -> bool {
        !matches!(self, Sizing::None)
    }

    fn from_bits(fit: bool, clamp: bool) -> Self {
        if fit {
            Sizing::Fit
        } else if clamp {
            Sizing::Clamp
        } else {
            Sizing::None
        }
    }
}

/// Where members are stacked along the align axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberAlignment {
    #[default]
    Start,
    End,
    Center,
}

/// Sizing policy of a chain and its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizingMode {
    pub chain_align: Sizing,
    pub chain_off: Sizing,
    pub member_align: Sizing,
    pub member_off: Sizing,
    pub alignment: MemberAlignment,
}

impl SizingMode {
    pub const fn new() -> Self {
        Self {
            chain_align: Sizing::None,
            chain_off: Sizing::None,
            member_align: Sizing::None,
            member_off: Sizing::None,
            alignment: MemberAlignment::Start,
        }
    }

    /// Chain fits its content on both axes.
    pub const fn fit_chain() -> Self {
        Self::new()
            .with_chain_align(Sizing::Fit)
            .with_chain_off(Sizing::Fit)
    }

    pub const fn with_chain_align(mut self, sizing: Sizing) -> Self {
        self.chain_align = sizing;
        self
    }

    pub const fn with_chain_off(mut self, sizing: Sizing) -> Self {
        self.chain_off = sizing;
        self
    }

    pub const fn with_member_align(mut self, sizing: Sizing) -> Self {
        self.member_align = sizing;
        self
    }

    pub const fn with_member_off(mut self, sizing: Sizing) -> Self {
        self.member_off = sizing;
        self
    }

    pub const fn with_alignment(mut self, alignment: MemberAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns true if the chain resizes itself on either axis.
    pub fn sizes_chain(&self) -> bool {
        self.chain_align.is_variable() || self.chain_off.is_variable()
    }

    /// Returns true if members are bounded on either axis.
    pub fn sizes_members(&self) -> bool {
        self.member_align.is_variable() || self.member_off.is_variable()
    }
}

bitflags! {
    /// Packed sizing configuration.
    ///
    /// Combinations are not meaningful on their own; convert to [`SizingMode`]
    /// to resolve them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChainSizingFlags: u16 {
        const CLAMP_CHAIN_OFF_AXIS     = 1 << 0;
        const CLAMP_CHAIN_ALIGN_AXIS   = 1 << 1;
        const FIT_CHAIN_OFF_AXIS       = 1 << 2;
        const FIT_CHAIN_ALIGN_AXIS     = 1 << 3;
        const CLAMP_MEMBERS_OFF_AXIS   = 1 << 4;
        const CLAMP_MEMBERS_ALIGN_AXIS = 1 << 5;
        const FIT_MEMBERS_OFF_AXIS     = 1 << 6;
        const FIT_MEMBERS_ALIGN_AXIS   = 1 << 7;
        const ALIGN_MEMBERS_START      = 1 << 8;
        const ALIGN_MEMBERS_END        = 1 << 9;
        const ALIGN_MEMBERS_CENTER     = 1 << 10;

        const CLAMP_CHAIN_BOTH_AXES   = Self::CLAMP_CHAIN_OFF_AXIS.bits() | Self::CLAMP_CHAIN_ALIGN_AXIS.bits();
        const FIT_CHAIN_BOTH_AXES     = Self::FIT_CHAIN_OFF_AXIS.bits() | Self::FIT_CHAIN_ALIGN_AXIS.bits();
        const CLAMP_MEMBERS_BOTH_AXES = Self::CLAMP_MEMBERS_OFF_AXIS.bits() | Self::CLAMP_MEMBERS_ALIGN_AXIS.bits();
        const FIT_MEMBERS_BOTH_AXES   = Self::FIT_MEMBERS_OFF_AXIS.bits() | Self::FIT_MEMBERS_ALIGN_AXIS.bits();
    }
}

impl From<ChainSizingFlags> for SizingMode {
    /// Fit wins over Clamp in each bucket. Alignment bits resolve
    /// Center, then End, then Start.
    fn from(flags: ChainSizingFlags) -> Self {
        use ChainSizingFlags as F;

        let alignment = if flags.contains(F::ALIGN_MEMBERS_CENTER) {
            MemberAlignment::Center
        } else if flags.contains(F::ALIGN_MEMBERS_END) {
            MemberAlignment::End
        } else {
            MemberAlignment::Start
        };

        SizingMode {
            chain_align: Sizing::from_bits(
                flags.contains(F::FIT_CHAIN_ALIGN_AXIS),
                flags.contains(F::CLAMP_CHAIN_ALIGN_AXIS),
            ),
            chain_off: Sizing::from_bits(
                flags.contains(F::FIT_CHAIN_OFF_AXIS),
                flags.contains(F::CLAMP_CHAIN_OFF_AXIS),
            ),
            member_align: Sizing::from_bits(
                flags.contains(F::FIT_MEMBERS_ALIGN_AXIS),
                flags.contains(F::CLAMP_MEMBERS_ALIGN_AXIS),
            ),
            member_off: Sizing::from_bits(
                flags.contains(F::FIT_MEMBERS_OFF_AXIS),
                flags.contains(F::CLAMP_MEMBERS_OFF_AXIS),
            ),
            alignment,
        }
    }
}

impl From<SizingMode> for ChainSizingFlags {
    fn from(mode: SizingMode) -> Self {
        use ChainSizingFlags as F;

        fn bucket(sizing: Sizing, fit: ChainSizingFlags, clamp: ChainSizingFlags) -> ChainSizingFlags {
            match sizing {
                Sizing::None => ChainSizingFlags::empty(),
                Sizing::Clamp => clamp,
                Sizing::Fit => fit,
            }
        }

        let alignment = match mode.alignment {
            MemberAlignment::Start => F::ALIGN_MEMBERS_START,
            MemberAlignment::End => F::ALIGN_MEMBERS_END,
            MemberAlignment::Center => F::ALIGN_MEMBERS_CENTER,
        };

        bucket(mode.chain_align, F::FIT_CHAIN_ALIGN_AXIS, F::CLAMP_CHAIN_ALIGN_AXIS)
            | bucket(mode.chain_off, F::FIT_CHAIN_OFF_AXIS, F::CLAMP_CHAIN_OFF_AXIS)
            | bucket(mode.member_align, F::FIT_MEMBERS_ALIGN_AXIS, F::CLAMP_MEMBERS_ALIGN_AXIS)
            | bucket(mode.member_off, F::FIT_MEMBERS_OFF_AXIS, F::CLAMP_MEMBERS_OFF_AXIS)
            | alignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_supersedes_clamp() {
        let mode = SizingMode::from(
            ChainSizingFlags::FIT_CHAIN_BOTH_AXES | ChainSizingFlags::CLAMP_CHAIN_BOTH_AXES,
        );
        assert_eq!(mode.chain_align, Sizing::Fit);
        assert_eq!(mode.chain_off, Sizing::Fit);
        assert_eq!(mode.member_align, Sizing::None);
    }

    #[test]
    fn test_alignment_precedence() {
        let all = ChainSizingFlags::ALIGN_MEMBERS_START
            | ChainSizingFlags::ALIGN_MEMBERS_END
            | ChainSizingFlags::ALIGN_MEMBERS_CENTER;
        assert_eq!(SizingMode::from(all).alignment, MemberAlignment::Center);

        let start_end = ChainSizingFlags::ALIGN_MEMBERS_START | ChainSizingFlags::ALIGN_MEMBERS_END;
        assert_eq!(SizingMode::from(start_end).alignment, MemberAlignment::End);

        assert_eq!(
            SizingMode::from(ChainSizingFlags::empty()).alignment,
            MemberAlignment::Start
        );
    }

    #[test]
    fn test_normalised_flags_are_stable() {
        let messy = ChainSizingFlags::FIT_MEMBERS_ALIGN_AXIS
            | ChainSizingFlags::CLAMP_MEMBERS_ALIGN_AXIS
            | ChainSizingFlags::CLAMP_CHAIN_OFF_AXIS
            | ChainSizingFlags::ALIGN_MEMBERS_END
            | ChainSizingFlags::ALIGN_MEMBERS_START;
        let mode = SizingMode::from(messy);
        let flags = ChainSizingFlags::from(mode);

        assert_eq!(
            flags,
            ChainSizingFlags::FIT_MEMBERS_ALIGN_AXIS
                | ChainSizingFlags::CLAMP_CHAIN_OFF_AXIS
                | ChainSizingFlags::ALIGN_MEMBERS_END
        );
        assert_eq!(SizingMode::from(flags), mode);
    }

    #[test]
    fn test_variable_queries() {
        let mode = SizingMode::new().with_member_off(Sizing::Clamp);
        assert!(!mode.sizes_chain());
        assert!(mode.sizes_members());
        assert!(SizingMode::fit_chain().sizes_chain());
    }
}
