//! Highlight and selection state for list-style chains.
//!
//! Dropdowns and selection wheels receive both keyboard steps and pointer
//! hover. [`ListHighlight`] keeps the two sources apart and resolves which
//! one drives the highlighted entry through a [`HighlightPolicy`].

/// Which input source wins when keyboard and pointer disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightPolicy {
    /// Whichever source changed last.
    #[default]
    MostRecent,
    /// Keyboard highlight wins while set; the pointer fills in otherwise.
    KeyboardFirst,
    /// Pointer hover wins while set; the keyboard fills in otherwise.
    PointerFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Keyboard,
    Pointer,
}

/// Highlighted and selected entry indices of a list.
#[derive(Debug, Clone, Default)]
pub struct ListHighlight {
    policy: HighlightPolicy,
    keyboard: Option<usize>,
    pointer: Option<usize>,
    last: Option<Source>,
    selected: Option<usize>,
}

impl ListHighlight {
    pub fn new(policy: HighlightPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> HighlightPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: HighlightPolicy) {
        self.policy = policy;
    }

    /// Entry currently highlighted under the active policy.
    pub fn highlighted(&self) -> Option<usize> {
        match self.policy {
            HighlightPolicy::KeyboardFirst => self.keyboard.or(self.pointer),
            HighlightPolicy::PointerFirst => self.pointer.or(self.keyboard),
            HighlightPolicy::MostRecent => match self.last {
                Some(Source::Pointer) => self.pointer.or(self.keyboard),
                _ => self.keyboard.or(self.pointer),
            },
        }
    }

    /// Step the keyboard highlight by `delta` entries, wrapping around a
    /// list of `len` entries.
    ///
    /// Stepping starts from the entry currently highlighted, whichever source
    /// put it there. With nothing highlighted, a forward step lands on the
    /// first entry and a backward step on the last.
    pub fn keyboard_move(&mut self, delta: isize, len: usize) -> Option<usize> {
        if len == 0 {
            self.keyboard = None;
            return None;
        }

        let next = match self.highlighted() {
            Some(current) => {
                let len = len as isize;
                (current.min(len as usize - 1) as isize + delta).rem_euclid(len) as usize
            }
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.keyboard = Some(next);
        self.last = Some(Source::Keyboard);
        Some(next)
    }

    /// Record the entry under the pointer, or `None` when the pointer left
    /// the list.
    pub fn pointer_hover(&mut self, index: Option<usize>) {
        if self.pointer == index {
            return;
        }
        self.pointer = index;
        if index.is_some() {
            self.last = Some(Source::Pointer);
        }
    }

    /// Commit the highlighted entry as the selection.
    pub fn select(&mut self) -> Option<usize> {
        if let Some(index) = self.highlighted() {
            self.selected = Some(index);
        }
        self.selected
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Drop indices that no longer exist after the list shrank to `len`.
    pub fn clamp_to(&mut self, len: usize) {
        let valid = |index: Option<usize>| index.filter(|&i| i < len);
        self.keyboard = valid(self.keyboard);
        self.pointer = valid(self.pointer);
        self.selected = valid(self.selected);
    }

    /// Forget highlight state. The selection is kept.
    pub fn reset(&mut self) {
        self.keyboard = None;
        self.pointer = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_wraps() {
        let mut list = ListHighlight::default();
        assert_eq!(list.keyboard_move(1, 3), Some(0));
        assert_eq!(list.keyboard_move(1, 3), Some(1));
        assert_eq!(list.keyboard_move(2, 3), Some(0));
        assert_eq!(list.keyboard_move(-1, 3), Some(2));

        let mut fresh = ListHighlight::default();
        assert_eq!(fresh.keyboard_move(-1, 4), Some(3));
        assert_eq!(fresh.keyboard_move(1, 0), None);
        assert_eq!(fresh.highlighted(), None);
    }

    #[test]
    fn test_most_recent_source_wins() {
        let mut list = ListHighlight::new(HighlightPolicy::MostRecent);
        list.keyboard_move(1, 5);
        list.pointer_hover(Some(3));
        assert_eq!(list.highlighted(), Some(3));

        // Keyboard continues from the hovered entry.
        assert_eq!(list.keyboard_move(1, 5), Some(4));
        assert_eq!(list.highlighted(), Some(4));

        // Re-reporting the same hover is not a new event.
        list.pointer_hover(Some(3));
        assert_eq!(list.highlighted(), Some(4));
    }

    #[test]
    fn test_fixed_precedence_policies() {
        let mut keyboard = ListHighlight::new(HighlightPolicy::KeyboardFirst);
        keyboard.pointer_hover(Some(2));
        assert_eq!(keyboard.highlighted(), Some(2));
        keyboard.keyboard_move(-1, 5);
        keyboard.pointer_hover(Some(4));
        assert_eq!(keyboard.highlighted(), Some(1));

        let mut pointer = ListHighlight::new(HighlightPolicy::PointerFirst);
        pointer.keyboard_move(1, 5);
        pointer.pointer_hover(Some(3));
        pointer.keyboard_move(1, 5);
        assert_eq!(pointer.highlighted(), Some(3));
        pointer.pointer_hover(None);
        assert_eq!(pointer.highlighted(), Some(4));
    }

    #[test]
    fn test_select_and_clamp() {
        let mut list = ListHighlight::default();
        assert_eq!(list.select(), None);

        list.pointer_hover(Some(6));
        assert_eq!(list.select(), Some(6));

        list.clamp_to(4);
        assert_eq!(list.selected(), None);
        assert_eq!(list.highlighted(), None);

        list.set_selected(Some(1));
        list.reset();
        assert_eq!(list.selected(), Some(1));
    }
}
