//! Recognized-root window.

use std::collections::VecDeque;

use sigil_core::base::Element;

/// Default number of recognized roots (current + previous 7).
pub const DEFAULT_ROOT_WINDOW: usize = 8;

/// A bounded window of recognized group-tree roots.
///
/// Explicit policy for the race between tree growth and proof
/// submission: the gate accepts proofs anchored to the current root or
/// any of the previous `capacity - 1` roots it was told about. Anything
/// older is `StaleRoot`.
#[derive(Debug, Clone)]
pub struct RootWindow {
    capacity: usize,
    roots: VecDeque<Element>,
}

impl RootWindow {
    /// Create an empty window recognizing up to `capacity` roots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            roots: VecDeque::new(),
        }
    }

    /// Recognize a root, evicting the oldest when the window is full.
    ///
    /// Re-tracking an already recognized root moves it to the front.
    pub fn track(&mut self, root: Element) {
        self.roots.retain(|known| *known != root);
        self.roots.push_front(root);
        self.roots.truncate(self.capacity);
    }

    /// `true` if the root is inside the window.
    #[must_use]
    pub fn recognizes(&self, root: Element) -> bool {
        self.roots.contains(&root)
    }

    /// The most recently tracked root.
    #[must_use]
    pub fn latest(&self) -> Option<Element> {
        self.roots.front().copied()
    }

    /// The recognized roots, newest first.
    #[must_use]
    pub fn roots(&self) -> impl Iterator<Item = Element> + '_ {
        self.roots.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use test_utils::fe;

    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut window = RootWindow::new(2);
        window.track(fe!(1));
        window.track(fe!(2));
        window.track(fe!(3));
        assert!(!window.recognizes(fe!(1)));
        assert!(window.recognizes(fe!(2)));
        assert!(window.recognizes(fe!(3)));
        assert_eq!(window.latest(), Some(fe!(3)));
    }

    #[test]
    fn retracking_does_not_duplicate() {
        let mut window = RootWindow::new(2);
        window.track(fe!(1));
        window.track(fe!(2));
        window.track(fe!(1));
        assert!(window.recognizes(fe!(2)));
        assert_eq!(window.latest(), Some(fe!(1)));
    }
}
