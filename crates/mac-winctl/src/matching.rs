//! Pure window-matching strategy for the CG → AX identity bridge.
//!
//! The listing service hands us a pid and a title; the control service hands
//! us an ordered list of window elements for that pid. Matching is exact
//! title equality, which also covers the "both empty" case since two empty
//! strings compare equal. When no title matches (the title changed between
//! discovery and resize, or is generated dynamically), we deliberately fall
//! back to the first controllable window: most apps have one main window, so
//! doing something reasonable beats failing outright, at the cost of
//! occasionally resizing the wrong window in a multi-window app.

/// A controllable window candidate: its position in the AX window list plus
/// the title read from it (empty when the title read failed or was absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the AX window list.
    pub index: usize,
    /// Title as read from the `AXTitle` attribute.
    pub title: String,
}

/// Select the window to resize: first exact title match, else the first
/// candidate, else `None` when the process has no windows at all.
#[must_use]
pub fn select_target(candidates: &[Candidate], wanted_title: &str) -> Option<usize> {
    if let Some(hit) = candidates.iter().find(|c| c.title == wanted_title) {
        return Some(hit.index);
    }
    candidates.first().map(|c| c.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(titles: &[&str]) -> Vec<Candidate> {
        titles
            .iter()
            .enumerate()
            .map(|(index, t)| Candidate {
                index,
                title: (*t).to_string(),
            })
            .collect()
    }

    #[test]
    fn exact_title_wins_over_order() {
        let c = cands(&["A", "B"]);
        assert_eq!(select_target(&c, "B"), Some(1));
        assert_eq!(select_target(&c, "A"), Some(0));
    }

    #[test]
    fn both_empty_is_a_match() {
        let c = cands(&["", "B"]);
        assert_eq!(select_target(&c, ""), Some(0));
    }

    #[test]
    fn renamed_window_falls_back_to_first() {
        // Descriptor says "Untitled" but the only AX window reports an empty
        // title: the fallback still resizes it.
        let c = cands(&[""]);
        assert_eq!(select_target(&c, "Untitled"), Some(0));
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        assert_eq!(select_target(&[], "anything"), None);
    }

    #[test]
    fn fallback_prefers_first_listed_window() {
        let c = cands(&["Main", "Inspector"]);
        assert_eq!(select_target(&c, "Gone"), Some(0));
    }
}
