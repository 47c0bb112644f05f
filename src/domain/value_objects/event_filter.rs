//! Which change kinds count as "the share is dirty".

use std::collections::BTreeSet;

use super::change_event::{ChangeEvent, ChangeKind};

/// Set of actionable change kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    kinds: BTreeSet<ChangeKind>,
}

impl EventFilter {
    pub fn new(kinds: impl IntoIterator<Item = ChangeKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// A rescan is always actionable, whatever kinds are configured.
    pub fn is_actionable(&self, event: &ChangeEvent) -> bool {
        event.kind == ChangeKind::Rescan || self.kinds.contains(&event.kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ChangeKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::new(ChangeKind::DEFAULT_ACTIONABLE.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_ignores_plain_creation() {
        let filter = EventFilter::default();
        assert!(!filter.is_actionable(&ChangeEvent::single(ChangeKind::FileCreated, "/s/new")));
        assert!(!filter.is_actionable(&ChangeEvent::single(ChangeKind::DirCreated, "/s/dir")));
        assert!(!filter.is_actionable(&ChangeEvent::single(ChangeKind::Other, "/s/x")));
    }

    #[test]
    fn default_filter_accepts_delete_modify_move() {
        let filter = EventFilter::default();
        for kind in [
            ChangeKind::FileModified,
            ChangeKind::FileDeleted,
            ChangeKind::FileMoved,
            ChangeKind::DirDeleted,
            ChangeKind::DirMoved,
        ] {
            assert!(filter.is_actionable(&ChangeEvent::single(kind, "/s/f")), "{kind}");
        }
    }

    #[test]
    fn custom_filter_only_accepts_listed_kinds() {
        let filter = EventFilter::new([ChangeKind::FileCreated]);
        assert!(filter.is_actionable(&ChangeEvent::single(ChangeKind::FileCreated, "/s/a")));
        assert!(!filter.is_actionable(&ChangeEvent::single(ChangeKind::FileModified, "/s/a")));
    }

    #[test]
    fn rescan_is_actionable_even_when_not_listed() {
        let rescan = ChangeEvent::new(ChangeKind::Rescan, Vec::new());
        assert!(EventFilter::default().is_actionable(&rescan));
        assert!(EventFilter::new([ChangeKind::FileCreated]).is_actionable(&rescan));
    }

    #[test]
    fn duplicate_kinds_collapse() {
        let filter = EventFilter::new([ChangeKind::FileMoved, ChangeKind::FileMoved]);
        assert_eq!(filter.kinds().count(), 1);
        assert!(!filter.is_empty());
        assert!(EventFilter::new([]).is_empty());
    }
}
