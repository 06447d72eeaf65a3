//! Ready-set view passed to selection strategies.

use crate::models::ProcessState;

/// Read-only snapshot of the simulation at a decision point.
///
/// Strategies see every process (including those not yet arrived or already
/// finished) and the current clock; [`ReadyView::ready`] filters the set
/// they may pick from.
#[derive(Debug, Clone, Copy)]
pub struct ReadyView<'a> {
    /// Current virtual clock.
    pub now: i64,
    /// Working state of every process, in input order.
    pub processes: &'a [ProcessState],
}

impl<'a> ReadyView<'a> {
    /// Creates a view at `now`.
    pub fn new(now: i64, processes: &'a [ProcessState]) -> Self {
        Self { now, processes }
    }

    /// Processes that have arrived and still need CPU.
    pub fn ready(&self) -> impl Iterator<Item = &'a ProcessState> + 'a {
        self.processes.iter().filter(|p| p.is_ready())
    }

    /// Whether `index` is in the ready set.
    pub fn is_ready(&self, index: usize) -> bool {
        self.processes.get(index).map(|p| p.is_ready()).unwrap_or(false)
    }

    /// Whether the ready set is empty.
    pub fn is_empty(&self) -> bool {
        self.ready().next().is_none()
    }

    /// Picks the ready process with the smallest `key`.
    ///
    /// Ties fall back to earliest arrival, then input order.
    pub fn min_by_key<K: Ord>(&self, key: impl Fn(&ProcessState) -> K) -> Option<usize> {
        self.ready()
            .min_by_key(|p| (key(p), p.arrival(), p.index))
            .map(|p| p.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;

    fn states() -> Vec<ProcessState> {
        let input = [
            Process::new("A", 0, 5),
            Process::new("B", 0, 3),
            Process::new("C", 4, 1),
        ];
        let mut s: Vec<ProcessState> = input
            .iter()
            .enumerate()
            .map(|(i, p)| ProcessState::new(i, p))
            .collect();
        s[0].admitted = true;
        s[1].admitted = true;
        s
    }

    #[test]
    fn test_ready_filters_unadmitted() {
        let s = states();
        let view = ReadyView::new(0, &s);
        let ids: Vec<&str> = view.ready().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(view.is_ready(1));
        assert!(!view.is_ready(2));
        assert!(!view.is_ready(99));
    }

    #[test]
    fn test_min_by_key_with_tie_break() {
        let s = states();
        let view = ReadyView::new(0, &s);
        assert_eq!(view.min_by_key(|p| p.service()), Some(1));
        // Constant key → arrival tie → input order
        assert_eq!(view.min_by_key(|_| 0), Some(0));
    }

    #[test]
    fn test_empty_view() {
        let s: Vec<ProcessState> = Vec::new();
        let view = ReadyView::new(0, &s);
        assert!(view.is_empty());
        assert_eq!(view.min_by_key(|p| p.remaining), None);
    }
}
