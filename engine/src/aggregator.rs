//! Distinct-actor activity counting per subject.
//!
//! A subject's count is the number of distinct actors that produced a
//! qualifying event for it. Crediting the same actor twice is a no-op, so the
//! count can never be inflated by one noisy wallet.

use std::collections::{BTreeSet, HashMap};

use corelib::models::{Event, EventKind};

/// Activity recorded for one subject.
///
/// Invariant: `count == seen_actors.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectActivity {
    count: usize,
    seen_actors: BTreeSet<String>,
}

impl SubjectActivity {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn seen_actors(&self) -> &BTreeSet<String> {
        &self.seen_actors
    }

    pub fn has_seen(&self, actor: &str) -> bool {
        self.seen_actors.contains(actor)
    }

    /// Returns true when `actor` was not counted before.
    fn credit(&mut self, actor: &str) -> bool {
        if self.seen_actors.contains(actor) {
            return false;
        }
        self.seen_actors.insert(actor.to_owned());
        self.count += 1;
        true
    }
}

/// Subject -> activity map. Entries are created lazily and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationState {
    subjects: HashMap<String, SubjectActivity>,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds state from a sequence of events, keeping only qualifying kinds.
    pub fn from_events<'a, I>(events: I, qualifying: &BTreeSet<EventKind>) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut state = Self::new();
        for event in events {
            if qualifying.contains(&event.kind) {
                state.record(&event.subject, &event.actor);
            }
        }
        state
    }

    /// Credits `actor` for `subject`. Returns true when the count moved.
    pub fn record(&mut self, subject: &str, actor: &str) -> bool {
        // Avoid allocating the key for subjects we already track.
        match self.subjects.get_mut(subject) {
            Some(activity) => activity.credit(actor),
            None => self
                .subjects
                .entry(subject.to_owned())
                .or_default()
                .credit(actor),
        }
    }

    pub fn get(&self, subject: &str) -> Option<&SubjectActivity> {
        self.subjects.get(subject)
    }

    /// Distinct actors seen for `subject`; 0 when the subject is unknown.
    pub fn count(&self, subject: &str) -> usize {
        self.subjects.get(subject).map_or(0, SubjectActivity::count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubjectActivity)> {
        self.subjects.iter().map(|(s, a)| (s.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// Consumes events and credits the qualifying ones.
#[derive(Debug, Clone)]
pub struct ActivityAggregator {
    state: AggregationState,
    qualifying: BTreeSet<EventKind>,
}

impl ActivityAggregator {
    pub fn new(qualifying: BTreeSet<EventKind>) -> Self {
        Self {
            state: AggregationState::new(),
            qualifying,
        }
    }

    pub fn is_qualifying(&self, kind: EventKind) -> bool {
        self.qualifying.contains(&kind)
    }

    /// Applies `event` when its kind qualifies. Returns true when a new actor
    /// was credited; false for non-qualifying kinds and repeat actors.
    pub fn record_if_qualifying(&mut self, event: &Event) -> bool {
        if !self.is_qualifying(event.kind) {
            return false;
        }
        self.state.record(&event.subject, &event.actor)
    }

    pub fn state(&self) -> &AggregationState {
        &self.state
    }

    pub fn qualifying_kinds(&self) -> &BTreeSet<EventKind> {
        &self.qualifying
    }
}

impl Default for ActivityAggregator {
    fn default() -> Self {
        Self::new(BTreeSet::from([EventKind::Buy]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::Payload;

    fn trade(id: u64, actor: &str, subject: &str, kind: EventKind) -> Event {
        Event::new(
            id,
            subject,
            actor,
            kind,
            Payload::Transaction {
                wallet_address: format!("{actor}-addr"),
                emoji: "🐋".into(),
                amount: 1,
                value_usd: 1.0,
            },
            id,
        )
    }

    #[test]
    fn counts_distinct_actors_only() {
        let mut agg = ActivityAggregator::default();

        assert!(agg.record_if_qualifying(&trade(1, "A", "SOL", EventKind::Buy)));
        assert!(agg.record_if_qualifying(&trade(2, "B", "SOL", EventKind::Buy)));
        assert!(!agg.record_if_qualifying(&trade(3, "A", "SOL", EventKind::Buy)));

        let sol = agg.state().get("SOL").unwrap();
        assert_eq!(sol.count(), 2);
        assert_eq!(
            sol.seen_actors().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
    }

    #[test]
    fn sells_are_ignored() {
        let mut agg = ActivityAggregator::default();

        assert!(!agg.record_if_qualifying(&trade(1, "C", "SOL", EventKind::Sell)));

        assert!(agg.state().is_empty());
        assert_eq!(agg.state().count("SOL"), 0);
    }

    #[test]
    fn same_actor_counts_once_per_subject_but_again_elsewhere() {
        let mut agg = ActivityAggregator::default();

        agg.record_if_qualifying(&trade(1, "A", "SOL", EventKind::Buy));
        agg.record_if_qualifying(&trade(2, "A", "BONK", EventKind::Buy));

        assert_eq!(agg.state().count("SOL"), 1);
        assert_eq!(agg.state().count("BONK"), 1);
        assert_eq!(agg.state().len(), 2);
    }

    #[test]
    fn custom_qualifying_set() {
        let mut agg = ActivityAggregator::new(BTreeSet::from([EventKind::Buy, EventKind::Sell]));

        agg.record_if_qualifying(&trade(1, "A", "WIF", EventKind::Sell));
        agg.record_if_qualifying(&trade(2, "B", "WIF", EventKind::Buy));

        assert_eq!(agg.state().count("WIF"), 2);
        assert!(agg.is_qualifying(EventKind::Sell));
        assert!(!agg.is_qualifying(EventKind::Post));
    }

    #[test]
    fn rebuild_from_events_matches_incremental() {
        let events = vec![
            trade(1, "A", "SOL", EventKind::Buy),
            trade(2, "B", "SOL", EventKind::Buy),
            trade(3, "C", "SOL", EventKind::Sell),
            trade(4, "D", "BONK", EventKind::Buy),
            trade(5, "A", "SOL", EventKind::Buy),
        ];

        let mut agg = ActivityAggregator::default();
        for e in &events {
            agg.record_if_qualifying(e);
        }

        let rebuilt = AggregationState::from_events(&events, agg.qualifying_kinds());
        assert_eq!(&rebuilt, agg.state());
    }
}
