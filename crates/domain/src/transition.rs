use std::{collections::BTreeMap, sync::Arc};

use log::debug;

use crate::{ContextKey, ExerciseID};

type Weights = BTreeMap<ExerciseID, f64>;
type Sources = BTreeMap<ExerciseID, Arc<Weights>>;

/// Weighted graph of observed exercise transitions, scoped per temporal bucket.
///
/// The map is a persistent value. Updates return a new map which shares all untouched
/// branches with the previous one, so the previous map stays valid and unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionMap(BTreeMap<ContextKey, Arc<Sources>>);

impl TransitionMap {
    pub const BASE_WEIGHT: f64 = 1.0;
    pub const INCREMENT: f64 = 1.0;
    pub const REINFORCEMENT_FACTOR: f64 = 1.5;
    pub const PENALTY_FACTOR: f64 = 0.9;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outgoing transitions of `from` in ascending order of the target exercise.
    #[must_use]
    pub fn transitions(&self, key: ContextKey, from: ExerciseID) -> Option<&Weights> {
        self.0.get(&key)?.get(&from).map(|weights| weights.as_ref())
    }

    #[must_use]
    pub fn weight(&self, key: ContextKey, from: ExerciseID, to: ExerciseID) -> Option<f64> {
        self.transitions(key, from)?.get(&to).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContextKey, ExerciseID, ExerciseID, f64)> + '_ {
        self.0.iter().flat_map(|(key, sources)| {
            sources.iter().flat_map(move |(from, weights)| {
                weights.iter().map(move |(to, weight)| (*key, *from, *to, *weight))
            })
        })
    }

    /// Update the weights after `actual` was performed following `from` in the current
    /// temporal bucket.
    #[must_use]
    pub fn process_feedback(
        &self,
        from: ExerciseID,
        actual: ExerciseID,
        suggested: Option<ExerciseID>,
    ) -> Self {
        self.process_feedback_in(ContextKey::now(), from, actual, suggested)
    }

    /// Update the weights after `actual` was performed following `from` in bucket `key`.
    ///
    /// A followed suggestion is reinforced. Otherwise the ignored suggestion decays and the
    /// actual transition receives the standard increment.
    #[must_use]
    pub fn process_feedback_in(
        &self,
        key: ContextKey,
        from: ExerciseID,
        actual: ExerciseID,
        suggested: Option<ExerciseID>,
    ) -> Self {
        let mut map = self.clone();
        let sources = Arc::make_mut(map.0.entry(key).or_default());
        let weights = Arc::make_mut(sources.entry(from).or_default());

        match suggested {
            Some(suggested) if suggested == actual => {
                debug!("reinforce transition {from} -> {actual} in {key}");
                weights
                    .entry(actual)
                    .and_modify(|w| *w += Self::INCREMENT * Self::REINFORCEMENT_FACTOR)
                    .or_insert(Self::BASE_WEIGHT * Self::REINFORCEMENT_FACTOR);
            }
            _ => {
                if let Some(w) = suggested.and_then(|s| weights.get_mut(&s)) {
                    debug!("penalize ignored suggestion after {from} in {key}");
                    *w *= Self::PENALTY_FACTOR;
                }
                weights
                    .entry(actual)
                    .and_modify(|w| *w += Self::INCREMENT)
                    .or_insert(Self::BASE_WEIGHT);
            }
        }

        map
    }

    /// Record a transition without any suggestion state.
    #[must_use]
    pub fn record_transition(&self, from: ExerciseID, to: ExerciseID) -> Self {
        self.process_feedback(from, to, None)
    }

    #[must_use]
    pub fn record_transition_in(&self, key: ContextKey, from: ExerciseID, to: ExerciseID) -> Self {
        self.process_feedback_in(key, from, to, None)
    }
}

impl FromIterator<(ContextKey, ExerciseID, ExerciseID, f64)> for TransitionMap {
    fn from_iter<T: IntoIterator<Item = (ContextKey, ExerciseID, ExerciseID, f64)>>(
        iter: T,
    ) -> Self {
        let mut map: BTreeMap<ContextKey, BTreeMap<ExerciseID, Weights>> = BTreeMap::new();
        for (key, from, to, weight) in iter {
            map.entry(key)
                .or_default()
                .entry(from)
                .or_default()
                .insert(to, weight);
        }
        Self(
            map.into_iter()
                .map(|(key, sources)| {
                    (
                        key,
                        Arc::new(
                            sources
                                .into_iter()
                                .map(|(from, weights)| (from, Arc::new(weights)))
                                .collect(),
                        ),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    static KEY: std::sync::LazyLock<ContextKey> =
        std::sync::LazyLock::new(|| ContextKey::new(2, 4).unwrap());

    static OTHER_KEY: std::sync::LazyLock<ContextKey> =
        std::sync::LazyLock::new(|| ContextKey::new(5, 1).unwrap());

    #[rstest]
    #[case(1, 1.0)]
    #[case(2, 2.0)]
    #[case(5, 5.0)]
    fn test_record_transition_repeated(#[case] n: usize, #[case] expected: f64) {
        let map = (0..n).fold(TransitionMap::new(), |map, _| {
            map.process_feedback_in(*KEY, 1.into(), 2.into(), None)
        });
        assert_eq!(
            map.weight(*KEY, 1.into(), 2.into()),
            Some(TransitionMap::BASE_WEIGHT + (n - 1) as f64 * TransitionMap::INCREMENT)
        );
    }

    #[test]
    fn test_process_feedback_reinforcement() {
        let map = TransitionMap::new().record_transition_in(*KEY, 1.into(), 2.into());
        let map = map.process_feedback_in(*KEY, 1.into(), 2.into(), Some(2.into()));
        assert_eq!(map.weight(*KEY, 1.into(), 2.into()), Some(2.5));
    }

    #[test]
    fn test_process_feedback_reinforcement_initializes_weight() {
        let map =
            TransitionMap::new().process_feedback_in(*KEY, 1.into(), 2.into(), Some(2.into()));
        assert_eq!(map.weight(*KEY, 1.into(), 2.into()), Some(1.5));
    }

    #[test]
    fn test_process_feedback_divergence() {
        let map = TransitionMap::new()
            .record_transition_in(*KEY, 1.into(), 2.into())
            .record_transition_in(*KEY, 1.into(), 2.into())
            .record_transition_in(*KEY, 1.into(), 3.into());
        let map = map.process_feedback_in(*KEY, 1.into(), 3.into(), Some(2.into()));
        assert_approx_eq!(map.weight(*KEY, 1.into(), 2.into()).unwrap(), 1.8);
        assert_eq!(map.weight(*KEY, 1.into(), 3.into()), Some(2.0));
    }

    #[test]
    fn test_process_feedback_divergence_without_suggested_weight() {
        let map =
            TransitionMap::new().process_feedback_in(*KEY, 1.into(), 3.into(), Some(2.into()));
        assert_eq!(map.weight(*KEY, 1.into(), 2.into()), None);
        assert_eq!(map.weight(*KEY, 1.into(), 3.into()), Some(1.0));
    }

    #[test]
    fn test_process_feedback_decay_stays_positive() {
        let map = (0..100).fold(
            TransitionMap::new().record_transition_in(*KEY, 1.into(), 2.into()),
            |map, _| map.process_feedback_in(*KEY, 1.into(), 3.into(), Some(2.into())),
        );
        assert!(map.weight(*KEY, 1.into(), 2.into()).unwrap() > 0.0);
        assert_eq!(map.weight(*KEY, 1.into(), 3.into()), Some(100.0));
    }

    #[test]
    fn test_process_feedback_does_not_mutate_input() {
        let map = TransitionMap::new()
            .record_transition_in(*KEY, 1.into(), 2.into())
            .record_transition_in(*OTHER_KEY, 1.into(), 2.into());
        let before = map.iter().collect::<Vec<_>>();
        let updated = map.process_feedback_in(*KEY, 1.into(), 3.into(), Some(2.into()));
        assert_eq!(map.iter().collect::<Vec<_>>(), before);
        assert_ne!(updated, map);
    }

    #[test]
    fn test_process_feedback_shares_untouched_branches() {
        let map = TransitionMap::new()
            .record_transition_in(*KEY, 1.into(), 2.into())
            .record_transition_in(*OTHER_KEY, 1.into(), 2.into());
        let updated = map.record_transition_in(*KEY, 1.into(), 2.into());
        assert!(Arc::ptr_eq(&map.0[&*OTHER_KEY], &updated.0[&*OTHER_KEY]));
        assert!(!Arc::ptr_eq(&map.0[&*KEY], &updated.0[&*KEY]));
    }

    #[test]
    fn test_process_feedback_scoped_by_context() {
        let map = TransitionMap::new().record_transition_in(*KEY, 1.into(), 2.into());
        assert_eq!(map.transitions(*OTHER_KEY, 1.into()), None);
        assert_eq!(map.transitions(*KEY, 2.into()), None);
    }

    #[test]
    fn test_transition_map_from_iter() {
        let entries: Vec<(ContextKey, ExerciseID, ExerciseID, f64)> = vec![
            (*KEY, 1.into(), 2.into(), 3.0),
            (*KEY, 1.into(), 4.into(), 1.5),
            (*OTHER_KEY, 2.into(), 1.into(), 1.0),
        ];
        let map = entries.iter().copied().collect::<TransitionMap>();
        assert_eq!(map.iter().collect::<Vec<_>>(), entries);
        assert!(!map.is_empty());
    }
}
