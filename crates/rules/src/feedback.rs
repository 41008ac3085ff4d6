//! Feedback-driven violation flagging.
//!
//! Each (profile, rule) pair has a strictness weight in `[0, 2]`, starting at
//! `1.0`. Accepting a flagged violation raises it by [`LEARNING_RATE`],
//! rejecting lowers it. Rules whose weight drops below
//! [`SUPPRESSION_THRESHOLD`] stop being surfaced.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::error::{Result, RuleError};
use crate::weights::{WeightBackend, WeightMap, WeightStore};

/// Weight change per unit of feedback.
pub const LEARNING_RATE: f64 = 0.2;

/// Weights strictly below this suppress the rule; the bound itself still flags.
pub const SUPPRESSION_THRESHOLD: f64 = 0.4;

/// A reviewer's verdict on a surfaced violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Good catch (+1).
    Accept,
    /// Bad catch, ignore this (-1).
    Reject,
}

impl Feedback {
    pub fn sign(self) -> f64 {
        match self {
            Feedback::Accept => 1.0,
            Feedback::Reject => -1.0,
        }
    }
}

impl TryFrom<i32> for Feedback {
    type Error = RuleError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Feedback::Accept),
            -1 => Ok(Feedback::Reject),
            other => Err(RuleError::InvalidFeedback(other)),
        }
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" | "good" | "+1" | "1" => Ok(Feedback::Accept),
            "reject" | "bad" | "-1" => Ok(Feedback::Reject),
            other => Err(format!("unknown feedback '{}', expected accept or reject", other)),
        }
    }
}

/// Direction of an applied update, as reported to the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Strengthened,
    Relaxed,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Strengthened => write!(f, "Strengthened"),
            Direction::Relaxed => write!(f, "Relaxed"),
        }
    }
}

/// Outcome of [`FeedbackPolicy::update_policy`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyUpdate {
    pub profile: String,
    pub rule_name: String,
    pub direction: Direction,
    pub previous: f64,
    pub weight: f64,
}

impl PolicyUpdate {
    /// Whether the rule is still surfaced after this update.
    pub fn flagged(&self) -> bool {
        self.weight >= SUPPRESSION_THRESHOLD
    }
}

impl fmt::Display for PolicyUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Policy updated. Rule '{}' {} (Weight: {:.2})",
            self.rule_name, self.direction, self.weight
        )
    }
}

/// Flag/suppress decisions and feedback learning over a [`WeightStore`].
pub struct FeedbackPolicy<B> {
    store: WeightStore<B>,
}

impl<B: WeightBackend> FeedbackPolicy<B> {
    /// Load the weight store once from `backend`.
    pub fn new(backend: B) -> Result<Self> {
        let store = WeightStore::open(backend)?;
        info!(entries = store.len(), "feedback policy memory loaded");
        Ok(Self { store })
    }

    pub fn get_weight(&self, profile: &str, rule_name: &str) -> f64 {
        self.store.get(profile, rule_name)
    }

    /// `false` iff the current weight is strictly below [`SUPPRESSION_THRESHOLD`].
    pub fn should_flag_violation(&self, profile: &str, rule_name: &str) -> bool {
        self.get_weight(profile, rule_name) >= SUPPRESSION_THRESHOLD
    }

    /// Move the weight by `LEARNING_RATE * feedback` and persist.
    ///
    /// Persistence failures propagate; the weight is then unchanged.
    pub fn update_policy(&self, profile: &str, rule_name: &str, feedback: Feedback) -> Result<PolicyUpdate> {
        let change = self
            .store
            .apply(profile, rule_name, LEARNING_RATE * feedback.sign())?;

        let direction = match feedback {
            Feedback::Accept => Direction::Strengthened,
            Feedback::Reject => Direction::Relaxed,
        };
        let update = PolicyUpdate {
            profile: profile.to_string(),
            rule_name: rule_name.to_string(),
            direction,
            previous: change.previous,
            weight: change.weight,
        };
        info!(
            key = %change.key,
            previous = change.previous,
            weight = change.weight,
            flagged = update.flagged(),
            "{}", direction
        );
        Ok(update)
    }

    /// Copy of every stored weight.
    pub fn weights(&self) -> WeightMap {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::weights::MemoryBackend;

    fn policy() -> (MemoryBackend, FeedbackPolicy<MemoryBackend>) {
        let backend = MemoryBackend::new();
        let policy = FeedbackPolicy::new(backend.clone()).unwrap();
        (backend, policy)
    }

    #[test]
    fn fresh_rule_is_flagged_at_neutral_weight() {
        let (_, policy) = policy();
        assert_eq!(policy.get_weight("healthcare", "min_button_height"), 1.0);
        assert!(policy.should_flag_violation("healthcare", "min_button_height"));
    }

    #[test]
    fn repeated_rejections_suppress_below_threshold() {
        let (_, policy) = policy();
        let mut last = None;
        for _ in 0..3 {
            last = Some(policy.update_policy("healthcare", "min_button", Feedback::Reject).unwrap());
        }
        let third = last.unwrap();
        assert_eq!(third.weight, 0.4);
        assert!(third.flagged());
        assert!(policy.should_flag_violation("healthcare", "min_button"));

        let fourth = policy.update_policy("healthcare", "min_button", Feedback::Reject).unwrap();
        assert_eq!(fourth.weight, 0.2);
        assert!(!policy.should_flag_violation("healthcare", "min_button"));
    }

    #[test]
    fn weight_at_ceiling_stays_and_reports_strengthened() {
        let backend = MemoryBackend::with_weights(WeightMap::from([("gaming_max_misalignment".to_string(), 2.0)]));
        let policy = FeedbackPolicy::new(backend).unwrap();
        let update = policy.update_policy("gaming", "max_misalignment", Feedback::Accept).unwrap();
        assert_eq!(update.weight, 2.0);
        assert_eq!(update.direction, Direction::Strengthened);
        assert_eq!(
            update.to_string(),
            "Policy updated. Rule 'max_misalignment' Strengthened (Weight: 2.00)"
        );
    }

    #[test]
    fn relaxed_message_rounds_to_two_decimals() {
        let (_, policy) = policy();
        let update = policy.update_policy("web", "contrast", Feedback::Reject).unwrap();
        assert_eq!(update.to_string(), "Policy updated. Rule 'contrast' Relaxed (Weight: 0.80)");
    }

    #[test]
    fn floor_holds_at_zero() {
        let (_, policy) = policy();
        for _ in 0..10 {
            policy.update_policy("web", "contrast", Feedback::Reject).unwrap();
        }
        assert_eq!(policy.get_weight("web", "contrast"), 0.0);
    }

    #[test]
    fn persistence_failure_propagates() {
        let (backend, policy) = policy();
        backend.set_fail_writes(true);
        let err = policy.update_policy("healthcare", "min_button", Feedback::Reject).unwrap_err();
        assert!(matches!(err, RuleError::Persistence(_)));
        assert_eq!(policy.get_weight("healthcare", "min_button"), 1.0);
    }

    #[test]
    fn every_update_rewrites_the_store() {
        let (backend, policy) = policy();
        policy.update_policy("a", "r", Feedback::Accept).unwrap();
        policy.update_policy("b", "r", Feedback::Reject).unwrap();
        assert_eq!(backend.persist_count(), 2);
        assert_eq!(backend.stored(), policy.weights());
    }

    #[test]
    fn profiles_have_separate_namespaces() {
        let (_, policy) = policy();
        policy.update_policy("healthcare", "min_button", Feedback::Reject).unwrap();
        assert_eq!(policy.get_weight("gaming", "min_button"), 1.0);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let backend = MemoryBackend::with_weights(WeightMap::from([(
            "enterprise_min_field_height".to_string(),
            0.0,
        )]));
        let policy = Arc::new(FeedbackPolicy::new(backend.clone()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let policy = Arc::clone(&policy);
                thread::spawn(move || {
                    for _ in 0..2 {
                        policy.update_policy("enterprise", "min_field_height", Feedback::Accept).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // 8 serialized +0.2 steps from 0.0, none lost.
        assert_eq!(policy.get_weight("enterprise", "min_field_height"), 1.6);
        assert_eq!(backend.persist_count(), 8);
        assert_eq!(backend.stored()["enterprise_min_field_height"], 1.6);
    }

    #[test]
    fn feedback_conversions() {
        assert_eq!(Feedback::try_from(1).unwrap(), Feedback::Accept);
        assert_eq!(Feedback::try_from(-1).unwrap(), Feedback::Reject);
        assert!(matches!(Feedback::try_from(0), Err(RuleError::InvalidFeedback(0))));
        assert_eq!("ACCEPT".parse::<Feedback>().unwrap(), Feedback::Accept);
        assert_eq!("-1".parse::<Feedback>().unwrap(), Feedback::Reject);
        assert!("maybe".parse::<Feedback>().is_err());
    }
}
