//! [`WeightStore`]: mutex-guarded weight map with write-through persistence.

use std::sync::Mutex;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;

use super::backend::{WeightBackend, WeightMap};

/// Weight of a rule that has never received feedback.
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Lower clamp bound (rule always ignored).
pub const MIN_WEIGHT: f64 = 0.0;
/// Upper clamp bound (rule maximally strict).
pub const MAX_WEIGHT: f64 = 2.0;

/// Persisted key for a (profile, rule) pair.
pub fn weight_key(profile: &str, rule_name: &str) -> String {
    format!("{}_{}", profile, rule_name)
}

/// Clamp to `[MIN_WEIGHT, MAX_WEIGHT]`, snapping away float noise from
/// repeated `±0.2` steps (1.0 - 3 * 0.2 must be exactly 0.4).
fn settle(weight: f64) -> f64 {
    ((weight * 1e9).round() / 1e9).clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// One applied weight change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChange {
    pub key: String,
    pub previous: f64,
    pub weight: f64,
}

/// Process-wide weight map.
///
/// All mutations take the map lock and hold it across the backend write, so
/// updates are serialized and each persisted snapshot contains every earlier
/// update. The in-memory value only changes if the write succeeds.
pub struct WeightStore<B> {
    backend: B,
    weights: Mutex<WeightMap>,
}

impl<B: WeightBackend> WeightStore<B> {
    /// Load the map from `backend`.
    ///
    /// Out-of-range values are clamped, non-finite values dropped.
    pub fn open(backend: B) -> Result<Self> {
        let mut weights = backend.load()?;
        weights.retain(|key, value| {
            if !value.is_finite() {
                warn!(%key, "dropping non-finite stored weight");
                return false;
            }
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(value) {
                warn!(%key, value = *value, "clamping out-of-range stored weight");
                *value = value.clamp(MIN_WEIGHT, MAX_WEIGHT);
            }
            true
        });
        Ok(Self {
            backend,
            weights: Mutex::new(weights),
        })
    }

    /// Current weight, or [`DEFAULT_WEIGHT`] if never set. No side effects.
    pub fn get(&self, profile: &str, rule_name: &str) -> f64 {
        self.weights
            .lock()
            .expect("weights lock poisoned")
            .get(&weight_key(profile, rule_name))
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Add `delta` to the weight (clamped) and persist the full map.
    ///
    /// On a failed write the in-memory map is left unchanged and the
    /// persistence error is returned.
    pub fn apply(&self, profile: &str, rule_name: &str, delta: f64) -> Result<WeightChange> {
        let key = weight_key(profile, rule_name);
        let mut weights = self.weights.lock().expect("weights lock poisoned");

        let previous = weights.get(&key).copied().unwrap_or(DEFAULT_WEIGHT);
        let weight = settle(previous + delta);

        let replaced = weights.insert(key.clone(), weight);
        if let Err(e) = self.backend.persist(&weights) {
            match replaced {
                Some(old) => weights.insert(key.clone(), old),
                None => weights.remove(&key),
            };
            warn!(%key, error = %e, "weight update not persisted, rolled back");
            return Err(e);
        }

        Ok(WeightChange { key, previous, weight })
    }

    /// Copy of the full map.
    pub fn snapshot(&self) -> WeightMap {
        self.weights.lock().expect("weights lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.weights.lock().expect("weights lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
