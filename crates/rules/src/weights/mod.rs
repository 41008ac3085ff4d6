//! Durable per-(profile, rule) strictness weights.
//!
//! [`WeightStore`] keeps the full map in memory behind a mutex and rewrites
//! it through a [`WeightBackend`] on every change. The persisted format is a
//! flat JSON object keyed by `"{profile}_{rule_name}"`.

mod backend;
mod store;


pub use self::backend::{JsonFileBackend, MemoryBackend, WeightBackend, WeightMap};
pub use self::store::{weight_key, WeightChange, WeightStore, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
