//! Locale dictionary reconciliation.
//!
//! [`diff`] finds the keys of the source dictionary that are absent or empty
//! in a target dictionary, [`merge`] writes values for them back into the
//! target, creating nested maps along the way.

mod reconcile;

pub use reconcile::{LocaleDictionary, MissingKey, diff, is_missing, merge, merge_one};
