//! Cache Module
//!
//! Content-addressed result cache: key derivation, the entry codec and the
//! facade that fronts the backing store.

mod codec;
mod facade;
mod key;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use codec::{decode, encode, Artifact, CachedEntry, CodecError};
pub use facade::ResultCache;
pub use key::{derive_key, normalize, Category};
pub use stats::{format_megabytes, CacheCounters, CacheReport, CounterSnapshot};
