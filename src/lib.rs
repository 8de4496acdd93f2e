#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A key-value map over a separately chained [`HashTable`].
///
/// This module provides a `HashMap` that hashes keys with a configurable
/// hasher builder and stores `(key, value)` pairs in the table's buckets.
pub mod hash_map;

pub mod hash_table;

mod error;
mod policy;

pub use error::Error;
pub use error::Result;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use policy::LoadFactor;
pub use policy::ResizePolicy;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultHashMap`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultHashMap`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// A [`HashMap`] using [`DefaultHashBuilder`].
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type DefaultHashMap<K, V> = HashMap<K, V, DefaultHashBuilder>;
