use thiserror::Error;

/// Errors reported by [`HashMap`](crate::HashMap) and
/// [`ResizePolicy`](crate::ResizePolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The key supplied isn't in the map.
    #[error("the key supplied isn't in the map")]
    KeyNotFound,

    /// The key and value sequences handed to a bulk constructor differ in
    /// length.
    #[error("key and value sequences differ in length ({keys} keys, {values} values)")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A [`ResizePolicy`](crate::ResizePolicy) failed validation.
    #[error("invalid resize policy: {0}")]
    InvalidPolicy(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
