//! Common result and error type aliases used throughout the crate.

/// Crate-wide error type, backed by [`anyhow::Error`].
pub type Err = anyhow::Error;
/// Crate-wide result type using [`Err`].
pub type Res<T> = Result<T, Err>;
/// Convenience alias for a result with no meaningful success value.
pub type Void = Res<()>;
