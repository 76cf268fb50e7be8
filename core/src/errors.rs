//! Error kinds surfaced by the input assembly core (see §7 of the design notes).

use thiserror::Error;

/// Every failure the core can produce. None are recovered internally: they are
/// meant to surface all the way to the caller of `solve`/`check`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller-supplied input violates a structural invariant: a length
    /// mismatch, mixed index conventions, a duplicate id, a malformed
    /// shipment, geometry requested without coordinates, a matrix too small
    /// for the indices it must cover, or a custom matrix supplied while the
    /// instance is in implicit-index mode.
    #[error("input error: {0}")]
    Input(String),

    /// A routing backend request failed, returned malformed data, was asked
    /// for an unavailable profile, or (for the in-process backend) was not
    /// compiled in.
    #[error("routing error: {0}")]
    Routing(String),

    /// An internal invariant was violated — currently only raised by the
    /// cost-accumulation overflow check.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Builds an [`CoreError::Input`] from anything convertible to a `String`.
    pub fn input<S: Into<String>>(message: S) -> Self {
        CoreError::Input(message.into())
    }

    /// Builds a [`CoreError::Routing`] from anything convertible to a `String`.
    pub fn routing<S: Into<String>>(message: S) -> Self {
        CoreError::Routing(message.into())
    }

    /// Builds a [`CoreError::Internal`] from anything convertible to a `String`.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        CoreError::Internal(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;
