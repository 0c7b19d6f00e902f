use thiserror::Error;

/// Failure returned by [`Bimap::at_left`](crate::Bimap::at_left) and
/// [`Bimap::at_right`](crate::Bimap::at_right) when no stored key is
/// order-equivalent to the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("NOT_FOUND")]
pub struct NotFound;
