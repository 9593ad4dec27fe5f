//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::span::ArenaId;

/// Errors that can occur during arena operations.
///
/// Running out of memory is not represented here: block allocation
/// failure aborts the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The [`ArenaConfig`](crate::ArenaConfig) failed validation.
    InvalidConfig {
        /// Human-readable description of the violated constraint.
        reason: String,
    },
    /// A [`Span`](crate::Span) was resolved against an arena that did not
    /// create it.
    ForeignSpan {
        /// The arena that created the span.
        span_arena: ArenaId,
        /// The arena it was resolved against.
        arena: ArenaId,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
            Self::ForeignSpan { span_arena, arena } => {
                write!(
                    f,
                    "span belongs to arena {span_arena}, resolved against arena {arena}"
                )
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_arenas() {
        let err = ArenaError::ForeignSpan {
            span_arena: ArenaId::from_raw(3),
            arena: ArenaId::from_raw(7),
        };
        assert_eq!(
            err.to_string(),
            "span belongs to arena 3, resolved against arena 7"
        );
    }

    #[test]
    fn display_invalid_config() {
        let err = ArenaError::InvalidConfig {
            reason: "block_size too small".into(),
        };
        assert_eq!(err.to_string(), "invalid arena config: block_size too small");
    }
}
