//! Traversal error types.
//!
//! Every variant is fatal: the dispatcher stops the walk and hands the error
//! back to whoever called `traverse`.

use crate::domain::ast::{AstNodeKind, Coord};
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum TraversalError {
    /// A handler needed a field the node does not carry.
    MissingField {
        kind: AstNodeKind,
        field: &'static str,
        coord: Option<Coord>,
    },

    /// The walk went deeper than the configured limit.
    DepthLimitExceeded { limit: usize },

    /// Writing a report failed.
    Sink(io::Error),
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalError::MissingField { kind, field, coord } => match coord {
                Some(coord) => write!(f, "{} node at {} has no {}", kind, coord, field),
                None => write!(f, "{} node has no {}", kind, field),
            },
            TraversalError::DepthLimitExceeded { limit } => {
                write!(f, "tree is deeper than the traversal limit of {}", limit)
            }
            TraversalError::Sink(e) => write!(f, "failed to write report: {}", e),
        }
    }
}

impl std::error::Error for TraversalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraversalError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TraversalError {
    fn from(e: io::Error) -> Self {
        TraversalError::Sink(e)
    }
}
