//! Visitor Dispatcher
//!
//! Walks an [`AstNode`] tree depth-first, pre-order. For every node the
//! dispatcher looks up a handler registered for the node's exact kind:
//!
//! - handler found: it runs, and its [`VisitFlow`] decides whether the
//!   node's children are walked;
//! - no handler: the children are walked in slot order.
//!
//! The walk uses an explicit stack, so tree depth is bounded by
//! [`Dispatcher::with_max_depth`] rather than by the thread's stack size.

use crate::domain::ast::{AstNode, AstNodeKind};
use crate::domain::error::TraversalError;
use std::collections::HashMap;

/// Default depth limit for a single traversal.
pub const DEFAULT_MAX_DEPTH: usize = 100_000;

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitFlow {
    /// Do not descend into the handled node.
    SkipChildren,
    /// Walk the handled node's children as if no handler were registered.
    VisitChildren,
}

/// A per-kind handler.
pub trait NodeHandler {
    fn handle(&mut self, node: &AstNode) -> Result<VisitFlow, TraversalError>;
}

impl<F> NodeHandler for F
where
    F: FnMut(&AstNode) -> Result<VisitFlow, TraversalError>,
{
    fn handle(&mut self, node: &AstNode) -> Result<VisitFlow, TraversalError> {
        self(node)
    }
}

pub struct Dispatcher<'h> {
    handlers: HashMap<AstNodeKind, Box<dyn NodeHandler + 'h>>,
    max_depth: usize,
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> Dispatcher<'h> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register `handler` for nodes of exactly `kind`. Replaces any
    /// handler previously registered for that kind.
    pub fn register<H>(&mut self, kind: AstNodeKind, handler: H) -> &mut Self
    where
        H: NodeHandler + 'h,
    {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// Register a closure for nodes of exactly `kind`.
    pub fn register_fn<F>(&mut self, kind: AstNodeKind, handler: F) -> &mut Self
    where
        F: FnMut(&AstNode) -> Result<VisitFlow, TraversalError> + 'h,
    {
        self.register(kind, handler)
    }

    pub fn has_handler(&self, kind: AstNodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Walk `root` and everything reachable from it. Returns the first
    /// handler error, abandoning the rest of the walk.
    pub fn traverse(&mut self, root: &AstNode) -> Result<(), TraversalError> {
        let mut stack: Vec<(&AstNode, usize)> = vec![(root, 0)];

        while let Some((node, depth)) = stack.pop() {
            if depth > self.max_depth {
                return Err(TraversalError::DepthLimitExceeded {
                    limit: self.max_depth,
                });
            }

            let flow = match self.handlers.get_mut(&node.kind) {
                Some(handler) => handler.handle(node)?,
                None => VisitFlow::VisitChildren,
            };

            if flow == VisitFlow::VisitChildren {
                // Reversed so the first child is popped first.
                stack.extend(node.children().rev().map(|child| (child, depth + 1)));
            }
        }

        Ok(())
    }
}
