// Domain model for c-funcdefs: the generic tree, the dispatcher and the
// function-definition handler.

pub mod ast;
pub mod error;
pub mod funcdef;
pub mod visitor;
