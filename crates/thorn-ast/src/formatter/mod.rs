//! Fully parenthesized, precedence-faithful rendering.
//!
//! Every infix expression is wrapped in parens around its own subtree,
//! so re-parsing the rendered text always reproduces the same tree
//! regardless of the original source's parenthesization (§8 round-trip
//! property).

mod expressions;
mod statements;

use crate::Program;
use std::fmt;

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", stmt.node)?;
        }
        Ok(())
    }
}

pub(crate) fn block_to_string(block: &crate::Block) -> String {
    let mut out = String::new();
    for stmt in block {
        out.push_str(&stmt.node.to_string());
        out.push(' ');
    }
    out.trim_end().to_string()
}
