use crate::Stmt;
use std::fmt;

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value } => write!(f, "let {name} = {};", value.node),
            Stmt::Return { value } => write!(f, "return {};", value.node),
            // The trailing `;` isn't optional here even though the parser
            // accepts a bare expression statement without one: without it,
            // an expression statement followed by one starting with `(` or
            // `[` would render as a single call/index expression instead of
            // two statements.
            Stmt::Expr(expr) => write!(f, "{};", expr.node),
        }
    }
}
