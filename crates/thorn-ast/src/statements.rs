//! Statement AST nodes.

use crate::{Expr, Spanned};

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let {
        name: String,
        value: Spanned<Expr>,
    },
    Return {
        value: Spanned<Expr>,
    },
    Expr(Spanned<Expr>),
}
