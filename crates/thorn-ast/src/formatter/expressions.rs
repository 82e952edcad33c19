use super::block_to_string;
use crate::{Expr, InfixOp, PrefixOp};
use std::fmt;

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Minus => write!(f, "-"),
            PrefixOp::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfixOp::Add => write!(f, "+"),
            InfixOp::Sub => write!(f, "-"),
            InfixOp::Mul => write!(f, "*"),
            InfixOp::Div => write!(f, "/"),
            InfixOp::Lt => write!(f, "<"),
            InfixOp::Gt => write!(f, ">"),
            InfixOp::Eq => write!(f, "=="),
            InfixOp::NotEq => write!(f, "!="),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::String(s) => write!(f, "\"{s}\""),
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::Prefix { op, right } => write!(f, "({op}{})", right.node),
            Expr::Infix { op, left, right } => {
                write!(f, "({} {op} {})", left.node, right.node)
            }
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {{ {} }}", condition.node, block_to_string(consequence))?;
                if let Some(alt) = alternative {
                    write!(f, " else {{ {} }}", block_to_string(alt))?;
                }
                Ok(())
            }
            Expr::Function { params, body } => {
                let params = params
                    .iter()
                    .map(|p| p.node.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fn({params}) {{ {} }}", block_to_string(body))
            }
            Expr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| a.node.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({args})", callee.node)
            }
            Expr::Array { elements } => {
                let elements = elements
                    .iter()
                    .map(|e| e.node.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{elements}]")
            }
            Expr::Index { left, index } => write!(f, "({}[{}])", left.node, index.node),
        }
    }
}
