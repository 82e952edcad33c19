//! The tree-walking evaluator (§4.1, §7).
//!
//! `Evaluator` owns no state of its own beyond a handle to the collector
//! (and through it, the root environment); every call takes the
//! environment it runs in as an explicit argument, the same shape
//! `eval_program`/`eval_expression` take in the reference semantics.
//!
//! A `return` statement and a runtime error are both short-circuiting
//! signals, but they're represented differently: an error is first-class
//! data (`Value::Error`) that every composite expression checks for and
//! propagates, while "this was produced by `return`" is a side channel
//! ([`Flow`]) that only block/program iteration and `if` need to see.
//! Keeping the flag out of `Value` itself means the singletons never
//! have to carry it, and a fresh value materializes at every operator
//! application exactly as the reference's allocator does.

use std::rc::Rc;

use thorn_ast::{Expr, InfixOp, PrefixOp, Program, Spanned, Stmt};

use crate::env::Environment;
use crate::gc::Collector;
use crate::value::{self, type_name, Value, ValueKind};

/// The result of evaluating one statement or expression: a value, and
/// whether it originated from a `return`.
struct Flow {
    value: Value,
    is_return: bool,
}

impl Flow {
    fn plain(value: Value) -> Self {
        Flow {
            value,
            is_return: false,
        }
    }

    fn returning(value: Value) -> Self {
        Flow {
            value,
            is_return: true,
        }
    }
}

pub struct Evaluator<'gc> {
    gc: &'gc Collector,
}

impl<'gc> Evaluator<'gc> {
    pub fn new(gc: &'gc Collector) -> Self {
        Evaluator { gc }
    }

    fn track(&self, value: Value) -> Value {
        self.gc.track(value)
    }

    /// Parse and evaluate `source` in the collector's root environment.
    /// A convenience wrapper; parse errors are folded into a single
    /// `Value::Error` rather than propagated out-of-band, since the
    /// evaluator's public surface only ever hands back a `Value`.
    pub fn eval_source(&self, source: &str) -> Value {
        let (program, errors) = thorn_parser::parse(source);
        if !errors.is_empty() {
            return self.track(value::error(errors.join("; ")));
        }
        self.eval_program(&program, self.gc.root())
    }

    /// `eval_program(Program, &Env) → Value` (§4.1).
    pub fn eval_program(&self, program: &Program, env: &Environment) -> Value {
        self.eval_statements(&program.statements, env).value
    }

    fn eval_block(&self, block: &thorn_ast::Block, env: &Environment) -> Flow {
        self.eval_statements(block, env)
    }

    fn eval_statements(&self, stmts: &[Spanned<Stmt>], env: &Environment) -> Flow {
        let mut result = Flow::plain(value::null());
        for stmt in stmts {
            result = self.eval_statement(&stmt.node, env);
            if result.is_return || value::is_error(&result.value) {
                return result;
            }
        }
        result
    }

    fn eval_statement(&self, stmt: &Stmt, env: &Environment) -> Flow {
        match stmt {
            Stmt::Let { name, value } => self.eval_let(name, value, env),
            Stmt::Return { value } => {
                let evaluated = self.eval_expr(value, env);
                if value::is_error(&evaluated.value) {
                    evaluated
                } else {
                    Flow::returning(evaluated.value)
                }
            }
            Stmt::Expr(expr) => self.eval_expr(expr, env),
        }
    }

    /// Evaluates the right-hand side, then binds it to `name` (§4.2).
    ///
    /// A function literal is pre-declared with a `Null` placeholder
    /// before its body is captured, then patched with the real value
    /// once the closure exists (§9, "recursive name resolution",
    /// option i) — the closure captures `env` by reference, so a
    /// recursive call made after this `let` completes sees the patched
    /// binding rather than the placeholder.
    ///
    /// Any other right-hand side is evaluated first, against whatever
    /// `name` was already bound to in this scope, and only then bound —
    /// an ordinary rebind like `let x = x + 1;` must see the *old* `x`,
    /// not a placeholder that would shadow it before the addition runs.
    fn eval_let(&self, name: &str, value_expr: &Spanned<Expr>, env: &Environment) -> Flow {
        if matches!(value_expr.node, Expr::Function { .. }) {
            env.set(name, value::null());
            let evaluated = self.eval_expr(value_expr, env);
            if value::is_error(&evaluated.value) {
                return evaluated;
            }
            env.set(name, evaluated.value.clone());
            return Flow::plain(evaluated.value);
        }

        let evaluated = self.eval_expr(value_expr, env);
        if value::is_error(&evaluated.value) {
            return evaluated;
        }
        env.set(name, evaluated.value.clone());
        Flow::plain(evaluated.value)
    }

    fn eval_expr(&self, expr: &Spanned<Expr>, env: &Environment) -> Flow {
        match &expr.node {
            Expr::Int(n) => Flow::plain(self.track(value::int(*n))),
            Expr::Bool(b) => Flow::plain(value::boolean(*b)),
            Expr::String(_) | Expr::Array { .. } | Expr::Index { .. } => Flow::plain(
                self.track(value::error(format!(
                    "unknown operator: {} not supported",
                    match &expr.node {
                        Expr::String(_) => "STRING",
                        Expr::Array { .. } => "ARRAY",
                        _ => "INDEX",
                    }
                ))),
            ),
            Expr::Ident(name) => Flow::plain(self.eval_ident(name, env)),
            Expr::Prefix { op, right } => {
                let right = self.eval_expr(right, env).value;
                if value::is_error(&right) {
                    return Flow::plain(right);
                }
                Flow::plain(self.eval_prefix(*op, &right))
            }
            Expr::Infix { op, left, right } => {
                let left = self.eval_expr(left, env).value;
                if value::is_error(&left) {
                    return Flow::plain(left);
                }
                let right = self.eval_expr(right, env).value;
                if value::is_error(&right) {
                    return Flow::plain(right);
                }
                Flow::plain(self.eval_infix(*op, &left, &right))
            }
            Expr::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if(condition, consequence, alternative.as_ref(), env),
            Expr::Function { params, body } => {
                let params = params.iter().map(|p| p.node.clone()).collect();
                let func = value::function(params, Rc::new(body.clone()), env.clone());
                Flow::plain(self.track(func))
            }
            Expr::Call { callee, args } => self.eval_call(callee, args, env),
        }
    }

    fn eval_ident(&self, name: &str, env: &Environment) -> Value {
        match env.get(name) {
            Some(value) => value,
            None => self.track(value::error(format!("identifier not found: {name}"))),
        }
    }

    fn eval_prefix(&self, op: PrefixOp, right: &Value) -> Value {
        match op {
            PrefixOp::Not => self.eval_bang(right),
            PrefixOp::Minus => self.eval_minus(right),
        }
    }

    fn eval_bang(&self, right: &Value) -> Value {
        value::boolean(!value::is_truthy(right))
    }

    fn eval_minus(&self, right: &Value) -> Value {
        match &right.kind {
            ValueKind::Int(n) => self.track(value::int(-n)),
            other => self.track(value::error(format!(
                "unknown operator: -{}",
                type_name_of(other)
            ))),
        }
    }

    fn eval_infix(&self, op: InfixOp, left: &Value, right: &Value) -> Value {
        match (&left.kind, &right.kind) {
            (ValueKind::Int(l), ValueKind::Int(r)) => self.eval_integer_infix(op, *l, *r),
            (ValueKind::Bool(_), ValueKind::Bool(_)) if matches!(op, InfixOp::Eq | InfixOp::NotEq) => {
                let eq = std::rc::Rc::ptr_eq(left, right);
                value::boolean(if matches!(op, InfixOp::Eq) { eq } else { !eq })
            }
            (l, r) if std::mem::discriminant(l) == std::mem::discriminant(r) => {
                self.track(value::error(format!(
                    "unknown operator: {} {op} {}",
                    type_name(left),
                    type_name(right)
                )))
            }
            _ => self.track(value::error(format!(
                "type mismatch: {} {op} {}",
                type_name(left),
                type_name(right)
            ))),
        }
    }

    fn eval_integer_infix(&self, op: InfixOp, left: i64, right: i64) -> Value {
        match op {
            InfixOp::Add => self.track(value::int(left.wrapping_add(right))),
            InfixOp::Sub => self.track(value::int(left.wrapping_sub(right))),
            InfixOp::Mul => self.track(value::int(left.wrapping_mul(right))),
            InfixOp::Div => {
                if right == 0 {
                    self.track(value::error("division by zero"))
                } else {
                    self.track(value::int(left.wrapping_div(right)))
                }
            }
            InfixOp::Lt => value::boolean(left < right),
            InfixOp::Gt => value::boolean(left > right),
            InfixOp::Eq => value::boolean(left == right),
            InfixOp::NotEq => value::boolean(left != right),
        }
    }

    fn eval_if(
        &self,
        condition: &Spanned<Expr>,
        consequence: &thorn_ast::Block,
        alternative: Option<&thorn_ast::Block>,
        env: &Environment,
    ) -> Flow {
        let condition = self.eval_expr(condition, env).value;
        if value::is_error(&condition) {
            return Flow::plain(condition);
        }
        if value::is_truthy(&condition) {
            self.eval_block(consequence, env)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative, env)
        } else {
            Flow::plain(value::null())
        }
    }

    fn eval_call(&self, callee: &Spanned<Expr>, args: &[Spanned<Expr>], env: &Environment) -> Flow {
        let callee = self.eval_expr(callee, env).value;
        if value::is_error(&callee) {
            return Flow::plain(callee);
        }

        let mut evaluated_args = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval_expr(arg, env).value;
            if value::is_error(&value) {
                return Flow::plain(value);
            }
            evaluated_args.push(value);
        }

        Flow::plain(self.apply_function(&callee, evaluated_args))
    }

    fn apply_function(&self, callee: &Value, args: Vec<Value>) -> Value {
        let func = match &callee.kind {
            ValueKind::Function(func) => func,
            other => {
                return self.track(value::error(format!(
                    "not a function: {}",
                    type_name_of(other)
                )))
            }
        };

        if func.params.len() != args.len() {
            return self.track(value::error(format!(
                "invalid function call: expected {} arguments, got {}",
                func.params.len(),
                args.len()
            )));
        }

        let call_env = Environment::new_enclosed(&func.env);
        for (param, arg) in func.params.iter().zip(args) {
            call_env.set(param, arg);
        }

        self.eval_block(&func.body, &call_env).value
    }
}

fn type_name_of(kind: &ValueKind) -> &'static str {
    match kind {
        ValueKind::Null => value::TYPE_NULL,
        ValueKind::Bool(_) => value::TYPE_BOOLEAN,
        ValueKind::Int(_) => value::TYPE_INTEGER,
        ValueKind::Error(_) => value::TYPE_ERROR,
        ValueKind::Function(_) => value::TYPE_FUNCTION,
    }
}
