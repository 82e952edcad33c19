//! Stop-the-world mark-and-sweep collector (§4.4).
//!
//! Reference counting alone frees every acyclic structure the moment the
//! evaluator drops its last handle. The one case it cannot free is a
//! closure stored in the very scope it captured: the function holds the
//! environment, and the environment's own bucket holds the function. The
//! collector exists solely to break that cycle. It tracks every
//! non-singleton value ever produced, marks what's reachable from a root
//! environment, and for anything left unmarked, clears the bindings of
//! whatever environment it closes over — severing the cycle so the
//! ordinary `Rc` drop glue can reclaim the rest.

use std::cell::RefCell;

use crate::env::Environment;
use crate::value::{self, Value, ValueKind};

pub struct Collector {
    root: Environment,
    tracked: RefCell<Vec<Value>>,
}

impl Collector {
    pub fn new(root: Environment) -> Self {
        Collector {
            root,
            tracked: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Environment {
        &self.root
    }

    /// Register a freshly allocated value for collection. Singletons are
    /// never tracked — they live for the process's lifetime.
    pub fn track(&self, value: Value) -> Value {
        if !value::is_singleton(&value) {
            self.tracked.borrow_mut().push(value.clone());
        }
        value
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.borrow().len()
    }

    /// `mark(env) + sweep()`, matching the reference collector's `run`.
    pub fn run(&self) {
        self.mark_env(&self.root);
        self.sweep();
        tracing::debug!(tracked = self.tracked_count(), "collector run complete");
    }

    /// Walk every binding reachable from `env`, marking each value. A
    /// function's captured environment is only followed when it differs
    /// from the environment currently being walked — otherwise a
    /// self-capturing closure (`let f = fn() { f() };`) would recurse
    /// forever.
    fn mark_env(&self, env: &Environment) {
        for value in env.values() {
            value.set_mark(true);
            if let ValueKind::Function(func) = &value.kind {
                if !func.env.is_same(env) {
                    self.mark_env(&func.env);
                }
            }
        }
    }

    fn sweep(&self) {
        self.tracked.borrow_mut().retain(|value| {
            if value.marked() {
                value.set_mark(false);
                true
            } else {
                if let ValueKind::Function(func) = &value.kind {
                    func.env.break_cycle();
                }
                false
            }
        });
    }

    /// Drop every tracked value, used when tearing down an interpreter
    /// instance. `except` lets a caller keep a handful of live values
    /// (e.g. a REPL's last result) out of the purge.
    pub fn destroy(&self, except: &[Value]) {
        self.tracked.borrow_mut().retain(|value| {
            let keep = except.iter().any(|e| std::rc::Rc::ptr_eq(e, value));
            if !keep {
                if let ValueKind::Function(func) = &value.kind {
                    func.env.break_cycle();
                }
            }
            keep
        });
        self.root.break_cycle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Evaluator;

    #[test]
    fn collector_reclaims_self_capturing_closure() {
        let env = Environment::new();
        let gc = Collector::new(env.clone());
        let evaluator = Evaluator::new(&gc);

        evaluator.eval_source(
            "let make = fn() { let loop_fn = fn() { loop_fn }; loop_fn };\
             make();",
        );
        let before = gc.tracked_count();
        gc.run();
        let after = gc.tracked_count();
        assert!(after < before, "collector should reclaim the orphaned cycle");
    }

    #[test]
    fn collector_keeps_reachable_closures_alive() {
        let env = Environment::new();
        let gc = Collector::new(env.clone());
        let evaluator = Evaluator::new(&gc);

        evaluator.eval_source(
            "let new_adder = fn(x) { fn(y) { x + y } };\
             let add_two = new_adder(2);",
        );
        gc.run();
        let result = evaluator.eval_source("add_two(3);");
        assert_eq!(result.to_string(), "5");
    }
}
