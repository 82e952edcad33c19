//! Thorn evaluator
//!
//! Value model, chained environments, the tree-walking evaluator, and the
//! mark-and-sweep collector that reclaims closure cycles plain reference
//! counting cannot.

pub mod env;
pub mod eval;
pub mod gc;
pub mod value;

pub use env::Environment;
pub use eval::Evaluator;
pub use gc::Collector;
pub use value::{type_name, Value};

/// Build a fresh interpreter: a root environment, its collector, and an
/// evaluator borrowing it. The triple a driver (REPL or file runner)
/// needs to run a program end to end.
pub struct Interpreter {
    pub collector: Collector,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            collector: Collector::new(Environment::new()),
        }
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.collector)
    }

    pub fn root(&self) -> &Environment {
        self.collector.root()
    }

    /// Evaluate `source` in the root environment and return its value.
    pub fn eval(&self, source: &str) -> Value {
        self.evaluator().eval_source(source)
    }

    /// Run the collector over the current root environment.
    pub fn collect(&self) {
        self.collector.run();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
