//! Chained lexical environments (§4.3).
//!
//! Each scope is a fixed-size bucket table keyed by [`djb2`] hash, chained
//! to an optional `outer` parent. Environments are reference-counted:
//! `new_enclosed` bumps the parent's strong count, and dropping the last
//! handle releases it automatically and recurses into `outer`. Bucket
//! storage is pooled (`ENV_POOL`) so repeated calls reuse allocations
//! instead of growing the allocator's free list every time.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// Default bucket count for a freshly allocated environment.
pub const DEFAULT_CAPACITY: usize = 8;

type Bucket = Vec<(String, Value)>;

fn djb2(key: &str) -> u64 {
    let mut hash: u64 = 5381;
    for byte in key.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

thread_local! {
    static ENV_POOL: RefCell<Vec<Vec<Bucket>>> = RefCell::new(Vec::new());
}

fn acquire_buckets(cap: usize) -> Vec<Bucket> {
    ENV_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        match pool.pop() {
            Some(mut buckets) => {
                if buckets.len() < cap {
                    buckets.resize_with(cap, Vec::new);
                }
                buckets
            }
            None => vec![Vec::new(); cap],
        }
    })
}

fn release_buckets(mut buckets: Vec<Bucket>) {
    for bucket in buckets.iter_mut() {
        bucket.clear();
    }
    ENV_POOL.with(|pool| pool.borrow_mut().push(buckets));
}

pub(crate) struct EnvInner {
    buckets: Vec<Bucket>,
    outer: Option<Environment>,
}

impl Drop for EnvInner {
    fn drop(&mut self) {
        let buckets = std::mem::take(&mut self.buckets);
        release_buckets(buckets);
    }
}

/// A handle to a chained scope. Cloning is cheap (an `Rc` bump) and is
/// how closures capture their defining scope.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<EnvInner>>);

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.0.borrow().buckets.len())
            .finish()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Environment(Rc::new(RefCell::new(EnvInner {
            buckets: acquire_buckets(cap.max(1)),
            outer: None,
        })))
    }

    /// A child scope, e.g. a function call frame. Holding `self` as
    /// `outer` bumps its ref count, so the parent stays alive at least as
    /// long as any child does.
    pub fn new_enclosed(parent: &Environment) -> Self {
        let child = Self::new();
        child.0.borrow_mut().outer = Some(parent.clone());
        child
    }

    fn bucket_index(&self, key: &str) -> usize {
        let cap = self.0.borrow().buckets.len() as u64;
        (djb2(key) % cap) as usize
    }

    /// Walk the bucket chain for `key`, falling back to `outer` on miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        let idx = self.bucket_index(key);
        let inner = self.0.borrow();
        if let Some((_, value)) = inner.buckets[idx].iter().find(|(k, _)| k == key) {
            return Some(value.clone());
        }
        let outer = inner.outer.clone();
        drop(inner);
        outer.and_then(|o| o.get(key))
    }

    /// Bind `key` to `value` in this scope only. Replaces an existing
    /// binding in place rather than shadowing with a second entry.
    pub fn set(&self, key: &str, value: Value) {
        let idx = self.bucket_index(key);
        let mut inner = self.0.borrow_mut();
        let bucket = &mut inner.buckets[idx];
        if let Some(slot) = bucket.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            bucket.push((key.to_string(), value));
        }
    }

    /// Whether `other` is the exact same scope, used by the collector to
    /// avoid re-marking the environment it is already walking (§4.4).
    pub fn is_same(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn values(&self) -> Vec<Value> {
        self.0
            .borrow()
            .buckets
            .iter()
            .flat_map(|b| b.iter().map(|(_, v)| v.clone()))
            .collect()
    }

    /// Forcibly drop every binding this scope holds, severing whatever
    /// strong edges it contributes to a closure cycle. Called only by
    /// the collector on an environment proven unreachable from the
    /// tracked root (§4.4, §9).
    pub(crate) fn break_cycle(&self) {
        for bucket in self.0.borrow_mut().buckets.iter_mut() {
            bucket.clear();
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{self};

    #[test]
    fn get_set_round_trips() {
        let env = Environment::new();
        env.set("x", value::int(42));
        assert!(matches!(env.get("x").unwrap().kind, crate::value::ValueKind::Int(42)));
    }

    #[test]
    fn child_falls_back_to_outer() {
        let outer = Environment::new();
        outer.set("x", value::int(1));
        let inner = Environment::new_enclosed(&outer);
        assert!(inner.get("x").is_some());
        assert!(inner.get("missing").is_none());
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let outer = Environment::new();
        outer.set("x", value::int(1));
        let inner = Environment::new_enclosed(&outer);
        inner.set("x", value::int(2));
        assert!(matches!(inner.get("x").unwrap().kind, crate::value::ValueKind::Int(2)));
        assert!(matches!(outer.get("x").unwrap().kind, crate::value::ValueKind::Int(1)));
    }

    #[test]
    fn set_replaces_rather_than_duplicates() {
        let env = Environment::new();
        env.set("x", value::int(1));
        env.set("x", value::int(2));
        assert!(matches!(env.get("x").unwrap().kind, crate::value::ValueKind::Int(2)));
    }
}
