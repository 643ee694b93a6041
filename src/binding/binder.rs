//! Binder - drains the work queue of bound objects
//!
//! One drain:
//! ```text
//! roots ─► queue ─► pop node ─► prefix (chain table or container section)
//!                      │           │
//!                      │           ├─ required-all section missing/empty ─► error, skip node
//!                      │           └─ fields in declaration order
//!                      │                 ├─ scalar/list/section/map ─► coerce
//!                      │                 ├─ wrapped                 ─► construct
//!                      │                 └─ nested ─► chain prefix, enqueue child
//!                      ▼
//!                   empty ─► save ─► on_inject hooks ─► success | failure
//! ```
//!
//! A single mutex covers the whole cycle (reload, drain, save, hooks).
//! Callbacks run after it is released.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::chain::{ChainTable, NodeKey, PendingNode};
use super::coerce;
use super::collector::ErrorCollector;
use super::resolve::{child_prefix, container_prefix, field_path};
use crate::document::Document;
use crate::schema::{Access, Bound};
use crate::value::Scalar;

/// A registered root object
pub type SharedBound = Arc<Mutex<dyn Bound>>;

pub(crate) type SuccessCallback = Box<dyn Fn(&Binder) + Send + Sync>;
pub(crate) type FailureCallback = Box<dyn Fn(Vec<String>) + Send + Sync>;

struct State {
    document: Box<dyn Document>,
    chain: ChainTable,
}

/// Outcome of one drain, before callbacks
struct Drained {
    errors: ErrorCollector,
    /// Nodes whose fields were processed, in visit order
    visited: Vec<NodeKey>,
}

pub struct Binder {
    state: Mutex<State>,
    roots: Vec<SharedBound>,
    on_success: SuccessCallback,
    on_failure: FailureCallback,
}

impl Binder {
    pub(crate) fn new(
        document: Box<dyn Document>,
        roots: Vec<SharedBound>,
        on_success: SuccessCallback,
        on_failure: FailureCallback,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                document,
                chain: ChainTable::new(),
            }),
            roots,
            on_success,
            on_failure,
        }
    }

    /// Re-read the document and bind every root again
    ///
    /// A failed re-read is logged and the drain runs on the previous tree.
    pub fn reload(&self) {
        self.cycle(true, false);
    }

    /// Drain once; exactly one callback fires afterwards
    pub(crate) fn run(&self, from_resources: bool) {
        self.cycle(false, from_resources);
    }

    fn cycle(&self, reload: bool, from_resources: bool) {
        let errors = {
            let mut state = self.state.lock();
            if reload {
                if let Err(e) = state.document.reload() {
                    warn!(document = %state.document.name(), error = %e, "Reload failed");
                }
            }

            let drained = drain(&mut state, &self.roots, from_resources);
            if !drained.errors.has_errors() {
                for key in &drained.visited {
                    inject(&self.roots, key);
                }
            }
            drained.errors
        };

        if errors.has_errors() {
            debug!(count = errors.len(), "Binding failed");
            (self.on_failure)(errors.into_errors());
        } else {
            debug!("Binding succeeded");
            (self.on_success)(self);
        }
    }

    /// Typed read from the bound document
    pub fn value<T: Scalar>(&self, path: &str) -> Option<T> {
        let state = self.state.lock();
        state.document.get(path).as_ref().and_then(T::from_value)
    }

    /// Run `f` against the document under the binder lock
    pub fn with_document<R>(&self, f: impl FnOnce(&mut dyn Document) -> R) -> R {
        let mut state = self.state.lock();
        f(state.document.as_mut())
    }

    pub fn roots(&self) -> &[SharedBound] {
        &self.roots
    }

    /// Number of chained prefixes recorded so far
    pub fn chain_len(&self) -> usize {
        self.state.lock().chain.len()
    }
}

fn drain(state: &mut State, roots: &[SharedBound], from_resources: bool) -> Drained {
    let mut arena: Vec<PendingNode> = (0..roots.len())
        .map(|i| PendingNode::new(NodeKey::root(i)))
        .collect();
    let mut queue: VecDeque<usize> = (0..arena.len()).collect();
    let mut errors = ErrorCollector::new();
    let mut visited = Vec::new();

    while let Some(index) = queue.pop_front() {
        let key = arena[index].key.clone();
        let Some(root) = roots.get(key.root_index()) else {
            continue;
        };
        let mut guard = root.lock();
        let Some(node) = locate(&mut *guard, key.route()) else {
            debug!(node = %key, "Queued object no longer reachable");
            continue;
        };

        let schema = node.schema();
        let prefix = match state.chain.prefix(&key) {
            Some(prefix) => prefix.to_string(),
            None => container_prefix(&schema),
        };
        trace!(node = %key, type_name = schema.type_name(), prefix = %prefix, "Processing node");

        if schema.required_all() {
            if let Some(section) = schema.section() {
                match state.document.section(section) {
                    None => {
                        debug!(node = %key, section, "Required section missing, skipping");
                        errors.report(section);
                        continue;
                    }
                    Some(found) if found.is_empty(true) => {
                        debug!(node = %key, section, "Required section empty, skipping");
                        errors.report(section);
                        continue;
                    }
                    Some(_) => {}
                }
            }
        }
        visited.push(key.clone());

        for binding in schema.active_fields() {
            let path = field_path(&prefix, binding);
            let required = binding.is_required() || schema.required_all();

            match binding.access() {
                Access::Value(access) => match access.slot(node.as_any_mut()) {
                    Some(slot) => coerce::configure(
                        state.document.as_mut(),
                        &mut errors,
                        &path,
                        slot,
                        required,
                        from_resources,
                    ),
                    None => debug!(field = binding.name(), "Field owner has an unexpected type"),
                },
                Access::Wrapped(access) => coerce::construct(
                    state.document.as_ref(),
                    &mut errors,
                    &path,
                    access.as_ref(),
                    node.as_any_mut(),
                ),
                Access::Nested(access) => {
                    let Some(child) = access.child(node.as_any_mut()) else {
                        debug!(field = binding.name(), "Field owner has an unexpected type");
                        continue;
                    };
                    let child_key = key.child(binding.name());
                    let inherited = child_prefix(&path, &child.schema());
                    trace!(node = %child_key, prefix = %inherited, "Chaining nested object");
                    state.chain.insert(child_key.clone(), inherited);
                    arena.push(PendingNode::new(child_key));
                    queue.push_back(arena.len() - 1);
                }
            }
        }
    }

    if let Err(e) = state.document.save() {
        warn!(document = %state.document.name(), error = %e, "Saving document failed");
    }

    Drained { errors, visited }
}

/// Walk nested fields from a root down to the object at `route`
fn locate<'a>(node: &'a mut dyn Bound, route: &[String]) -> Option<&'a mut dyn Bound> {
    let Some((field, rest)) = route.split_first() else {
        return Some(node);
    };
    let schema = node.schema();
    let Access::Nested(access) = schema.field(field)?.access() else {
        return None;
    };
    let child = access.child(node.as_any_mut())?;
    locate(child, rest)
}

fn inject(roots: &[SharedBound], key: &NodeKey) {
    let Some(root) = roots.get(key.root_index()) else {
        return;
    };
    let mut guard = root.lock();
    if let Some(node) = locate(&mut *guard, key.route()) {
        trace!(node = %key, "Running on_inject");
        node.on_inject();
    }
}
