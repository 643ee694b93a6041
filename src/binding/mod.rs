//! Binding Module - document to object injection
//!
//! - `resolve`: dotted path composition (prefix + fragment, child prefixes)
//! - `coerce`: filling one field from the document
//! - `collector`: failing routes of one drain
//! - `chain`: structural node keys and inherited prefixes
//! - `binder`: the work-queue drain and its callbacks
//!
//! Data flow:
//! ```text
//! BinderBuilder ─► Binder::run ─► drain(queue of PendingNode)
//!                                     │
//!                        Schema ─► resolve ─► coerce ─► Document
//!                                     │
//!                              ErrorCollector ─► on_success | on_failure
//! ```

mod binder;
mod chain;
mod coerce;
mod collector;
mod resolve;

pub use binder::{Binder, SharedBound};
pub use chain::{ChainTable, NodeKey, PendingNode};
pub use coerce::configure;
pub use collector::ErrorCollector;
pub use resolve::{child_prefix, container_prefix, field_path};
