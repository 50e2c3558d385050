//! Role-encoded patient identifiers for community health records.
//!
//! Every beneficiary receives a six character identifier: one role prefix
//! digit followed by a zero-padded five digit sequence (`100042` is the 42nd
//! pregnant beneficiary). Sequences come from per-role counters that only move
//! forward, and which are re-primed from the identifiers already held by the
//! record store so that restarts and other devices never cause reuse.
//!
//! ```
//! use maternova_id::{BasicCounters, IdGenerator, Role};
//!
//! let generator = IdGenerator::with_counters(BasicCounters::new());
//! generator.reconcile(["100001", "100042", "200007"]).unwrap();
//!
//! assert_eq!(generator.generate(Role::Pregnant).unwrap().to_string(), "100043");
//! assert_eq!(generator.generate(Role::Elderly).unwrap().to_string(), "200008");
//! ```
mod authority;
mod error;
mod generator;
mod id;
mod mutex;
mod reconcile;
mod registry;
mod role;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::authority::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::reconcile::*;
pub use crate::registry::*;
pub use crate::role::*;
pub use crate::time::*;
