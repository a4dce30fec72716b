//! Structural diff engine.
//!
//! Two comparators share one reconcile primitive:
//!
//! - [`StorageDiffEngine`]: buckets, tables and columns, producing typed
//!   [`ChangeEvent`]s with derived links
//! - [`KeyDiffEngine`]: flat key sets, producing a [`KeyDiff`] presence table
//!
//! Both are built on [`ChangeComputer`](traits::ChangeComputer) strategies
//! driven by [`reconcile`](traits::reconcile).
//!
//! # Example
//!
//! ```ignore
//! use structure_diff::diff::StorageDiffEngine;
//!
//! let events = StorageDiffEngine::new().compare(&source, &destination);
//! for event in &events {
//!     println!("{} {:?}", event.kind(), event.resource_id());
//! }
//! ```

mod event;
mod keys;
mod link;
mod storage;
pub mod traits;

pub use event::ChangeEvent;
pub use keys::{KeyDiff, KeyDiffEngine, KeyEntry, KeyPresence};
pub use link::{LinkBuilder, LinkProject};
pub use storage::StorageDiffEngine;
pub use traits::{reconcile, ChangeComputer};
