//! Plan diff engine
//!
//! Turns the before/after snapshots of a resource change into an ordered list
//! of property-level changes, honoring sensitive and unknown-value markers.
//!
//! # Example
//!
//! ```ignore
//! use planlens::diff::DiffEngine;
//!
//! for change in DiffEngine::new().analyze(&resource) {
//!     println!("{} {}", change.kind().symbol(), change.property_path);
//! }
//! ```

mod engine;
mod property;

pub use engine::{DEFAULT_MAX_DEPTH, DiffEngine};
pub use property::{PropertyChange, PropertyChangeKind};
