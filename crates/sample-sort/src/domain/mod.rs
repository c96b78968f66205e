//! # Domain Layer
//!
//! Value objects, errors, and invariants of the distributed sort.

pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use errors::{SortError, Stage};
pub use invariants::{first_descent, invariant_bucket_bounds, invariant_bucket_partition};
pub use value_objects::{BucketSet, PivotSet, ShardStage};
