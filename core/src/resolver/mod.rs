// product_widget/src/resolver/mod.rs

//! Snapshot resolution: a structured document if one is stored, otherwise a
//! scan over scattered per-field keys.

pub mod document;
pub mod fields;
pub mod layout;
pub mod resolve;

pub use fields::ScatteredFields;
pub use layout::{CandidateSource, DocumentLocation, DocumentSchema, StorageLayout};
pub use resolve::{Resolution, SnapshotOrigin, SnapshotResolver};
