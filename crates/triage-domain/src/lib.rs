//! Claim Triage Domain Layer
//!
//! This crate contains the canonical claim-record shape and the trait
//! interfaces every other crate in the workspace depends upon. It carries
//! no I/O; collaborator implementations live in other crates.
//!
//! ## Key Concepts
//!
//! - **Schema**: the ordered set of fields the extraction contract requires
//! - **ClaimRecord**: the immutable result of triaging one document
//! - **ParseOutcome**: structured fields, or the raw model reply when the
//!   reply could not be parsed (a *degraded* result)
//! - **ClaimIdPolicy**: how the record's primary key is resolved
//!
//! ## Architecture
//!
//! - Pure data and business rules only
//! - Trait definitions for all external collaborators (model, store,
//!   notifier, text extractor)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use record::{
    ClaimFields, ClaimIdPolicy, ClaimRecord, ParseOutcome, RawOutput, UNKNOWN_CLAIM_ID,
};
pub use schema::{Field, Schema, SchemaVariant};
pub use traits::UpsertOutcome;
