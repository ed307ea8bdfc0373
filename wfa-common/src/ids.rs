//! Identifier generation
//!
//! Analyses are keyed by opaque strings. The store only relies on every
//! generated value being unique; it never parses them.

use uuid::Uuid;

/// Source of globally unique analysis identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier, never returned before
    fn next_id(&self) -> String;
}

/// UUIDv4 identifiers in hyphenated lowercase form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
