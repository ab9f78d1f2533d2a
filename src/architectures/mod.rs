//! Catalog of the architectures PrompTitecture is organised around.
//!
//! Entries are registered by identifier only; none of them ships an
//! executable pipeline yet, so every entry reports [`ArchitectureStatus::Planned`].

pub mod catalog;

pub use catalog::{catalog, lookup, Architecture, ArchitectureInfo, ArchitectureStatus};
