//! Domain types for Patchbay's shared configuration.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: the document model and the one-time layout migration.
//! It never touches the bridge; reading and writing the document is the
//! store's job.

/// The configuration document model — the core domain concept.
///
/// See [`document::ConfigDocument`] for the main type.
pub mod document;

/// One-time restructuring of legacy single-clone documents.
pub mod migration;
