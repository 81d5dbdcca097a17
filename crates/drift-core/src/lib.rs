//! # drift-core
//!
//! Core types, conflict identity, and collaborator ports for wikidrift.
//!
//! This crate provides the foundational types shared across all wikidrift crates:
//! - Entity structs for the run-scoped dependency graph (articles, repos, releases)
//! - The [`DependencyGraph`](entities::DependencyGraph) arena that conflicts borrow from
//! - Deterministic conflict hashing and diagnostic signatures
//! - Issue payload rendering
//! - Port traits for the wiki source, release lookup, and issue tracker collaborators
//! - Cross-cutting error types and policy enums

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod issue;
pub mod ports;
