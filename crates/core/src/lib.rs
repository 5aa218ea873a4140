//! Canopy Core - Shared types library.
//!
//! This crate provides common types used across all Canopy components:
//! - `storefront` - Multi-tenant public storefront server
//! - `integration-tests` - Pipeline-level test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Tenant and
//! catalog documents are read-only from this workspace's perspective: they
//! are owned by the admin/CRUD collaborator and arrive as JSON from the
//! managed document store, so everything here derives `serde`.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, locales, and the tenant/catalog model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
