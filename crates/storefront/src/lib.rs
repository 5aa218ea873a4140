//! Canopy Storefront library.
//!
//! This crate provides the multi-tenant storefront pipeline as a library,
//! allowing it to be tested and reused. The pipeline turns an incoming
//! request (host + path) into a rendered storefront for the right tenant:
//!
//! ```text
//! request -> host resolver -> tenant directory -> snapshot cache
//!         -> catalog assembler (on miss/stale) -> theme dispatch -> response
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod host;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod themes;
