//! Core types for Canopy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod locale;
pub mod price;
pub mod tenant;

pub use catalog::{Category, Product};
pub use id::*;
pub use locale::{Locale, LocaleConfig};
pub use price::{CurrencyCode, Price};
pub use tenant::Tenant;
