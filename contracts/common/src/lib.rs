//! Shared access-control building blocks for the reward ledger contracts.
//!
//! This crate provides:
//! - [`admin_tiers`]: a three-tier admin registry kept in contract storage.
//! - [`authorizer`]: the `is_authorized(caller, action)` interface an
//!   external policy contract implements, plus the resolution helper that
//!   falls back to the tier registry when no policy contract is configured.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod admin_tiers;
pub mod authorizer;

pub use admin_tiers::AdminTier;
pub use authorizer::{AuthorizerClient, AuthorizerInterface};
