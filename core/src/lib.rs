//! Reporting core for the soda storefront dashboard.
//!
//! Data flows one way: generate → filter → aggregate → view model.
//! Nothing here persists; every request recomputes from memoized
//! synthetic rows and the caller's session context.

pub mod advisor;
pub mod aggregate;
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod filter;
pub mod generator;
pub mod insights;
pub mod inventory;
pub mod report;
pub mod rng;
pub mod traffic;
pub mod types;
