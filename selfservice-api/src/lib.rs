//! Self-service portal API library
//!
//! Lets application teams create OpenShift projects, become their admins,
//! keep billing metadata up to date and adjust compute quotas without
//! cluster-admin rights of their own.

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

// Platform integration
pub mod openshift;

// HTTP surface
pub mod handlers;
pub mod middleware;
pub mod shutdown;

// Application state
pub mod state;
pub use state::AppState;
