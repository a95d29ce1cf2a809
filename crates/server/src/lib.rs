//! HTTP front end for the batch conversion session.
//!
//! The router is exposed so integration tests can drive it in-process.

pub mod api;
pub mod state;
