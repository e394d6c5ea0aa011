//! services/api/src/lib.rs
//!
//! The HTTP service around `teachwave_core`: configuration, adapters and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
