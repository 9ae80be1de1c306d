//! hudkit Core
//!
//! Shared utilities for the hudkit HUD toolkit: math re-exports, hashed
//! collections, logging, profiling and configuration.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
