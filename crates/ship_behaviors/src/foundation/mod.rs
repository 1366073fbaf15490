//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and operations
//! - Frame clock and one-shot timers
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
