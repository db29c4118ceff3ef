//! # Config Crate
//!
//! Centralized configuration constants for the polygonal buffer kernel.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON_TOLERANCE, DEFAULT_QUADRANT_SEGMENTS};
//!
//! // Use EPSILON_TOLERANCE for floating-point comparisons
//! let value: f64 = 1.0e-11;
//! let is_zero = value.abs() < EPSILON_TOLERANCE;
//! assert!(is_zero);
//!
//! // Use the default quadrant segment count for curve approximation
//! let user_segments: Option<u32> = None;
//! let segments = user_segments.unwrap_or(DEFAULT_QUADRANT_SEGMENTS);
//! assert_eq!(segments, DEFAULT_QUADRANT_SEGMENTS);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
