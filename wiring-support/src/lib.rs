//! # Wiring Support
//!
//! Shared utilities for the Wiring DI framework.
//!
//! This crate provides:
//! - Text rendering for error messages and cycle reports
//! - Type name shortening and "did you mean?" suggestions

pub mod rendering;
