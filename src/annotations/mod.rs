//! Pointer gesture interpretation
//!
//! This module provides:
//! - The gesture state machine driven by press/drag/release
//! - Text prompt handling for the text tool

pub mod handlers;
