//! Source image loading
//!
//! This module provides:
//! - Decoding of the photo being annotated
//! - Scaling it once to the fixed surface size

pub mod image;
