//! Helper functions used across the application.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`target_url`] - Redirect target validation

pub mod code_generator;
pub mod target_url;
