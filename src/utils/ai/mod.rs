//! AI-related utilities

pub mod tokens;

pub use tokens::TokenUtils;
