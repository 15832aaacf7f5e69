//! Foundation types and traits for pocket.
//!
//! This crate holds the platform-agnostic pieces every other pocket crate
//! shares: colors, the button mask and pad snapshot, the render and pad
//! backend traits, the stock bitmap font, configuration and error types.

pub mod backend;
pub mod bitmap_font;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
