//! Shared pieces of the `pocket` desktop demo and the headless screenshot
//! tool.

pub mod demo;
