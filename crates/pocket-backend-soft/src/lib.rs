//! Headless rendering for pocket.
//!
//! [`SoftBackend`] rasterizes every draw call into an in-memory RGBA
//! buffer. It backs the screenshot tool and any host that wants to copy
//! frames somewhere itself.

mod renderer;

pub use renderer::SoftBackend;
