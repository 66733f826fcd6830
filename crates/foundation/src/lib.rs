pub mod bounds;
pub mod format;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use format::*;
