pub mod features;
pub mod observations;
pub mod selection;

pub use features::*;
pub use observations::*;
pub use selection::*;
