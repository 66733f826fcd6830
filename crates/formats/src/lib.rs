pub mod boundaries;
pub mod indicators;
pub mod manifest;
pub mod observations;
pub mod package;

pub use boundaries::*;
pub use indicators::*;
pub use manifest::*;
pub use observations::*;
pub use package::*;
