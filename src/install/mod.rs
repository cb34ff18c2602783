pub mod error;
pub mod manifest;
pub mod paths;
pub mod probe;

pub use error::*;
pub use manifest::*;
pub use paths::*;
pub use probe::*;
