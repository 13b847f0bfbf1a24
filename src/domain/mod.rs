pub mod forecast;
pub mod location;
pub mod solar;
pub mod types;
pub mod water;

pub use forecast::*;
pub use location::*;
pub use solar::*;
pub use types::*;
pub use water::*;
