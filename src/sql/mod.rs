//! Safe SQL builder: identifiers from the introspected schema only, request
//! values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
