//! Request-side data types: the parameter model, field enums, and the typed
//! request shapes built on top of them.

pub mod enums;
pub mod params;
pub mod requests;

pub use enums::*;
pub use params::*;
pub use requests::*;
