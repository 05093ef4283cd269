//! Safe SQL builder: identifiers validated at config time and quoted, values as parameters.

mod builder;
pub use builder::*;
