//! JVM vocabulary shared by the instruction IR and the class hierarchy
//!
//! Everything in here is independent of any particular hierarchy: names, descriptors, access
//! flags, opcodes, and the raw records exchanged with the bytecode front end.

mod access_flags;
mod descriptors;
mod errors;
mod names;
pub mod opcodes;
mod raw;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
pub use raw::*;
