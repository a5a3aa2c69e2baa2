//! Typed instruction IR and override group resolution for whole JVM class hierarchies
//!
//! A bytecode front end hands over class skeletons (names, ancestors, methods with raw
//! instruction records). The [`hierarchy::Hierarchy`] registers them, and resolving it:
//!
//!   * turns every method body into validated, typed [`insn::Instruction`]s
//!   * assigns every method to a [`hierarchy::FunctionGroupData`], the family of methods that
//!     override each other and so must be renamed together
//!
//! Resolved classes can be dumped back to raw records for a class writer.

pub mod hierarchy;
pub mod insn;
pub mod jvm;
pub mod util;
