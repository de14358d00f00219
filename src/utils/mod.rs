//! Utility modules shared by the area compiler.

pub mod date;
pub mod git;
pub mod hash;
pub mod ignore;
