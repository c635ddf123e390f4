//! Config composition: defaults, sources and precedence.

pub(crate) mod policy;
pub mod service;
