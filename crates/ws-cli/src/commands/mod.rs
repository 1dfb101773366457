//! CLI command implementations

pub(crate) mod common;
pub(crate) mod diff;
pub(crate) mod kind;
pub(crate) mod merge;
