//! Debug observer extension and its output plumbing.

pub mod debug;
pub mod sink;
pub mod style;
