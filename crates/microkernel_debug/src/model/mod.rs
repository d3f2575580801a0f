//! Ephemeral values handed to latches during one hook invocation.

pub mod event;
pub mod role;
pub mod value;
