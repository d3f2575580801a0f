//! Debug tracing extension for microkernel hosts.
//! Latches onto lifecycle hooks and prints one trace line per event.

pub mod extension;
pub mod logging;
pub mod model;
pub mod observer;

pub use extension::hook::{
    parse_hook_point, supported_hook_point_strings, HookKind, HookPoint, HookPointError,
};
pub use extension::kernel::{HookRegistry, HookRegistryError, Latch, LatchRegistry, SubscriberId};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::event::{CallSite, HookEvent, Transition};
pub use model::role::{detect_role, EnvRoleSource, FixedRole, ProcessRole, RoleSource};
pub use model::value::{CallValue, MethodRef, ModuleRef, ObjectValue};
pub use observer::debug::DebugObserver;
pub use observer::sink::{MemorySink, StdoutSink, TraceSink};
pub use observer::style::Styling;

/// Returns the extension crate version.
pub fn extension_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::extension_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!extension_version().is_empty());
    }
}
