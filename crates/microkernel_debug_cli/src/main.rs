//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive a scripted kernel lifecycle through an in-process latch registry.
//! - Print the resulting debug trace to stdout for quick local sanity checks.

use log::{error, info};
use microkernel_debug::{
    default_log_level, init_logging, CallSite, CallValue, DebugObserver, HookEvent,
    LatchRegistry, MethodRef, ModuleRef, ObjectValue, Transition,
};
use serde_json::json;
use std::process::ExitCode;

const LOG_LEVEL_ENV: &str = "MICROKERNEL_DEBUG_LOG_LEVEL";

/// Kernel states in ascending lifecycle order, with the method entering each.
const LIFECYCLE: &[(&str, &str, &str)] = &[
    ("dead", "booted", "boot"),
    ("booted", "latched", "latch"),
    ("latched", "configured", "configure"),
    ("configured", "prepared", "prepare"),
    ("prepared", "started", "start"),
];

/// Methods leaving each state, in descending lifecycle order.
const SHUTDOWN: &[(&str, &str, &str)] = &[
    ("started", "prepared", "stop"),
    ("prepared", "configured", "release"),
    ("configured", "latched", "reset"),
    ("latched", "booted", "unlatch"),
    ("booted", "dead", "shutdown"),
];

struct DemoModule {
    module: ModuleRef,
    methods: Vec<MethodRef>,
}

impl DemoModule {
    fn new(name: &str, methods: Vec<MethodRef>) -> Self {
        Self {
            module: ModuleRef::new(name),
            methods,
        }
    }

    fn method(&self, name: &str) -> Option<&MethodRef> {
        self.methods.iter().find(|method| method.name() == name)
    }
}

fn demo_modules() -> Vec<DemoModule> {
    vec![
        DemoModule::new(
            "config",
            vec![MethodRef::new("configure", |_| {
                CallValue::Object(ObjectValue::new(
                    "Settings",
                    json!({ "listen": "127.0.0.1:8080", "pool_size": 4 }),
                ))
            })],
        ),
        DemoModule::new(
            "database",
            vec![
                MethodRef::new("prepare", |_| CallValue::Bool(true)),
                MethodRef::new("release", |_| CallValue::Undefined),
            ],
        ),
        DemoModule::new(
            "http",
            vec![
                MethodRef::new("start", |_| CallValue::Number(8080.0)),
                MethodRef::new("stop", |_| CallValue::Null),
            ],
        ),
    ]
}

fn run_step(registry: &LatchRegistry, modules: &[&DemoModule], step: &(&str, &str, &str)) {
    let transition = Transition::new(step.0, step.1, step.2);
    registry.notify(&HookEvent::TransitBefore(&transition));

    for module in modules {
        let Some(method) = module.method(&transition.method) else {
            continue;
        };
        let site = CallSite::new(&module.module, method);
        let effective = registry.intercept(
            CallValue::Method(method.clone()),
            &HookEvent::CallBefore(&site),
        );
        let result = match effective.as_method() {
            Some(target) => target.invoke(&[]),
            None => effective,
        };
        registry.intercept(result, &HookEvent::CallAfter(&site));
    }

    registry.notify(&HookEvent::TransitAfter(&transition));
}

fn main() -> ExitCode {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    if let Err(err) = init_logging(&level, None) {
        eprintln!("microkernel_debug_cli: logging disabled: {err}");
    }

    let mut registry = LatchRegistry::new();
    let observer = DebugObserver::stdout();
    if let Err(err) = observer.attach(&mut registry) {
        error!("event=cli_attach module=cli status=error error={err}");
        eprintln!("microkernel_debug_cli: {err}");
        return ExitCode::FAILURE;
    }

    let modules = demo_modules();
    let order: Vec<String> = modules
        .iter()
        .map(|module| module.module.name().to_string())
        .collect();
    registry.notify(&HookEvent::ModuleOrder(&order));

    let ascending: Vec<&DemoModule> = modules.iter().collect();
    let descending: Vec<&DemoModule> = modules.iter().rev().collect();
    for step in LIFECYCLE {
        run_step(&registry, &ascending, step);
    }
    for step in SHUTDOWN {
        run_step(&registry, &descending, step);
    }

    info!(
        "event=cli_run module=cli status=ok version={}",
        microkernel_debug::extension_version()
    );
    ExitCode::SUCCESS
}
