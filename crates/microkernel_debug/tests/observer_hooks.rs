use microkernel_debug::{
    CallSite, CallValue, DebugObserver, FixedRole, HookEvent, HookPoint, HookRegistry,
    HookRegistryError, Latch, LatchRegistry, MemorySink, MethodRef, ModuleRef, ObjectValue,
    ProcessRole, Styling, Transition,
};
use serde_json::json;
use std::sync::Arc;

fn attached(role: ProcessRole) -> (LatchRegistry, DebugObserver, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let observer =
        DebugObserver::new(sink.clone(), Arc::new(FixedRole(role))).with_styling(Styling::Plain);
    let mut registry = LatchRegistry::new();
    let latched = observer.attach(&mut registry).expect("observer attach");
    assert_eq!(latched, HookPoint::ALL.len());
    (registry, observer, sink)
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn attach_latches_every_hook_point_once() {
    let (mut registry, observer, _) = attached(ProcessRole::Coordinator);

    for point in HookPoint::ALL {
        assert!(registry.is_latched(point, observer.id()));
        assert_eq!(registry.latch_count(point), 1);
    }

    let again = observer.attach(&mut registry).expect("second attach");
    assert_eq!(again, 0);
    assert_eq!(registry.len(), HookPoint::ALL.len());
}

#[test]
fn module_order_prints_one_comma_joined_line() {
    let (registry, _, sink) = attached(ProcessRole::Coordinator);
    let order = names(&["a", "b", "c"]);

    let invoked = registry.notify(&HookEvent::ModuleOrder(&order));
    assert_eq!(invoked, 1);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("a, b, c"));
    assert_eq!(lines[0], "microkernel: DEBUG [MASTER]: module order: a, b, c");
}

#[test]
fn empty_module_order_still_prints_once() {
    let (registry, _, sink) = attached(ProcessRole::Coordinator);
    registry.notify(&HookEvent::ModuleOrder(&[]));
    assert_eq!(sink.lines(), vec!["microkernel: DEBUG [MASTER]: module order: "]);
}

#[test]
fn transitions_mention_each_part_once() {
    let (registry, _, sink) = attached(ProcessRole::Worker(4));
    let transition = Transition::new("latched", "configured", "configure");

    registry.notify(&HookEvent::TransitBefore(&transition));
    registry.notify(&HookEvent::TransitAfter(&transition));

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("state transition (before)"));
    assert!(lines[1].contains("state transition (after)"));
    for line in &lines {
        assert!(line.starts_with("microkernel: DEBUG [WORKER-4]: "));
        assert_eq!(line.matches("latched").count(), 1);
        assert_eq!(line.matches("-(configure)->").count(), 1);
        assert_eq!(line.matches("configured").count(), 1);
    }
    assert_eq!(transition, Transition::new("latched", "configured", "configure"));
}

#[test]
fn call_before_passes_method_through_the_chain() {
    let (registry, _, sink) = attached(ProcessRole::Unknown(321));
    let module = ModuleRef::new("http");
    let method = MethodRef::new("listen", |_| CallValue::from(true));
    let site = CallSite::new(&module, &method);

    let effective = registry.intercept(
        CallValue::Method(method.clone()),
        &HookEvent::CallBefore(&site),
    );
    let effective = effective.as_method().expect("method reference survives");
    assert!(effective.same_target(&method));
    assert_eq!(effective.invoke(&[]), CallValue::Bool(true));
    assert_eq!(
        sink.lines(),
        vec!["microkernel: DEBUG [321]: method call      (before): http::listen()"]
    );
}

#[test]
fn call_after_reports_primitive_and_object_types() {
    let (registry, _, sink) = attached(ProcessRole::Coordinator);
    let method = MethodRef::new("foo", |_| CallValue::Undefined);
    let site = CallSite::new(&ModuleRef::new("bar"), &method);

    let number = registry.intercept(CallValue::from(42_i64), &HookEvent::CallAfter(&site));
    assert_eq!(number, CallValue::Number(42.0));

    let object = CallValue::Object(ObjectValue::new("Session", json!({ "user": "ada" })));
    let returned = registry.intercept(object.clone(), &HookEvent::CallAfter(&site));
    assert_eq!(returned, object);

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("method call      (after):  bar::foo(): number"));
    assert!(lines[1].ends_with("bar::foo(): Session"));
}

#[test]
fn intercepting_hooks_return_any_value_unchanged() {
    let (registry, _, _) = attached(ProcessRole::Coordinator);
    let site = CallSite::new(
        &ModuleRef::new("cache"),
        &MethodRef::new("get", |_| CallValue::Null),
    );
    let values = [
        CallValue::Null,
        CallValue::Undefined,
        CallValue::from("text"),
        CallValue::from(false),
        CallValue::from(json!([1, 2, 3])),
    ];

    for value in values {
        let before = registry.intercept(value.clone(), &HookEvent::CallBefore(&site));
        let after = registry.intercept(value.clone(), &HookEvent::CallAfter(&site));
        assert_eq!(before, value);
        assert_eq!(after, value);
    }
}

#[test]
fn identical_invocations_print_identical_lines() {
    let (registry, _, sink) = attached(ProcessRole::Worker(1));
    let transition = Transition::new("prepared", "started", "start");

    registry.notify(&HookEvent::TransitAfter(&transition));
    registry.notify(&HookEvent::TransitAfter(&transition));

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}

#[test]
fn role_label_follows_role_source() {
    for (role, label) in [
        (ProcessRole::Coordinator, "[MASTER]"),
        (ProcessRole::Worker(9), "[WORKER-9]"),
        (ProcessRole::Unknown(5150), "[5150]"),
    ] {
        let (registry, _, sink) = attached(role);
        registry.notify(&HookEvent::ModuleOrder(&names(&["only"])));
        assert!(sink.lines()[0].contains(label), "missing {label}");
    }
}

#[test]
fn observer_coexists_with_other_subscribers() {
    let (mut registry, observer, sink) = attached(ProcessRole::Coordinator);
    registry
        .latch(
            HookPoint::CallAfter,
            microkernel_debug::SubscriberId::new(),
            Latch::intercept(|_, _| CallValue::from("replaced")),
        )
        .expect("second subscriber latch");

    let err = registry
        .latch(HookPoint::CallAfter, observer.id(), Latch::intercept(|value, _| value))
        .expect_err("observer id already latched");
    assert!(matches!(err, HookRegistryError::DuplicateLatch { .. }));

    let site = CallSite::new(
        &ModuleRef::new("m"),
        &MethodRef::new("f", |_| CallValue::Undefined),
    );
    let result = registry.intercept(CallValue::from(1_i64), &HookEvent::CallAfter(&site));
    assert_eq!(result, CallValue::from("replaced"));
    assert_eq!(sink.lines().len(), 1);
}
