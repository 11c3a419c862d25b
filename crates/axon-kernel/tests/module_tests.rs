//! Tests for the module registry's two-phase load lifecycle.

use std::sync::{Arc, Mutex};

use axon_kernel::{Binding, BindingHost, Error, Kernel, Module, Result, ServiceId};

#[derive(Debug)]
struct Widget;

type EventLog = Arc<Mutex<Vec<String>>>;

struct RecordingModule {
    name: String,
    events: EventLog,
    requires: Option<String>,
}

impl RecordingModule {
    fn boxed(name: &str, events: &EventLog) -> Box<dyn Module> {
        Box::new(Self {
            name: name.to_owned(),
            events: events.clone(),
            requires: None,
        })
    }

    fn boxed_requiring(name: &str, requires: &str, events: &EventLog) -> Box<dyn Module> {
        Box::new(Self {
            name: name.to_owned(),
            events: events.clone(),
            requires: Some(requires.to_owned()),
        })
    }

    fn record(&self, phase: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{phase}:{}", self.name));
    }
}

impl Module for RecordingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_load(&mut self, host: &dyn BindingHost) -> Result<()> {
        self.record("load");
        host.add_binding(
            Binding::builder(ServiceId::of::<Widget>())
                .to_factory(|| Widget)
                .named(self.name.clone())
                .build()?,
        )?;
        Ok(())
    }

    fn on_verify_required_modules(&self, host: &dyn BindingHost) -> Result<()> {
        self.record("verify");
        if let Some(required) = &self.requires {
            if !host.has_module(required) {
                return Err(Error::configuration(format!(
                    "module \"{}\" requires module \"{required}\"",
                    self.name
                )));
            }
        }
        Ok(())
    }

    fn on_unload(&mut self, host: &dyn BindingHost) -> Result<()> {
        self.record("unload");
        host.unbind(ServiceId::of::<Widget>());
        Ok(())
    }
}

fn kernel() -> Kernel {
    Kernel::builder().build().unwrap()
}

#[test]
fn test_all_loads_complete_before_any_verify() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    kernel
        .load(vec![
            RecordingModule::boxed("alpha", &events),
            RecordingModule::boxed_requiring("beta", "alpha", &events),
        ])
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec!["load:alpha", "load:beta", "verify:alpha", "verify:beta"]
    );
}

#[test]
fn test_sibling_module_visible_during_verify() {
    // beta requires alpha from the same batch; verification runs only after
    // both on_load phases, so the requirement is satisfied.
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    kernel
        .load(vec![
            RecordingModule::boxed_requiring("beta", "alpha", &events),
            RecordingModule::boxed("alpha", &events),
        ])
        .unwrap();
    assert!(kernel.has_module("alpha"));
    assert!(kernel.has_module("beta"));
}

#[test]
fn test_missing_requirement_fails_verification() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let err = kernel
        .load(vec![RecordingModule::boxed_requiring(
            "beta", "gamma", &events,
        )])
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_duplicate_name_across_batches_is_rejected() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    kernel
        .load(vec![RecordingModule::boxed("core", &events)])
        .unwrap();

    let err = kernel
        .load(vec![RecordingModule::boxed("core", &events)])
        .unwrap_err();
    match err {
        Error::Configuration { message } => assert!(message.contains("core")),
        other => panic!("expected configuration error, got {other}"),
    }
}

#[test]
fn test_duplicate_name_within_batch_is_rejected() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let err = kernel
        .load(vec![
            RecordingModule::boxed("core", &events),
            RecordingModule::boxed("core", &events),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_empty_module_name_is_rejected() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let err = kernel
        .load(vec![RecordingModule::boxed("", &events)])
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    // The load phase never ran.
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_unload_runs_hook_and_forgets_the_module() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    kernel
        .load(vec![RecordingModule::boxed("core", &events)])
        .unwrap();
    assert!(kernel.has_module("core"));

    kernel.unload("core").unwrap();
    assert!(!kernel.has_module("core"));
    assert!(events.lock().unwrap().contains(&"unload:core".to_owned()));
    // The module's bindings were dropped by its unload hook.
    assert!(kernel.get_bindings(ServiceId::of::<Widget>()).is_empty());
}

#[test]
fn test_module_still_loaded_during_its_unload_hook() {
    struct SelfCheckingModule {
        visible_during_unload: Arc<Mutex<Option<bool>>>,
    }
    impl Module for SelfCheckingModule {
        fn name(&self) -> &str {
            "core"
        }
        fn on_load(&mut self, _host: &dyn BindingHost) -> Result<()> {
            Ok(())
        }
        fn on_unload(&mut self, host: &dyn BindingHost) -> Result<()> {
            *self.visible_during_unload.lock().unwrap() = Some(host.has_module("core"));
            Ok(())
        }
    }

    let kernel = kernel();
    let visible = Arc::new(Mutex::new(None));
    kernel
        .load(vec![Box::new(SelfCheckingModule {
            visible_during_unload: visible.clone(),
        })])
        .unwrap();

    kernel.unload("core").unwrap();
    // The hook ran before the module left the loaded set.
    assert_eq!(*visible.lock().unwrap(), Some(true));
    assert!(!kernel.has_module("core"));
}

#[test]
fn test_unload_unknown_module_is_rejected() {
    let kernel = kernel();
    let err = kernel.unload("phantom").unwrap_err();
    match err {
        Error::Configuration { message } => assert!(message.contains("phantom")),
        other => panic!("expected configuration error, got {other}"),
    }
}

#[test]
fn test_get_modules_preserves_load_order() {
    let kernel = kernel();
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    kernel
        .load(vec![
            RecordingModule::boxed("zeta", &events),
            RecordingModule::boxed("alpha", &events),
        ])
        .unwrap();
    assert_eq!(kernel.get_modules(), vec!["zeta", "alpha"]);
}

#[test]
fn test_builder_loads_queued_modules() {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let kernel = Kernel::builder()
        .module(RecordingModule::boxed("core", &events))
        .build()
        .unwrap();
    assert!(kernel.has_module("core"));
    assert!(kernel.can_resolve(
        &axon_kernel::Request::builder(ServiceId::of::<Widget>()).build()
    ));
}
