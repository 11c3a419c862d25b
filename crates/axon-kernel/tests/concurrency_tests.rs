//! Concurrency tests: missing-binding race safety and resolution under
//! concurrent registry mutation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use axon_kernel::{
    Binding, Kernel, MissingBindingResolver, RegistrySnapshot, Request, ServiceId,
};

#[derive(Debug)]
struct Widget;

#[derive(Debug)]
struct Gadget;

/// Opt-in log capture, driven by `RUST_LOG`
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Self-binds the requested service, slowly, to widen the race window
struct SlowSelfBinder {
    invocations: Arc<AtomicUsize>,
}

impl MissingBindingResolver for SlowSelfBinder {
    fn resolve(&self, _registry: &dyn RegistrySnapshot, request: &Request) -> Vec<Binding> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        vec![Binding::builder(request.service())
            .to_factory(|| Widget)
            .build()
            .unwrap()]
    }
}

#[test]
fn test_concurrent_missing_binding_resolutions_register_exactly_one_binding() {
    init_logging();
    let invocations = Arc::new(AtomicUsize::new(0));
    let kernel = Arc::new(
        Kernel::builder()
            .missing_resolver(Arc::new(SlowSelfBinder {
                invocations: invocations.clone(),
            }))
            .build()
            .unwrap(),
    );
    let service = ServiceId::of::<Widget>();
    let barrier = Arc::new(Barrier::new(2));

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..2 {
            let kernel = kernel.clone();
            let barrier = barrier.clone();
            handles.push(scope.spawn(move || {
                barrier.wait();
                let request = Request::builder(service).unique(true).build();
                kernel
                    .resolve(request)
                    .and_then(|mut results| match results.next() {
                        Some(result) => result.map(|_| ()),
                        None => unreachable!("unique resolution yielded nothing"),
                    })
            }));
        }
        for handle in handles {
            // Both racers succeed, whichever registered the binding.
            handle.join().unwrap().unwrap();
        }
    });

    let registered = kernel.get_bindings(service);
    assert_eq!(registered.len(), 1);
    assert!(registered[0].is_implicit());
    // Both threads may have synthesized, but only one registration landed.
    assert!(invocations.load(Ordering::SeqCst) <= 2);
}

#[test]
fn test_resolutions_survive_concurrent_unrelated_mutation() {
    init_logging();
    let kernel = Arc::new(Kernel::builder().build().unwrap());
    kernel
        .add_binding(
            Binding::builder(ServiceId::of::<Widget>())
                .to_factory(|| Widget)
                .build()
                .unwrap(),
        )
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            let kernel = kernel.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    let instance = kernel.get::<Widget>().unwrap();
                    drop(instance);
                }
            });
        }

        let mutator = kernel.clone();
        scope.spawn(move || {
            for _ in 0..50 {
                let handle = mutator
                    .add_binding(
                        Binding::builder(ServiceId::of::<Gadget>())
                            .to_factory(|| Gadget)
                            .build()
                            .unwrap(),
                    )
                    .unwrap();
                mutator.remove_binding(&handle).unwrap();
            }
        });
    });

    assert_eq!(kernel.get_bindings(ServiceId::of::<Widget>()).len(), 1);
    assert!(kernel.get_bindings(ServiceId::of::<Gadget>()).is_empty());
}
