//! Tests for the binding data model and builder.

use axon_domain::{Binding, Error, Request, ScopePolicy, ServiceId};

#[derive(Debug)]
struct Widget;

#[test]
fn test_builder_defaults() {
    let binding = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .build()
        .unwrap();

    assert_eq!(binding.service(), ServiceId::of::<Widget>());
    assert_eq!(*binding.scope(), ScopePolicy::Transient);
    assert!(!binding.is_conditional());
    assert!(!binding.is_open_target());
    assert!(!binding.is_implicit());
    assert!(binding.metadata().name().is_none());
}

#[test]
fn test_builder_without_provider_fails() {
    let err = Binding::builder(ServiceId::of::<Widget>()).build().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_empty_name_fails() {
    let err = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .named("")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_condition_drives_matches_and_conditional_flag() {
    let binding = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .when(|request| request.is_optional())
        .build()
        .unwrap();
    assert!(binding.is_conditional());

    let optional = Request::builder(ServiceId::of::<Widget>())
        .optional(true)
        .build();
    let required = Request::builder(ServiceId::of::<Widget>()).build();
    assert!(binding.matches(&optional));
    assert!(!binding.matches(&required));
}

#[test]
fn test_unconditional_binding_matches_everything() {
    let binding = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .build()
        .unwrap();
    let request = Request::builder(ServiceId::of::<Widget>()).build();
    assert!(binding.matches(&request));
}

#[test]
fn test_metadata_attributes() {
    let binding = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .named("primary")
        .with_attribute("tier", serde_json::json!("gold"))
        .build()
        .unwrap();

    let metadata = binding.metadata();
    assert_eq!(metadata.name(), Some("primary"));
    assert!(metadata.has("tier"));
    assert_eq!(metadata.get("tier"), Some(&serde_json::json!("gold")));
    assert!(!metadata.has("absent"));
}

#[test]
fn test_mark_implicit() {
    let mut binding = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .build()
        .unwrap();
    assert!(!binding.is_implicit());
    binding.mark_implicit();
    assert!(binding.is_implicit());
}

#[test]
fn test_binding_ids_are_distinct() {
    let a = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .build()
        .unwrap();
    let b = Binding::builder(ServiceId::of::<Widget>())
        .to_factory(|| Widget)
        .build()
        .unwrap();
    assert_ne!(a.id(), b.id());
}
