//! Registering new types on top of the standard ones

use nwbkit_entity::types::{register_standard_types, IMAGE_SERIES, TIME_SERIES};
use nwbkit_entity::{Constructor, EntityError};
use nwbkit_fields::{Args, DefinitionError, FieldSpec, RegistryBuilder, TypeDecl, TypeSpec};

#[test]
fn subtypes_cannot_shadow_inherited_fields() {
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder).unwrap();
    let err = builder
        .register(
            TypeDecl::new("Shadowing")
                .extends(TIME_SERIES)
                .field(FieldSpec::required("unit", [TypeSpec::Text], "unit again")),
        )
        .unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateFieldName { name, .. } if name == "unit"));
}

#[test]
fn standard_types_cannot_be_registered_twice() {
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder).unwrap();
    let err = register_standard_types(&mut builder).unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateType { name } if name == "NWBContainer"));
}

#[test]
fn forward_reference_to_a_later_type_resolves() {
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder).unwrap();
    builder
        .register(
            TypeDecl::new("ReferenceFrame")
                .extends(TIME_SERIES)
                .field(FieldSpec::required(
                    "calibration",
                    [TypeSpec::container("Calibration")],
                    "Calibration registered after this type",
                )),
        )
        .unwrap();
    builder
        .register(TypeDecl::new("Calibration").extends(IMAGE_SERIES))
        .unwrap();
    let registry = builder.build();
    let constructor = Constructor::with_defaults(&registry);

    let calibration = constructor
        .construct(
            "Calibration",
            Args::new()
                .with("name", "cal")
                .with("source", "bench")
                .with("data", vec![1.0])
                .with("unit", "px"),
        )
        .unwrap();
    let frame = constructor
        .construct(
            "ReferenceFrame",
            Args::new()
                .with("name", "frame")
                .with("source", "bench")
                .with("data", vec![1.0])
                .with("unit", "m")
                .with("calibration", nwbkit_fields::InstanceRef::to(&calibration)),
        )
        .unwrap();
    assert_eq!(frame.fields().get_ref("calibration").unwrap().name(), Some("cal"));
}

#[test]
fn unresolved_reference_fails_at_first_construction() {
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder).unwrap();
    builder
        .register(
            TypeDecl::new("Orphan")
                .extends(TIME_SERIES)
                .field(FieldSpec::optional(
                    "device",
                    [TypeSpec::container("Device")],
                    "never registered",
                    nwbkit_fields::DefaultValue::Unset,
                )),
        )
        .unwrap();
    let registry = builder.build();

    let err = Constructor::with_defaults(&registry)
        .construct("Orphan", Args::new())
        .unwrap_err();
    assert!(matches!(
        err,
        EntityError::Definition(DefinitionError::UnresolvedType { reference, .. }) if reference == "Device"
    ));
}
