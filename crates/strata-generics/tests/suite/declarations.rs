use pretty_assertions::assert_eq;
use strata_generics::{check_class_declaration, declare_class, TypeParamDecl};
use strata_types::{
    ClassBuilder, FieldDecl, Flags, GenericDeclViolation, MethodDecl, OverrideViolation, Span,
    Type, TypeEnv, TypeError, TypeStore, TypeVarOwner,
};

fn generic_violation(err: TypeError) -> (GenericDeclViolation, String, Option<Span>) {
    match err {
        TypeError::IllegalGenericDeclaration {
            reason,
            message,
            span,
        } => (reason, message, span),
        other => panic!("expected an illegal generic declaration, got {other:?}"),
    }
}

#[test]
fn duplicate_type_variables_point_at_the_later_declaration() {
    let mut store = TypeStore::default();
    let declared = declare_class(
        &mut store,
        ClassBuilder::class("Pair"),
        vec![
            TypeParamDecl::new("T").span(Span::new(11, 12)),
            TypeParamDecl::new("T").span(Span::new(14, 15)),
        ],
    );
    let err = declared
        .attach(&mut store, None, vec![])
        .expect_err("T is declared twice");
    let (reason, message, span) = generic_violation(err);
    assert_eq!(reason, GenericDeclViolation::DuplicateTypeVariable);
    assert_eq!(message, "duplicate type variable declaration \"T\"");
    assert_eq!(span, Some(Span::new(14, 15)));
}

#[test]
fn duplicate_method_type_variables_are_rejected_before_freezing() {
    let mut store = TypeStore::default();
    let attached = declare_class(&mut store, ClassBuilder::class("Util"), vec![])
        .attach(&mut store, None, vec![])
        .expect("attach");
    let first = attached.method_type_param(&mut store, TypeParamDecl::new("A"));
    let second = attached.method_type_param(
        &mut store,
        TypeParamDecl::new("A").span(Span::new(30, 31)),
    );
    let id = attached.id();
    let err = attached
        .method(MethodDecl::new("pick", Type::void()).type_params(vec![first, second]))
        .build_members()
        .check(&mut store)
        .expect_err("A is declared twice");
    assert_eq!(generic_violation(err).2, Some(Span::new(30, 31)));
    assert!(!store.is_defined(id));
}

#[test]
fn enums_cannot_be_extended() {
    let mut store = TypeStore::default();
    let color = store
        .add_class(ClassBuilder::class("Color").flags(Flags::FINAL | Flags::ENUM))
        .expect("define Color");
    let err = declare_class(
        &mut store,
        ClassBuilder::class("Shade").span(Span::new(0, 20)),
        vec![],
    )
    .attach(&mut store, Some(Type::class(color)), vec![])
    .expect_err("Color is an enum");
    let (reason, message, span) = generic_violation(err);
    assert_eq!(reason, GenericDeclViolation::ExtendsEnum);
    assert_eq!(message, "cannot extend enum type Color");
    assert_eq!(span, Some(Span::new(0, 20)));
}

#[test]
fn object_cannot_declare_type_variables() {
    let mut store = TypeStore::default();
    let object = store.well_known().object;
    let err = check_object(&mut store);
    let (reason, message, _) = generic_violation(err);
    assert_eq!(reason, GenericDeclViolation::GenericObject);
    assert_eq!(message, "type java.lang.Object cannot declare type variables");
    assert!(store.is_defined(object));
}

fn check_object(store: &mut TypeStore) -> TypeError {
    let t = store.add_type_param("T", None, None);
    let object = store.well_known().object;
    check_class_declaration(&*store, object, None, &[t], None)
        .expect_err("Object is not generic")
}

#[test]
fn throwables_cannot_be_generic() {
    let mut store = TypeStore::default();
    let runtime = Type::class(store.well_known().runtime_exception);
    let err = declare_class(
        &mut store,
        ClassBuilder::class("Failure"),
        vec![TypeParamDecl::new("T")],
    )
    .attach(&mut store, Some(runtime.clone()), vec![])
    .expect_err("generic exception");
    assert_eq!(
        generic_violation(err).1,
        "cannot subclass java.lang.Throwable or any of its subtypes with a generic class"
    );

    let plain = declare_class(&mut store, ClassBuilder::class("Plain"), vec![])
        .attach(&mut store, Some(runtime), vec![]);
    assert!(plain.is_ok());
}

#[test]
fn a_superclass_set_on_the_builder_is_checked() {
    let mut store = TypeStore::default();
    let runtime = Type::class(store.well_known().runtime_exception);
    let declared = declare_class(
        &mut store,
        ClassBuilder::class("Failure").extends(runtime),
        vec![TypeParamDecl::new("T")],
    );
    let t = declared.type_params()[0];
    let err = declared
        .attach(&mut store, None, vec![])
        .expect_err("generic exception through the builder");
    assert_eq!(generic_violation(err).0, GenericDeclViolation::GenericThrowable);
    assert_eq!(store.type_param(t).and_then(|param| param.owner), None);

    let color = store
        .add_class(ClassBuilder::class("Color").flags(Flags::FINAL | Flags::ENUM))
        .expect("define Color");
    let err = declare_class(
        &mut store,
        ClassBuilder::class("Shade").extends(Type::class(color)),
        vec![],
    )
    .attach(&mut store, None, vec![])
    .expect_err("Color is an enum");
    assert_eq!(generic_violation(err).0, GenericDeclViolation::ExtendsEnum);
}

#[test]
fn a_rejected_declaration_leaves_its_type_variables_unbound() {
    let mut store = TypeStore::default();
    let declared = declare_class(
        &mut store,
        ClassBuilder::class("Pair"),
        vec![TypeParamDecl::new("K"), TypeParamDecl::new("K")],
    );
    let params = declared.type_params().to_vec();
    declared
        .attach(&mut store, None, vec![])
        .expect_err("K is declared twice");
    for var in params {
        assert_eq!(store.type_param(var).and_then(|param| param.owner), None);
    }
}

#[test]
fn forward_superclass_names_are_resolved() {
    let mut store = TypeStore::default();
    let err = declare_class(&mut store, ClassBuilder::class("Late"), vec![])
        .attach(&mut store, Some(Type::named("Missing")), vec![])
        .expect_err("Missing is never declared");
    assert_eq!(
        err,
        TypeError::UnresolvedClass {
            name: "Missing".to_owned()
        }
    );
}

#[test]
fn a_well_formed_generic_class_passes_every_check() {
    let mut store = TypeStore::default();
    let number = Type::class(store.well_known().number);
    let object = Type::class(store.well_known().object);
    let serializable = Type::class(store.well_known().serializable);

    let declared = declare_class(
        &mut store,
        ClassBuilder::class("util.Cell").flags(Flags::PUBLIC),
        vec![TypeParamDecl::new("T").bound(number)],
    );
    let t = declared.type_params()[0];
    let attached = declared
        .attach(&mut store, None, vec![serializable])
        .expect("attach Cell");
    let u = attached.method_type_param(&mut store, TypeParamDecl::new("U"));
    let cell = attached.id();
    let checked = attached
        .field(FieldDecl::new("value", Type::TypeVar(t)).flags(Flags::PRIVATE))
        .method(
            MethodDecl::new("map", Type::TypeVar(u))
                .flags(Flags::PUBLIC)
                .param(object)
                .type_params(vec![u]),
        )
        .build_members()
        .check(&mut store)
        .expect("Cell is well formed");

    let def = store.class(checked.id()).expect("Cell is defined");
    assert_eq!(def.type_params, vec![t]);
    assert_eq!(def.field("value").map(|field| &field.ty), Some(&Type::TypeVar(t)));
    let map = store.methods_of(cell).next().expect("Cell.map");
    assert_eq!(
        store.type_param(u).and_then(|param| param.owner),
        Some(TypeVarOwner::Method(map.id))
    );
}

#[test]
fn the_checked_pass_rejects_illegal_overrides() {
    let mut store = TypeStore::default();
    let err = declare_class(&mut store, ClassBuilder::class("Shouty"), vec![])
        .attach(&mut store, None, vec![])
        .expect("attach")
        .method(
            MethodDecl::new("hashCode", Type::long())
                .flags(Flags::PUBLIC)
                .span(Span::new(5, 9)),
        )
        .build_members()
        .check(&mut store)
        .expect_err("long hashCode()");
    assert_eq!(err.span(), Some(Span::new(5, 9)));
    assert!(matches!(
        err,
        TypeError::IllegalOverride {
            reason: OverrideViolation::IncompatibleReturnType,
            ..
        }
    ));
}
