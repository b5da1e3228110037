use pretty_assertions::assert_eq;
use strata_types::{
    AccessContext, ClassBuilder, FieldDecl, Flags, MemberResolver, Type, TypeEnv, TypeError,
    TypeErrorKind, TypeStore,
};

#[test]
fn fields_are_found_up_the_superclass_chain() {
    let mut store = TypeStore::default();
    let base = store
        .add_class(
            ClassBuilder::class("p.Base")
                .field(FieldDecl::new("count", Type::int()).flags(Flags::PUBLIC)),
        )
        .expect("define Base");
    let sub = store
        .add_class(ClassBuilder::class("p.Sub").extends(Type::class(base)))
        .expect("define Sub");

    let resolver = MemberResolver::new(&store);
    let field = resolver
        .get_field(&Type::class(sub), "count", &AccessContext::new(sub))
        .expect("inherited field");
    assert_eq!(field.container, base);
    assert_eq!(field.ty, Type::int());
}

#[test]
fn an_inaccessible_match_masks_fields_further_up() {
    let mut store = TypeStore::default();
    let base = store
        .add_class(
            ClassBuilder::class("p.Base")
                .field(FieldDecl::new("value", Type::int()).flags(Flags::PUBLIC)),
        )
        .expect("define Base");
    let sub = store
        .add_class(
            ClassBuilder::class("p.Sub")
                .extends(Type::class(base))
                .field(FieldDecl::new("value", Type::long()).flags(Flags::PRIVATE)),
        )
        .expect("define Sub");
    let other = store
        .add_class(ClassBuilder::class("q.Other"))
        .expect("define Other");

    let resolver = MemberResolver::new(&store);
    let err = resolver
        .get_field(&Type::class(sub), "value", &AccessContext::new(other))
        .expect_err("private field hides the public one");
    assert_eq!(
        err,
        TypeError::InaccessibleField {
            name: "value".into(),
            container: "p.Sub".into(),
        }
    );
    assert_eq!(err.kind(), TypeErrorKind::InaccessibleMember);

    // From inside `Sub` the private field is the one found.
    let field = resolver
        .get_field(&Type::class(sub), "value", &AccessContext::new(sub))
        .expect("own field");
    assert_eq!(field.ty, Type::long());
}

#[test]
fn missing_fields_and_non_reference_receivers() {
    let store = TypeStore::default();
    let string = store.well_known().string;
    let integer = store.well_known().integer;
    let resolver = MemberResolver::new(&store);
    let ctx = AccessContext::new(string);

    let err = resolver
        .get_field(&Type::class(string), "nope", &ctx)
        .expect_err("no such field");
    assert_eq!(err.kind(), TypeErrorKind::MemberNotFound);
    assert_eq!(
        err.to_string(),
        "field \"nope\" not found in type \"java.lang.String\""
    );

    let err = resolver
        .get_field(&Type::int(), "length", &ctx)
        .expect_err("primitives have no fields");
    assert_eq!(err.kind(), TypeErrorKind::TypeMismatch);

    let field = resolver
        .get_field(&Type::class(integer), "MAX_VALUE", &ctx)
        .expect("public static field");
    assert!(field.flags.is_static());
}

#[test]
fn fields_on_unresolved_superclasses_fail() {
    let mut store = TypeStore::default();
    let sub = store
        .add_class(ClassBuilder::class("Sub").extends(Type::named("Missing")))
        .expect("define Sub");
    let err = MemberResolver::new(&store)
        .get_field(&Type::class(sub), "x", &AccessContext::new(sub))
        .expect_err("superclass cannot be resolved");
    assert_eq!(err.kind(), TypeErrorKind::UnresolvedClass);
}
