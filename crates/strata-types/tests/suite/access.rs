use strata_types::{
    is_accessible, is_enclosed, AccessContext, ClassBuilder, Flags, Type, TypeStore,
};

struct Packages {
    store: TypeStore,
    base: strata_types::ClassId,
    inner: strata_types::ClassId,
    neighbour: strata_types::ClassId,
    sub_elsewhere: strata_types::ClassId,
    stranger: strata_types::ClassId,
}

fn packages() -> Packages {
    let mut store = TypeStore::default();
    let base = store
        .add_class(ClassBuilder::class("p.Base").flags(Flags::PUBLIC))
        .expect("define Base");
    let inner = store
        .add_class(ClassBuilder::class("p.Base$Inner").nested_in(base))
        .expect("define Inner");
    let neighbour = store
        .add_class(ClassBuilder::class("p.Neighbour"))
        .expect("define Neighbour");
    let sub_elsewhere = store
        .add_class(ClassBuilder::class("q.Sub").extends(Type::class(base)))
        .expect("define Sub");
    let stranger = store
        .add_class(ClassBuilder::class("q.Stranger"))
        .expect("define Stranger");
    Packages {
        store,
        base,
        inner,
        neighbour,
        sub_elsewhere,
        stranger,
    }
}

#[test]
fn public_members_and_own_class_are_always_accessible() {
    let p = packages();
    let target = Type::class(p.base);
    let from_stranger = AccessContext::new(p.stranger);
    assert!(is_accessible(&p.store, &target, Flags::PUBLIC, &from_stranger).unwrap());
    assert!(!is_accessible(&p.store, &target, Flags::PRIVATE, &from_stranger).unwrap());

    let from_base = AccessContext::new(p.base);
    assert!(is_accessible(&p.store, &target, Flags::PRIVATE, &from_base).unwrap());
}

#[test]
fn nesting_grants_access_in_both_directions() {
    let p = packages();
    assert!(is_enclosed(&p.store, p.inner, p.base).unwrap());
    assert!(!is_enclosed(&p.store, p.base, p.inner).unwrap());

    let from_inner = AccessContext::for_class(&p.store, p.inner).expect("context");
    assert_eq!(from_inner.enclosing(), [p.base].as_slice());
    assert!(
        is_accessible(&p.store, &Type::class(p.base), Flags::PRIVATE, &from_inner).unwrap()
    );

    let from_base = AccessContext::new(p.base);
    assert!(
        is_accessible(&p.store, &Type::class(p.inner), Flags::PRIVATE, &from_base).unwrap()
    );
}

#[test]
fn package_access_requires_the_same_package() {
    let p = packages();
    let target = Type::class(p.base);
    let from_neighbour = AccessContext::new(p.neighbour);
    let from_stranger = AccessContext::new(p.stranger);
    assert!(is_accessible(&p.store, &target, Flags::NONE, &from_neighbour).unwrap());
    assert!(!is_accessible(&p.store, &target, Flags::NONE, &from_stranger).unwrap());
    assert!(
        !is_accessible(&p.store, &target, Flags::PROTECTED, &from_neighbour).unwrap(),
        "protected does not imply package access here"
    );
}

#[test]
fn unnamed_package_classes_share_package_access() {
    let mut store = TypeStore::default();
    let x = store.add_class(ClassBuilder::class("X")).expect("X");
    let y = store.add_class(ClassBuilder::class("Y")).expect("Y");
    assert!(is_accessible(&store, &Type::class(x), Flags::STATIC, &AccessContext::new(y)).unwrap());
}

#[test]
fn protected_access_requires_descent() {
    let p = packages();
    let target = Type::class(p.base);
    let from_sub = AccessContext::new(p.sub_elsewhere);
    let from_stranger = AccessContext::new(p.stranger);
    assert!(is_accessible(&p.store, &target, Flags::PROTECTED, &from_sub).unwrap());
    assert!(!is_accessible(&p.store, &target, Flags::PROTECTED, &from_stranger).unwrap());
    assert!(!is_accessible(&p.store, &target, Flags::NONE, &from_sub).unwrap());
}

#[test]
fn non_class_targets_only_pass_for_public_members() {
    let p = packages();
    let ctx = AccessContext::new(p.stranger);
    let array = Type::array(Type::int());
    assert!(is_accessible(&p.store, &array, Flags::PUBLIC, &ctx).unwrap());
    assert!(!is_accessible(&p.store, &array, Flags::NONE, &ctx).unwrap());
}

#[test]
fn explicit_enclosing_chain_is_honoured() {
    let p = packages();
    let ctx = AccessContext::new(p.stranger).with_enclosing(vec![p.base]);
    assert!(ctx.is_within(p.base));
    assert!(
        is_accessible(&p.store, &Type::class(p.base), Flags::PRIVATE, &ctx).unwrap()
    );
}
