use proptest::prelude::*;
use strata_types::relation::is_same_type;
use strata_types::{
    is_assignable_subtype, is_cast_valid, is_implicit_cast_valid, least_common_ancestor,
    PrimitiveType, Type, TypeEnv,
};

use super::fixtures::Shapes;

const PROPTEST_CASES: u32 = 256;

/// Reference types available in [`Shapes`] plus the minimal JDK.
fn reference_pool(s: &Shapes) -> Vec<Type> {
    let wk = s.store.well_known();
    let mut pool: Vec<Type> = [
        wk.object,
        wk.string,
        wk.integer,
        wk.number,
        wk.throwable,
        wk.exception,
        wk.runtime_exception,
        wk.serializable,
        wk.cloneable,
        s.a,
        s.b,
        s.c,
        s.i,
    ]
    .into_iter()
    .map(Type::class)
    .collect();
    pool.push(Type::Null);
    pool
}

fn arb_primitive() -> impl Strategy<Value = PrimitiveType> {
    prop::sample::select(vec![
        PrimitiveType::Boolean,
        PrimitiveType::Void,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ])
}

fn arb_numeric() -> impl Strategy<Value = PrimitiveType> {
    prop::sample::select(PrimitiveType::NUMERIC.to_vec())
}

/// Index into [`reference_pool`] plus an array depth.
fn arb_reference() -> impl Strategy<Value = (usize, usize)> {
    (0usize..14, 0usize..3)
}

fn wrap(mut ty: Type, dims: usize) -> Type {
    for _ in 0..dims {
        ty = Type::array(ty);
    }
    ty
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn every_type_is_assignable_and_castable_to_itself(
        prim in arb_primitive(),
        (idx, dims) in arb_reference(),
    ) {
        let s = Shapes::new();
        let pool = reference_pool(&s);
        let reference = wrap(pool[idx].clone(), dims);
        for ty in [Type::Primitive(prim), reference] {
            prop_assert!(is_same_type(&ty, &ty));
            prop_assert!(is_assignable_subtype(&s.store, &ty, &ty).unwrap());
            prop_assert!(is_implicit_cast_valid(&s.store, &ty, &ty).unwrap());
            prop_assert!(is_cast_valid(&s.store, &ty, &ty).unwrap());
        }
    }

    #[test]
    fn conversions_are_monotone_on_the_numeric_ladder(p in arb_numeric(), q in arb_numeric()) {
        let s = Shapes::new();
        let rank = |x: PrimitiveType| x.numeric_rank().unwrap();
        let (from, to): (Type, Type) = (p.into(), q.into());
        let assignable = is_assignable_subtype(&s.store, &from, &to).unwrap();
        let implicit = is_implicit_cast_valid(&s.store, &from, &to).unwrap();
        prop_assert_eq!(assignable, rank(p) <= rank(q));
        prop_assert_eq!(implicit, rank(p) <= rank(q));
        if rank(p) < rank(q) {
            prop_assert!(!is_implicit_cast_valid(&s.store, &to, &from).unwrap());
        }
        // Numeric casts go both ways.
        prop_assert!(is_cast_valid(&s.store, &p.into(), &q.into()).unwrap());
        prop_assert!(is_cast_valid(&s.store, &q.into(), &p.into()).unwrap());
    }

    #[test]
    fn arrays_follow_their_elements(
        (x, dx) in arb_reference(),
        (y, dy) in arb_reference(),
        p in arb_numeric(),
        q in arb_numeric(),
    ) {
        let s = Shapes::new();
        let pool = reference_pool(&s);
        let (a, b) = (wrap(pool[x].clone(), dx), wrap(pool[y].clone(), dy));
        let elementwise = is_assignable_subtype(&s.store, &a, &b).unwrap();
        let arrays = is_assignable_subtype(&s.store, &Type::array(a), &Type::array(b)).unwrap();
        prop_assert_eq!(arrays, elementwise);

        let prim_arrays = is_assignable_subtype(
            &s.store,
            &Type::array(p.into()),
            &Type::array(q.into()),
        )
        .unwrap();
        prop_assert_eq!(prim_arrays, p == q);
    }

    #[test]
    fn null_flows_into_every_reference_type((idx, dims) in arb_reference()) {
        let s = Shapes::new();
        let pool = reference_pool(&s);
        let target = wrap(pool[idx].clone(), dims);
        prop_assert!(is_assignable_subtype(&s.store, &Type::Null, &target).unwrap());
        prop_assert!(is_cast_valid(&s.store, &Type::Null, &target).unwrap());
    }

    #[test]
    fn least_common_ancestor_bounds_both_arguments(
        (x, dx) in arb_reference(),
        (y, dy) in arb_reference(),
    ) {
        let s = Shapes::new();
        let pool = reference_pool(&s);
        let (a, b) = (wrap(pool[x].clone(), dx), wrap(pool[y].clone(), dy));
        if let Ok(lca) = least_common_ancestor(&s.store, &a, &b) {
            prop_assert!(is_assignable_subtype(&s.store, &a, &lca).unwrap(), "{a:?} vs {lca:?}");
            prop_assert!(is_assignable_subtype(&s.store, &b, &lca).unwrap(), "{b:?} vs {lca:?}");
        }
    }
}
