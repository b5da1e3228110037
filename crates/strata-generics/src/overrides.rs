use strata_types::relation::{has_same_arguments, is_unchecked_exception};
use strata_types::{
    descends_from, format_class, format_method, format_types, is_assignable_subtype,
    supertype_closure, MethodInstance, OverrideViolation, Type, TypeEnv, TypeError,
};

use crate::{Subst, GENERICS_TARGET};

/// `mj` with its type parameters renamed, position by position, to those of `mi`.
fn align(mi: &MethodInstance, mj: &MethodInstance) -> MethodInstance {
    if mj.type_params.is_empty() {
        return mj.clone();
    }
    Subst::positional(&mj.type_params, &mi.type_params).subst_method(mj)
}

/// Same name, same number of type parameters, and identical formals once `mj`'s type parameters
/// are renamed to `mi`'s.
pub fn are_override_equivalent(mi: &MethodInstance, mj: &MethodInstance) -> bool {
    mi.name == mj.name
        && mi.type_params.len() == mj.type_params.len()
        && has_same_arguments(mi, &align(mi, mj))
}

/// Primitive and `void` returns must match exactly; reference returns may be covariant.
pub fn are_return_type_substitutable(
    env: &dyn TypeEnv,
    mi_ret: &Type,
    mj_ret: &Type,
) -> Result<bool, TypeError> {
    if mi_ret.is_primitive() || mj_ret.is_primitive() {
        return Ok(mi_ret == mj_ret);
    }
    is_assignable_subtype(env, mi_ret, mj_ret)
}

/// Every checked exception `mi` throws is, or descends from, something `mj` throws.
pub fn throws_subset(
    env: &dyn TypeEnv,
    mi: &MethodInstance,
    mj: &MethodInstance,
) -> Result<bool, TypeError> {
    for thrown in &mi.throws {
        if is_unchecked_exception(env, thrown)? {
            continue;
        }
        let mut covered = false;
        for allowed in &mj.throws {
            if thrown == allowed || descends_from(env, thrown, allowed)? {
                covered = true;
                break;
            }
        }
        if !covered {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Check that `mi` may override `mj`.
///
/// Rules are applied in order: override-equivalent signatures, substitutable return type, throws
/// clause, access, static-ness, and `mj` not final. With `quiet` set a violation yields
/// `Ok(false)`; otherwise it is an [`TypeError::IllegalOverride`] positioned at `mi`.
pub fn can_override(
    env: &dyn TypeEnv,
    mi: &MethodInstance,
    mj: &MethodInstance,
    quiet: bool,
) -> Result<bool, TypeError> {
    let reject = |reason: OverrideViolation, detail: String| -> Result<bool, TypeError> {
        tracing::debug!(
            target: GENERICS_TARGET,
            method = %mi.name,
            class = %format_class(env, mi.container),
            ?reason,
            "override rejected"
        );
        if quiet {
            return Ok(false);
        }
        Err(TypeError::IllegalOverride {
            reason,
            message: format!(
                "{} in {} cannot override {} in {}; {detail}",
                format_method(env, mi),
                format_class(env, mi.container),
                format_method(env, mj),
                format_class(env, mj.container),
            ),
            span: mi.span,
        })
    };

    if !are_override_equivalent(mi, mj) {
        return reject(
            OverrideViolation::IncompatibleParameterTypes,
            "incompatible parameter types".to_owned(),
        );
    }

    let aligned = align(mi, mj);
    if !are_return_type_substitutable(env, &mi.return_type, &aligned.return_type)? {
        return reject(
            OverrideViolation::IncompatibleReturnType,
            format!(
                "attempting to use incompatible return type\nfound: {}\nrequired: {}",
                strata_types::format_type(env, &mi.return_type),
                strata_types::format_type(env, &aligned.return_type),
            ),
        );
    }

    if !throws_subset(env, mi, &aligned)? {
        return reject(
            OverrideViolation::ThrowsNotSubset,
            format!(
                "the throw set [{}] is not a subset of the overridden method's throw set [{}]",
                format_types(env, &mi.throws),
                format_types(env, &aligned.throws),
            ),
        );
    }

    if mi.flags.more_restrictive_than(mj.flags) {
        return reject(
            OverrideViolation::WeakerAccess,
            "attempting to assign weaker access privileges".to_owned(),
        );
    }

    if mi.is_static() != mj.is_static() {
        let detail = if mj.is_static() {
            "overridden method is static"
        } else {
            "overridden method is not static"
        };
        return reject(OverrideViolation::StaticMismatch, detail.to_owned());
    }

    if mi.id != mj.id && mj.is_final() {
        return reject(
            OverrideViolation::OverridesFinal,
            "overridden method is final".to_owned(),
        );
    }

    Ok(true)
}

/// Methods in proper supertypes of `mi`'s class (superclasses, then interfaces) that `mi`
/// overrides or implements.
pub fn overridden_methods(
    env: &dyn TypeEnv,
    mi: &MethodInstance,
) -> Result<Vec<MethodInstance>, TypeError> {
    let mut out = Vec::new();
    for class in supertype_closure(env, mi.container)?.into_iter().skip(1) {
        let Some(def) = env.class(class) else {
            return Err(TypeError::UnresolvedClass {
                name: format_class(env, class),
            });
        };
        for &id in &def.methods {
            let Some(mj) = env.method(id) else {
                continue;
            };
            if mj.id != mi.id && are_override_equivalent(mi, mj) {
                out.push(mj.clone());
            }
        }
    }
    Ok(out)
}
