use strata_types::relation::is_throwable;
use strata_types::{
    format_class, ClassId, GenericDeclViolation, Span, Type, TypeEnv, TypeError, TypeVarId,
};

use crate::GENERICS_TARGET;

fn illegal(reason: GenericDeclViolation, message: String, span: Option<Span>) -> TypeError {
    tracing::debug!(target: GENERICS_TARGET, ?reason, %message, "illegal generic declaration");
    TypeError::IllegalGenericDeclaration {
        reason,
        message,
        span,
    }
}

/// Reject a type-parameter list that declares the same name twice. The error is positioned at
/// the later declaration.
pub fn check_duplicate_type_vars(env: &dyn TypeEnv, params: &[TypeVarId]) -> Result<(), TypeError> {
    let defs = params
        .iter()
        .map(|&var| {
            env.type_param(var)
                .ok_or_else(|| TypeError::internal(format!("unknown type variable {var:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (i, first) in defs.iter().enumerate() {
        for later in &defs[i + 1..] {
            if first.name == later.name {
                return Err(illegal(
                    GenericDeclViolation::DuplicateTypeVariable,
                    format!("duplicate type variable declaration \"{}\"", later.name),
                    later.span,
                ));
            }
        }
    }
    Ok(())
}

/// Class-level generic declaration rules, checked in order:
///
/// 1. the superclass is not an enum,
/// 2. `java.lang.Object` declares no type parameters,
/// 3. a generic class does not extend `Throwable` or a subclass of it,
/// 4. type-parameter names are distinct.
pub fn check_class_declaration(
    env: &dyn TypeEnv,
    class: ClassId,
    super_class: Option<&Type>,
    type_params: &[TypeVarId],
    span: Option<Span>,
) -> Result<(), TypeError> {
    let super_id = match super_class {
        None => None,
        Some(Type::Class(id)) => Some(*id),
        Some(Type::Named(name)) => Some(env.find(name)?),
        Some(other) => {
            return Err(TypeError::internal(format!(
                "superclass of {} is not a class type: {other:?}",
                format_class(env, class)
            )))
        }
    };

    if let Some(super_id) = super_id {
        let super_def = env.class(super_id).ok_or_else(|| TypeError::UnresolvedClass {
            name: format_class(env, super_id),
        })?;
        if super_def.is_enum() {
            return Err(illegal(
                GenericDeclViolation::ExtendsEnum,
                format!("cannot extend enum type {}", super_def.name),
                span,
            ));
        }
    }

    if type_params.is_empty() {
        return Ok(());
    }

    if class == env.well_known().object {
        return Err(illegal(
            GenericDeclViolation::GenericObject,
            format!(
                "type {} cannot declare type variables",
                format_class(env, class)
            ),
            span,
        ));
    }

    if let Some(super_id) = super_id {
        if is_throwable(env, &Type::class(super_id))? {
            return Err(illegal(
                GenericDeclViolation::GenericThrowable,
                "cannot subclass java.lang.Throwable or any of its subtypes with a generic class"
                    .to_owned(),
                span,
            ));
        }
    }

    check_duplicate_type_vars(env, type_params)
}
