//! Subtyping, assignability and conversion predicates.
//!
//! All predicates take canonical types: an argument that still contains a [`Type::Named`] is an
//! internal error. Hierarchy lookups that fail (an undefined class, a cyclic chain) surface as
//! [`TypeError`]s, except in [`descends_from`], which treats a cycle as "not found".

use std::collections::HashSet;

use crate::format::format_type;
use crate::hierarchy::{class_def, cyclic, interfaces_of, superclass_of};
use crate::{ClassId, MethodInstance, PrimitiveType, Type, TypeEnv, TypeError, TYPES_TARGET};

/// Structural identity.
pub fn is_same_type(a: &Type, b: &Type) -> bool {
    a == b
}

/// Whether `child` is a proper reference subtype of `ancestor`.
///
/// Never true for equal types or for non-reference types. `null` descends from every reference
/// type. Interfaces, arrays and type variables without a class bound descend from
/// `java.lang.Object`; arrays also descend from `Cloneable` and `Serializable`.
pub fn descends_from(env: &dyn TypeEnv, child: &Type, ancestor: &Type) -> Result<bool, TypeError> {
    child.ensure_canonical()?;
    ancestor.ensure_canonical()?;
    let mut visited = HashSet::new();
    descends_inner(env, child, ancestor, &mut visited, 0)
}

fn descends_inner(
    env: &dyn TypeEnv,
    child: &Type,
    ancestor: &Type,
    visited: &mut HashSet<Type>,
    depth: usize,
) -> Result<bool, TypeError> {
    if child == ancestor || !child.is_reference() || !ancestor.is_reference() {
        return Ok(false);
    }
    if !visited.insert(child.clone()) || depth > env.max_hierarchy_depth() {
        tracing::debug!(
            target: TYPES_TARGET,
            child = %format_type(env, child),
            "supertype walk revisited a type; treating as unrelated"
        );
        return Ok(false);
    }

    let wk = env.well_known();
    let object = Type::class(wk.object);
    let reaches = |sup: Type, visited: &mut HashSet<Type>| -> Result<bool, TypeError> {
        Ok(sup == *ancestor || descends_inner(env, &sup, ancestor, visited, depth + 1)?)
    };

    match child {
        Type::Null => Ok(true),
        Type::Array(_) => Ok(*ancestor == object
            || *ancestor == Type::class(wk.cloneable)
            || *ancestor == Type::class(wk.serializable)),
        Type::TypeVar(tv) => reaches(type_var_bound(env, *tv)?, visited),
        Type::Class(id) => {
            let def = class_def(env, *id)?;
            if def.is_interface() {
                if *ancestor == object {
                    return Ok(true);
                }
            } else if *id == wk.object {
                return Ok(false);
            } else if let Some(sup) = superclass_of(env, *id)? {
                if reaches(Type::class(sup), visited)? {
                    return Ok(true);
                }
            }
            for iface in interfaces_of(env, *id)? {
                if reaches(Type::class(iface), visited)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Type::Primitive(_) | Type::Package(_) | Type::Named(_) => Ok(false),
    }
}

/// Declared bound of a type variable.
pub fn type_var_bound(env: &dyn TypeEnv, tv: crate::TypeVarId) -> Result<Type, TypeError> {
    env.type_param(tv)
        .map(|param| param.upper_bound.clone())
        .ok_or_else(|| TypeError::internal(format!("unknown type variable {tv:?}")))
}

/// Follow type-variable bounds until a non-variable type is reached.
pub(crate) fn erase_type_var(env: &dyn TypeEnv, ty: &Type) -> Result<Type, TypeError> {
    let mut current = ty.clone();
    let mut steps = 0;
    while let Type::TypeVar(tv) = current {
        steps += 1;
        if steps > env.max_hierarchy_depth() {
            let name = format_type(env, ty);
            tracing::warn!(target: TYPES_TARGET, var = %name, "cyclic type variable bounds");
            return Err(TypeError::CyclicInheritance { class: name });
        }
        current = type_var_bound(env, tv)?;
    }
    Ok(current)
}

/// Whether a value of type `child` may be stored in a location of type `ancestor` without any
/// conversion other than primitive widening and reference subtyping.
pub fn is_assignable_subtype(
    env: &dyn TypeEnv,
    child: &Type,
    ancestor: &Type,
) -> Result<bool, TypeError> {
    child.ensure_canonical()?;
    ancestor.ensure_canonical()?;
    if child == ancestor {
        return Ok(true);
    }
    match (child, ancestor) {
        (Type::Primitive(c), Type::Primitive(a)) => Ok(is_primitive_widening(*c, *a)),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => Ok(false),
        (Type::Array(c), Type::Array(a)) => {
            if c.is_primitive() || a.is_primitive() {
                Ok(c == a)
            } else {
                is_assignable_subtype(env, c, a)
            }
        }
        (Type::Null, a) => Ok(a.is_reference()),
        (c, a) if !c.is_reference() || !a.is_reference() => Ok(false),
        _ => descends_from(env, child, ancestor),
    }
}

/// Strictly upward along the numeric ladder `byte < short < char < int < long < float < double`.
/// `boolean` and `void` widen to nothing.
fn is_primitive_widening(from: PrimitiveType, to: PrimitiveType) -> bool {
    match (from.numeric_rank(), to.numeric_rank()) {
        (Some(from), Some(to)) => from < to,
        _ => false,
    }
}

/// Conversions allowed in assignment and argument position without a cast.
///
/// Primitives widen up the numeric ladder only, so `byte` converts to `char` but `char` never
/// converts back to `short`.
pub fn is_implicit_cast_valid(env: &dyn TypeEnv, from: &Type, to: &Type) -> Result<bool, TypeError> {
    from.ensure_canonical()?;
    to.ensure_canonical()?;
    if from == to {
        return Ok(true);
    }
    match (from, to) {
        (Type::Primitive(f), Type::Primitive(t)) => Ok(is_primitive_widening(*f, *t)),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => Ok(false),
        _ => is_assignable_subtype(env, from, to),
    }
}

/// Whether an explicit `(to) from` cast is legal.
pub fn is_cast_valid(env: &dyn TypeEnv, from: &Type, to: &Type) -> Result<bool, TypeError> {
    from.ensure_canonical()?;
    to.ensure_canonical()?;
    if from == to {
        return Ok(true);
    }
    match (from, to) {
        (Type::Primitive(f), Type::Primitive(t)) => Ok(f.is_numeric() && t.is_numeric()),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => Ok(false),
        (Type::Null, t) => Ok(t.is_reference()),
        (_, Type::Null) => Ok(false),
        (Type::TypeVar(_), _) | (_, Type::TypeVar(_)) => {
            let from = erase_type_var(env, from)?;
            let to = erase_type_var(env, to)?;
            is_cast_valid(env, &from, &to)
        }
        (Type::Array(f), Type::Array(t)) => {
            if f.is_primitive() || t.is_primitive() {
                Ok(f == t)
            } else {
                is_cast_valid(env, f, t)
            }
        }
        (Type::Array(_), _) => descends_from(env, from, to),
        (_, Type::Array(_)) => descends_from(env, to, from),
        (Type::Class(f), Type::Class(t)) => class_cast_valid(env, *f, *t),
        _ => Ok(false),
    }
}

fn class_cast_valid(env: &dyn TypeEnv, from: ClassId, to: ClassId) -> Result<bool, TypeError> {
    let from_def = class_def(env, from)?;
    let to_def = class_def(env, to)?;
    let from_ty = Type::class(from);
    let to_ty = Type::class(to);

    match (from_def.is_interface(), to_def.is_interface()) {
        (false, false) => Ok(descends_from(env, &from_ty, &to_ty)?
            || descends_from(env, &to_ty, &from_ty)?),
        (false, true) if from_def.is_final() => descends_from(env, &from_ty, &to_ty),
        (false, true) => Ok(true),
        (true, false) if to_def.is_final() => descends_from(env, &to_ty, &from_ty),
        (true, _) => Ok(true),
    }
}

/// Smallest common supertype of `t1` and `t2`.
///
/// Numeric primitives meet at the higher ladder position, arrays element-wise, `null` at the other
/// reference type. Otherwise the superclass chain of `t1` is walked outward until it reaches a
/// type `t2` is assignable to. Incompatible pairs are a [`TypeError::TypeMismatch`].
pub fn least_common_ancestor(env: &dyn TypeEnv, t1: &Type, t2: &Type) -> Result<Type, TypeError> {
    t1.ensure_canonical()?;
    t2.ensure_canonical()?;
    let mismatch = || {
        TypeError::mismatch(format!(
            "no least common ancestor found for types \"{}\" and \"{}\"",
            format_type(env, t1),
            format_type(env, t2)
        ))
    };

    match (t1, t2) {
        (Type::Primitive(a), Type::Primitive(b)) => {
            if a == b {
                return Ok(t1.clone());
            }
            match (a.numeric_rank(), b.numeric_rank()) {
                (Some(ra), Some(rb)) => PrimitiveType::from_numeric_rank(ra.max(rb))
                    .map(Type::Primitive)
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            }
        }
        (Type::Array(a), Type::Array(b)) => Ok(Type::array(least_common_ancestor(env, a, b)?)),
        (r, Type::Null) | (Type::Null, r) if r.is_reference() => Ok(r.clone()),
        (a, b) if !a.is_reference() || !b.is_reference() => Err(mismatch()),
        _ => {
            let mut seen = HashSet::new();
            let mut candidate = Some(t1.clone());
            while let Some(current) = candidate {
                if *t2 == current || descends_from(env, t2, &current)? {
                    return Ok(current);
                }
                if !seen.insert(current.clone()) || seen.len() > env.max_hierarchy_depth() {
                    return Err(match current {
                        Type::Class(id) => cyclic(env, id),
                        _ => mismatch(),
                    });
                }
                candidate = lca_parent(env, &current)?;
            }
            Err(mismatch())
        }
    }
}

fn lca_parent(env: &dyn TypeEnv, ty: &Type) -> Result<Option<Type>, TypeError> {
    let object = Type::class(env.well_known().object);
    Ok(match ty {
        Type::Class(id) if *id == env.well_known().object => None,
        Type::Class(id) => {
            if class_def(env, *id)?.is_interface() {
                Some(object)
            } else {
                superclass_of(env, *id)?.map(Type::class)
            }
        }
        Type::TypeVar(tv) => Some(type_var_bound(env, *tv)?),
        Type::Array(_) => Some(object),
        _ => None,
    })
}

/// `java.lang.Throwable` or a subtype of it.
pub fn is_throwable(env: &dyn TypeEnv, ty: &Type) -> Result<bool, TypeError> {
    let throwable = Type::class(env.well_known().throwable);
    Ok(*ty == throwable || descends_from(env, ty, &throwable)?)
}

/// `RuntimeException`, `Error`, or one of their subtypes.
pub fn is_unchecked_exception(env: &dyn TypeEnv, ty: &Type) -> Result<bool, TypeError> {
    let wk = env.well_known();
    for root in [wk.runtime_exception, wk.error] {
        let root = Type::class(root);
        if *ty == root || descends_from(env, ty, &root)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether the integer constant `value` fits in `ty` without loss.
pub fn numeric_conversion_valid(ty: &Type, value: i64) -> bool {
    match ty.as_primitive() {
        Some(PrimitiveType::Long) => true,
        Some(PrimitiveType::Int) => i32::try_from(value).is_ok(),
        Some(PrimitiveType::Char) => u16::try_from(value).is_ok(),
        Some(PrimitiveType::Short) => i16::try_from(value).is_ok(),
        Some(PrimitiveType::Byte) => i8::try_from(value).is_ok(),
        _ => false,
    }
}

/// Add `dims` array dimensions to `ty`, or strip `-dims` of them when `dims` is negative.
pub fn extend_array_dims(env: &dyn TypeEnv, ty: &Type, dims: isize) -> Result<Type, TypeError> {
    ty.ensure_canonical()?;
    if dims > 0 && matches!(ty, Type::Primitive(PrimitiveType::Void) | Type::Null | Type::Package(_))
    {
        return Err(TypeError::mismatch(format!(
            "cannot create an array of \"{}\"",
            format_type(env, ty)
        )));
    }

    let mut out = ty.clone();
    for _ in 0..dims.unsigned_abs() {
        out = if dims > 0 {
            Type::array(out)
        } else {
            match out {
                Type::Array(elem) => *elem,
                other => {
                    return Err(TypeError::internal(format!(
                        "cannot strip dimensions of non-array type {}",
                        format_type(env, &other)
                    )))
                }
            }
        };
    }
    Ok(out)
}

/// Identical formal parameter lists.
pub fn has_same_arguments(m1: &MethodInstance, m2: &MethodInstance) -> bool {
    m1.params == m2.params
}
