use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_types::relation::type_var_bound;
use strata_types::{format_type, ClassId, Type, TypeEnv, TypeError, TypeVarId};

use crate::{Subst, GENERICS_TARGET};

/// Erasure of a type: type variables become the erasure of their bound, arrays erase their
/// element, everything else is unchanged.
pub fn erase_type(env: &dyn TypeEnv, ty: &Type) -> Result<Type, TypeError> {
    let mut current = ty.clone();
    let mut steps = 0;
    loop {
        match current {
            Type::TypeVar(var) => {
                steps += 1;
                if steps > env.max_hierarchy_depth() {
                    let name = format_type(env, ty);
                    tracing::warn!(target: GENERICS_TARGET, var = %name, "cyclic type variable bounds");
                    return Err(TypeError::CyclicInheritance { class: name });
                }
                current = type_var_bound(env, var)?;
            }
            Type::Array(elem) => return Ok(Type::array(erase_type(env, &elem)?)),
            other => return Ok(other),
        }
    }
}

/// Map every variable in `params` to its erasure.
pub fn erasure_subst(env: &dyn TypeEnv, params: &[TypeVarId]) -> Result<Subst, TypeError> {
    params
        .iter()
        .map(|&var| erase_type(env, &Type::TypeVar(var)).map(|erased| (var, erased)))
        .collect()
}

/// Per-class erasure substitutions, shared across resolver calls.
///
/// Entries are keyed by class id only, so one cache must serve a single environment.
#[derive(Debug, Default)]
pub struct ErasureCache {
    classes: RwLock<HashMap<ClassId, Arc<Subst>>>,
}

impl ErasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erasure substitution for the type parameters declared by `class`.
    pub fn class_erasure(&self, env: &dyn TypeEnv, class: ClassId) -> Result<Arc<Subst>, TypeError> {
        if let Some(hit) = self.classes.read().get(&class) {
            return Ok(Arc::clone(hit));
        }

        let def = env.class(class).ok_or_else(|| TypeError::UnresolvedClass {
            name: strata_types::format_class(env, class),
        })?;
        let subst = Arc::new(erasure_subst(env, &def.type_params)?);
        tracing::trace!(
            target: GENERICS_TARGET,
            class = %def.name,
            vars = subst.len(),
            "computed class erasure"
        );

        let mut classes = self.classes.write();
        Ok(Arc::clone(classes.entry(class).or_insert(subst)))
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    pub fn clear(&self) {
        self.classes.write().clear();
    }
}
