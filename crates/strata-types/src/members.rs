use crate::access::{is_accessible, is_enclosed, AccessContext};
use crate::format::{format_class, format_method, format_type, format_types};
use crate::hierarchy::{superclass_chain, supertype_closure};
use crate::relation::{descends_from, erase_type_var, is_implicit_cast_valid};
use crate::{
    ClassId, FieldInstance, MethodInstance, Type, TypeEnv, TypeError, TYPES_TARGET,
};

/// A method invocation site: receiver type, method name and actual argument types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCall {
    pub receiver: Type,
    pub name: String,
    pub args: Vec<Type>,
}

impl MethodCall {
    pub fn new(receiver: Type, name: impl Into<String>, args: Vec<Type>) -> Self {
        Self {
            receiver,
            name: name.into(),
            args,
        }
    }
}

/// Decides whether a method can be invoked with a list of actual argument types.
///
/// Language extensions wrap [`StandardCallValidity`] to widen what counts as applicable.
pub trait CallValidity {
    fn call_valid(
        &self,
        env: &dyn TypeEnv,
        method: &MethodInstance,
        args: &[Type],
    ) -> Result<bool, TypeError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCallValidity;

impl CallValidity for StandardCallValidity {
    fn call_valid(
        &self,
        env: &dyn TypeEnv,
        method: &MethodInstance,
        args: &[Type],
    ) -> Result<bool, TypeError> {
        method_call_valid(env, method, args)
    }
}

/// Arity and per-argument implicit-conversion check, with variable-arity support.
///
/// For a variable-arity method with `n` formals, at least `n - 1` arguments are required. Each
/// argument in the trailing position is matched against the vararg element type; when exactly `n`
/// arguments are passed, the last one may instead match the array formal itself.
pub fn method_call_valid(
    env: &dyn TypeEnv,
    method: &MethodInstance,
    args: &[Type],
) -> Result<bool, TypeError> {
    let formals = &method.params;
    let n = formals.len();

    let vararg_elem = if method.is_varargs() {
        match formals.last() {
            Some(Type::Array(elem)) => Some(elem.as_ref()),
            _ => {
                return Err(TypeError::internal(format!(
                    "variable-arity method {} has no trailing array parameter",
                    method.name
                )))
            }
        }
    } else {
        None
    };

    match vararg_elem {
        None if args.len() != n => return Ok(false),
        Some(_) if args.len() + 1 < n => return Ok(false),
        _ => {}
    }

    for (idx, actual) in args.iter().enumerate() {
        let formal = match vararg_elem {
            Some(elem) if idx + 1 >= n => elem,
            _ => &formals[idx],
        };
        if is_implicit_cast_valid(env, actual, formal)? {
            continue;
        }
        // `m(String...)` called with a `String[]`.
        if vararg_elem.is_some()
            && args.len() == n
            && idx + 1 == n
            && is_implicit_cast_valid(env, actual, &formals[idx])?
        {
            continue;
        }
        return Ok(false);
    }
    Ok(true)
}

/// Field lookup and overload resolution against a [`TypeEnv`].
///
/// The applicability test is pluggable so that extensions (erasure-aware calls, for instance) can
/// reuse the lookup and most-specific selection unchanged.
pub struct MemberResolver<'env, V = StandardCallValidity> {
    env: &'env dyn TypeEnv,
    calls: V,
}

impl<'env> MemberResolver<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self {
            env,
            calls: StandardCallValidity,
        }
    }
}

impl<'env, V: CallValidity> MemberResolver<'env, V> {
    pub fn with_call_validity(env: &'env dyn TypeEnv, calls: V) -> Self {
        Self { env, calls }
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn call_valid(&self, method: &MethodInstance, args: &[Type]) -> Result<bool, TypeError> {
        self.calls.call_valid(self.env, method, args)
    }

    /// Class whose members a receiver of type `ty` sees.
    fn receiver_class(&self, ty: &Type, what: &str) -> Result<ClassId, TypeError> {
        ty.ensure_canonical()?;
        match ty {
            Type::Class(id) => Ok(*id),
            Type::Array(_) => Ok(self.env.well_known().object),
            Type::TypeVar(_) => match erase_type_var(self.env, ty)? {
                Type::Class(id) => Ok(id),
                _ => Ok(self.env.well_known().object),
            },
            _ => Err(TypeError::mismatch(format!(
                "{what} access is valid only on reference types, found \"{}\"",
                format_type(self.env, ty)
            ))),
        }
    }

    /// Find field `name` visible on `ty` from `ctx`.
    ///
    /// The superclass chain is searched outward and the first declaration with a matching name
    /// wins. If that declaration is inaccessible the lookup fails, even when an accessible field of
    /// the same name exists further up.
    pub fn get_field(
        &self,
        ty: &Type,
        name: &str,
        ctx: &AccessContext,
    ) -> Result<FieldInstance, TypeError> {
        let start = self.receiver_class(ty, "field")?;
        for class in superclass_chain(self.env, start) {
            let class = class?;
            let Some(def) = self.env.class(class) else {
                return Err(TypeError::UnresolvedClass {
                    name: format_class(self.env, class),
                });
            };
            let Some(field) = def.field(name) else {
                continue;
            };
            if is_accessible(self.env, &Type::class(class), field.flags, ctx)? {
                tracing::trace!(target: TYPES_TARGET, field = name, class = %def.name, "resolved field");
                return Ok(field.clone());
            }
            return Err(TypeError::InaccessibleField {
                name: name.to_owned(),
                container: def.name.clone(),
            });
        }
        Err(TypeError::FieldNotFound {
            name: name.to_owned(),
            container: format_type(self.env, ty),
        })
    }

    /// Every method named `call.name` declared on the receiver or any supertype that is both
    /// applicable to `call.args` and accessible from `ctx`.
    ///
    /// Candidates are ordered by declaring class (superclass chain, then interfaces breadth-first)
    /// and by declaration order within a class. Interface receivers also see `java.lang.Object`.
    pub fn applicable_methods(
        &self,
        call: &MethodCall,
        ctx: &AccessContext,
    ) -> Result<Vec<MethodInstance>, TypeError> {
        let start = self.receiver_class(&call.receiver, "method")?;
        let mut classes = supertype_closure(self.env, start)?;
        let object = self.env.well_known().object;
        if !classes.contains(&object) {
            classes.push(object);
        }

        let mut out = Vec::new();
        for class in classes {
            let Some(def) = self.env.class(class) else {
                return Err(TypeError::UnresolvedClass {
                    name: format_class(self.env, class),
                });
            };
            for &method_id in &def.methods {
                let Some(method) = self.env.method(method_id) else {
                    return Err(TypeError::internal(format!(
                        "{method_id:?} listed on {} is not in the environment",
                        def.name
                    )));
                };
                if method.name != call.name {
                    continue;
                }
                if self.call_valid(method, &call.args)?
                    && is_accessible(self.env, &Type::class(class), method.flags, ctx)?
                {
                    out.push(method.clone());
                }
            }
        }
        tracing::trace!(
            target: TYPES_TARGET,
            method = %call.name,
            candidates = out.len(),
            "collected applicable methods"
        );
        Ok(out)
    }

    /// `m1` is more specific than `m2` when `m1`'s declaring class is `m2`'s, descends from it,
    /// or is nested inside it, and `m2` accepts `m1`'s formal parameter types as arguments.
    pub fn more_specific(&self, m1: &MethodInstance, m2: &MethodInstance) -> bool {
        let (c1, c2) = (m1.container, m2.container);
        let related = c1 == c2
            || matches!(
                descends_from(self.env, &Type::class(c1), &Type::class(c2)),
                Ok(true)
            )
            || matches!(is_enclosed(self.env, c1, c2), Ok(true));
        related && matches!(self.call_valid(m2, &m1.params), Ok(true))
    }

    /// Resolve an invocation to its unique most specific applicable method.
    pub fn get_method(
        &self,
        call: &MethodCall,
        ctx: &AccessContext,
    ) -> Result<MethodInstance, TypeError> {
        let candidates = self.applicable_methods(call, ctx)?;
        if candidates.is_empty() {
            return Err(TypeError::NoApplicableMethod {
                name: call.name.clone(),
                args: format_types(self.env, &call.args),
                container: format_type(self.env, &call.receiver),
            });
        }

        let maximal: Vec<&MethodInstance> = candidates
            .iter()
            .filter(|m| {
                !candidates.iter().any(|other| {
                    other.id != m.id && self.more_specific(other, m) && !self.more_specific(m, other)
                })
            })
            .collect();

        if let [single] = maximal.as_slice() {
            tracing::debug!(
                target: TYPES_TARGET,
                method = %format_method(self.env, single),
                class = %format_class(self.env, single.container),
                "resolved method"
            );
            return Ok((*single).clone());
        }

        // No unique maximal candidate. An empty maximal set means the candidates beat each other
        // in a cycle; report all of them.
        let tied = if maximal.is_empty() {
            candidates.iter().collect()
        } else {
            maximal
        };
        let names: Vec<String> = tied
            .iter()
            .map(|m| {
                format!(
                    "{}.{}",
                    format_class(self.env, m.container),
                    format_method(self.env, m)
                )
            })
            .collect();
        tracing::debug!(
            target: TYPES_TARGET,
            method = %call.name,
            candidates = ?names,
            "ambiguous invocation"
        );
        Err(TypeError::AmbiguousMethod {
            name: call.name.clone(),
            candidates: names,
        })
    }
}
