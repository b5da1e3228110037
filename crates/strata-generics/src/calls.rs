use strata_types::{
    method_call_valid, CallValidity, MemberResolver, MethodInstance, Type, TypeEnv, TypeError,
};

use crate::erasure::{erasure_subst, ErasureCache};
use crate::GENERICS_TARGET;

/// Applicability with erasure fallback.
///
/// A call that fails the standard check is retried against the method's erased signature: every
/// type variable of the declaring class and of the method itself replaced by its bound. No type
/// arguments are inferred.
#[derive(Clone, Copy, Debug)]
pub struct GenericCallValidity<'c> {
    erasure: &'c ErasureCache,
}

impl<'c> GenericCallValidity<'c> {
    pub fn new(erasure: &'c ErasureCache) -> Self {
        Self { erasure }
    }

    /// `method` with class and method type variables erased.
    pub fn erased_signature(
        &self,
        env: &dyn TypeEnv,
        method: &MethodInstance,
    ) -> Result<MethodInstance, TypeError> {
        let class = self.erasure.class_erasure(env, method.container)?;
        let subst = if method.type_params.is_empty() {
            (*class).clone()
        } else {
            class.compose(&erasure_subst(env, &method.type_params)?)
        };
        Ok(subst.subst_method(method))
    }
}

impl CallValidity for GenericCallValidity<'_> {
    fn call_valid(
        &self,
        env: &dyn TypeEnv,
        method: &MethodInstance,
        args: &[Type],
    ) -> Result<bool, TypeError> {
        if method_call_valid(env, method, args)? {
            return Ok(true);
        }
        let generic = method.is_generic()
            || env
                .class(method.container)
                .is_some_and(|class| !class.type_params.is_empty());
        if !generic {
            return Ok(false);
        }

        let erased = self.erased_signature(env, method)?;
        let valid = method_call_valid(env, &erased, args)?;
        tracing::trace!(
            target: GENERICS_TARGET,
            method = %method.name,
            valid,
            "retried call against erased signature"
        );
        Ok(valid)
    }
}

/// A [`MemberResolver`] whose applicability test understands generic signatures.
pub fn generic_resolver<'env, 'c>(
    env: &'env dyn TypeEnv,
    erasure: &'c ErasureCache,
) -> MemberResolver<'env, GenericCallValidity<'c>> {
    MemberResolver::with_call_validity(env, GenericCallValidity::new(erasure))
}
