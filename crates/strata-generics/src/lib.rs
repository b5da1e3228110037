//! Generic-type extension of the Strata checker.
//!
//! Layers type-variable substitution and erasure on top of [`strata_types`]:
//!
//! - [`Subst`] maps type variables to types and rewrites method signatures,
//! - [`GenericCallValidity`] retries failed applicability checks against erased signatures,
//! - [`can_override`] enforces the override rules for generic and non-generic methods,
//! - [`declare_class`] walks a generic class declaration through its build passes and rejects
//!   ill-formed type-parameter declarations.

mod build;
mod calls;
mod declarations;
mod erasure;
mod overrides;
mod subst;

pub use build::{
    declare_class, AttachedClass, CheckedClass, DeclaredClass, MembersBuilt, TypeParamDecl,
};
pub use calls::{generic_resolver, GenericCallValidity};
pub use declarations::{check_class_declaration, check_duplicate_type_vars};
pub use erasure::{erase_type, erasure_subst, ErasureCache};
pub use overrides::{
    are_override_equivalent, are_return_type_substitutable, can_override, overridden_methods,
    throws_subset,
};
pub use subst::Subst;

/// Tracing target for erasure, override and declaration checks.
pub const GENERICS_TARGET: &str = "strata.generics";
