//! Static type relations for Strata's Java-like source language.
//!
//! The crate owns three layers of the checker core:
//!
//! - the type model: an arena-backed [`TypeStore`] of classes, methods and type parameters that is
//!   consumed through the read-only [`TypeEnv`] trait,
//! - [`relation`]: subtyping, assignability, cast legality, least common ancestor and
//!   accessibility predicates,
//! - [`MemberResolver`]: field lookup, overload resolution and call applicability.
//!
//! Every query is pure with respect to the environment. Failures come back as [`TypeError`], which
//! converts into a [`Diagnostic`] for the host compiler's error queue.

use std::fmt;

use serde::Serialize;

mod access;
mod builder;
mod error;
mod flags;
mod format;
mod hierarchy;
mod ids;
mod members;
pub mod relation;
mod store;
mod ty;

pub use access::{is_accessible, is_enclosed, AccessContext};
pub use builder::{ClassBuilder, FieldDecl, MethodDecl};
pub use error::{GenericDeclViolation, OverrideViolation, TypeError, TypeErrorKind};
pub use flags::{Access, Flags};
pub use format::{format_class, format_method, format_type, format_types};
pub use hierarchy::{superclass_chain, supertype_closure, SuperclassChain};
pub use ids::{ClassId, MethodId, TypeVarId};
pub use members::{
    method_call_valid, CallValidity, MemberResolver, MethodCall, StandardCallValidity,
};
pub use relation::{
    descends_from, is_assignable_subtype, is_cast_valid, is_implicit_cast_valid,
    least_common_ancestor,
};
pub use store::{
    ClassDef, FieldInstance, MethodInstance, TypeEnv, TypeParamDef, TypeStore, TypeVarOwner,
    WellKnownTypes,
};
pub use ty::{PrimitiveType, Type};

/// Tracing target for hierarchy walks and member lookup.
pub const TYPES_TARGET: &str = "strata.types";

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A reportable problem, in the shape the host compiler's error queue expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }
}
