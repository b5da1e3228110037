use serde::Serialize;
use thiserror::Error;

use crate::{Diagnostic, Span};

/// Coarse classification of a [`TypeError`], stable across message wording changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeErrorKind {
    TypeMismatch,
    MemberNotFound,
    InaccessibleMember,
    AmbiguousMethod,
    IllegalOverride,
    IllegalGenericDeclaration,
    UnresolvedClass,
    CyclicInheritance,
    InternalInvariantViolation,
}

impl TypeErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            TypeErrorKind::TypeMismatch => "type-mismatch",
            TypeErrorKind::MemberNotFound => "member-not-found",
            TypeErrorKind::InaccessibleMember => "inaccessible-member",
            TypeErrorKind::AmbiguousMethod => "ambiguous-method",
            TypeErrorKind::IllegalOverride => "illegal-override",
            TypeErrorKind::IllegalGenericDeclaration => "illegal-generic-declaration",
            TypeErrorKind::UnresolvedClass => "unresolved-class",
            TypeErrorKind::CyclicInheritance => "cyclic-inheritance",
            TypeErrorKind::InternalInvariantViolation => "internal-error",
        }
    }
}

/// The override rule a method declaration broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideViolation {
    IncompatibleParameterTypes,
    IncompatibleReturnType,
    ThrowsNotSubset,
    WeakerAccess,
    StaticMismatch,
    OverridesFinal,
}

/// The generic-declaration rule a class or method declaration broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenericDeclViolation {
    ExtendsEnum,
    GenericObject,
    GenericThrowable,
    DuplicateTypeVariable,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("{message}")]
    TypeMismatch { message: String },

    #[error("field \"{name}\" not found in type \"{container}\"")]
    FieldNotFound { name: String, container: String },

    #[error("no valid method call found for {name}({args}) in {container}")]
    NoApplicableMethod {
        name: String,
        args: String,
        container: String,
    },

    #[error("field \"{name}\" found in \"{container}\", but with wrong access permissions")]
    InaccessibleField { name: String, container: String },

    #[error(
        "reference to {name} is ambiguous, multiple methods match: {}",
        .candidates.join(", ")
    )]
    AmbiguousMethod {
        name: String,
        candidates: Vec<String>,
    },

    #[error("{message}")]
    IllegalOverride {
        reason: OverrideViolation,
        message: String,
        span: Option<Span>,
    },

    #[error("{message}")]
    IllegalGenericDeclaration {
        reason: GenericDeclViolation,
        message: String,
        span: Option<Span>,
    },

    #[error("class \"{name}\" not found")]
    UnresolvedClass { name: String },

    #[error("cyclic inheritance involving \"{class}\"")]
    CyclicInheritance { class: String },

    #[error("internal type checker error: {0}")]
    Internal(String),
}

impl TypeError {
    pub fn mismatch(message: impl Into<String>) -> Self {
        TypeError::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        TypeError::Internal(message.into())
    }

    pub fn kind(&self) -> TypeErrorKind {
        match self {
            TypeError::TypeMismatch { .. } => TypeErrorKind::TypeMismatch,
            TypeError::FieldNotFound { .. } | TypeError::NoApplicableMethod { .. } => {
                TypeErrorKind::MemberNotFound
            }
            TypeError::InaccessibleField { .. } => TypeErrorKind::InaccessibleMember,
            TypeError::AmbiguousMethod { .. } => TypeErrorKind::AmbiguousMethod,
            TypeError::IllegalOverride { .. } => TypeErrorKind::IllegalOverride,
            TypeError::IllegalGenericDeclaration { .. } => {
                TypeErrorKind::IllegalGenericDeclaration
            }
            TypeError::UnresolvedClass { .. } => TypeErrorKind::UnresolvedClass,
            TypeError::CyclicInheritance { .. } => TypeErrorKind::CyclicInheritance,
            TypeError::Internal(_) => TypeErrorKind::InternalInvariantViolation,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            TypeError::IllegalOverride { span, .. }
            | TypeError::IllegalGenericDeclaration { span, .. } => *span,
            _ => None,
        }
    }

    /// Internal errors mean the caller broke a precondition and the compilation cannot continue.
    /// Everything else is an ordinary semantic error attributable to user code.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TypeError::Internal(_))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.kind().code(), self.to_string(), self.span())
    }
}

impl From<&TypeError> for Diagnostic {
    fn from(err: &TypeError) -> Self {
        err.to_diagnostic()
    }
}
