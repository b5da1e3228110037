//! Build passes for a generic class declaration.
//!
//! A class moves through [`DeclaredClass`] → [`AttachedClass`] → [`MembersBuilt`] →
//! [`CheckedClass`]; each pass consumes the previous state, so passes cannot be skipped or run
//! twice.

use strata_types::{
    format_class, ClassBuilder, ClassId, FieldDecl, MethodDecl, MethodInstance, Span, Type,
    TypeEnv, TypeError, TypeStore, TypeVarId, TypeVarOwner,
};

use crate::declarations::{check_class_declaration, check_duplicate_type_vars};
use crate::overrides::{can_override, overridden_methods};
use crate::GENERICS_TARGET;

/// A type parameter as written in source: `T`, `T extends Bound`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub name: String,
    pub bound: Option<Type>,
    pub span: Option<Span>,
}

impl TypeParamDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
            span: None,
        }
    }

    pub fn bound(mut self, bound: Type) -> Self {
        self.bound = Some(bound);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

fn add_type_param(store: &mut TypeStore, decl: TypeParamDecl) -> TypeVarId {
    store.add_type_param(decl.name, decl.bound, decl.span)
}

/// Pass 1: intern the class and declare its type parameters.
pub fn declare_class(
    store: &mut TypeStore,
    builder: ClassBuilder,
    params: Vec<TypeParamDecl>,
) -> DeclaredClass {
    let id = store.intern_class_id(builder.name());
    let type_params = params
        .into_iter()
        .map(|decl| add_type_param(store, decl))
        .collect();
    DeclaredClass {
        id,
        builder,
        type_params,
    }
}

#[derive(Debug)]
pub struct DeclaredClass {
    id: ClassId,
    builder: ClassBuilder,
    type_params: Vec<TypeVarId>,
}

impl DeclaredClass {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn type_params(&self) -> &[TypeVarId] {
        &self.type_params
    }

    /// Pass 2: apply the class-level generic declaration rules, then attach the type parameters
    /// and supertypes.
    ///
    /// `super_class` replaces a superclass already set on the builder; without one, the builder's
    /// own is checked. On failure the store is left as it was.
    pub fn attach(
        self,
        store: &mut TypeStore,
        super_class: Option<Type>,
        interfaces: Vec<Type>,
    ) -> Result<AttachedClass, TypeError> {
        let effective_super = super_class
            .clone()
            .or_else(|| self.builder.declared_super_class().cloned());
        check_class_declaration(
            &*store,
            self.id,
            effective_super.as_ref(),
            &self.type_params,
            self.builder.declared_span(),
        )?;
        for &var in &self.type_params {
            let owner = store.type_param(var).and_then(|param| param.owner);
            if owner.is_some_and(|owner| owner != TypeVarOwner::Class(self.id)) {
                return Err(TypeError::internal(format!(
                    "type variable {var:?} of {} is already declared by {owner:?}",
                    format_class(&*store, self.id)
                )));
            }
        }
        for &var in &self.type_params {
            store.bind_type_param(var, TypeVarOwner::Class(self.id))?;
        }

        let mut builder = self.builder.type_params(self.type_params);
        if let Some(super_class) = super_class {
            builder = builder.extends(super_class);
        }
        for interface in interfaces {
            builder = builder.implements(interface);
        }
        Ok(AttachedClass {
            id: self.id,
            builder,
            methods: Vec::new(),
        })
    }
}

#[derive(Debug)]
pub struct AttachedClass {
    id: ClassId,
    builder: ClassBuilder,
    methods: Vec<MethodDecl>,
}

impl AttachedClass {
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Declare a method-level type parameter. It is attached to its method when the class is
    /// frozen.
    pub fn method_type_param(&self, store: &mut TypeStore, decl: TypeParamDecl) -> TypeVarId {
        add_type_param(store, decl)
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.builder = self.builder.field(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Pass 3: member signatures are complete.
    pub fn build_members(self) -> MembersBuilt {
        MembersBuilt {
            id: self.id,
            builder: self.builder,
            methods: self.methods,
        }
    }
}

#[derive(Debug)]
pub struct MembersBuilt {
    id: ClassId,
    builder: ClassBuilder,
    methods: Vec<MethodDecl>,
}

impl MembersBuilt {
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Pass 4: reject duplicate method type parameters, freeze the class into `store`, then
    /// check every method against the methods it overrides.
    ///
    /// A class that fails the override check stays defined, so later declarations can still
    /// refer to it.
    pub fn check(self, store: &mut TypeStore) -> Result<CheckedClass, TypeError> {
        for method in &self.methods {
            check_duplicate_type_vars(&*store, &method.type_params)?;
        }

        let builder = self
            .methods
            .into_iter()
            .fold(self.builder, |builder, method| builder.method(method));
        let id = store.define_class(self.id, builder)?;

        let store = &*store;
        let methods: Vec<MethodInstance> = store.methods_of(id).cloned().collect();
        for mi in &methods {
            for mj in overridden_methods(store, mi)? {
                can_override(store, mi, &mj, false)?;
            }
        }

        tracing::debug!(
            target: GENERICS_TARGET,
            class = %format_class(store, id),
            methods = methods.len(),
            "class checked"
        );
        Ok(CheckedClass { id })
    }
}

/// A class whose declaration passed every check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckedClass {
    id: ClassId,
}

impl CheckedClass {
    pub fn id(&self) -> ClassId {
        self.id
    }
}
