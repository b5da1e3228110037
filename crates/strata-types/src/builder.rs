use crate::{ClassId, Flags, Span, Type, TypeVarId};

/// Mutable description of a class, frozen into a [`crate::ClassDef`] by
/// [`crate::TypeStore::define_class`].
#[derive(Clone, Debug)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) flags: Flags,
    pub(crate) super_class: Option<Type>,
    pub(crate) interfaces: Vec<Type>,
    pub(crate) outer: Option<ClassId>,
    pub(crate) type_params: Vec<TypeVarId>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) methods: Vec<MethodDecl>,
    pub(crate) span: Option<Span>,
}

impl ClassBuilder {
    /// A class named by its binary name, e.g. `p.Outer$Inner`.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Flags::NONE,
            super_class: None,
            interfaces: Vec::new(),
            outer: None,
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            span: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::class(name).flags(Flags::INTERFACE | Flags::ABSTRACT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_span(&self) -> Option<Span> {
        self.span
    }

    pub fn declared_super_class(&self) -> Option<&Type> {
        self.super_class.as_ref()
    }

    /// Add modifiers; existing ones are kept.
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    /// Superclass link. May be a forward reference ([`Type::Named`]).
    pub fn extends(mut self, super_class: Type) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn nested_in(mut self, outer: ClassId) -> Self {
        self.outer = Some(outer);
        self
    }

    pub fn type_params(mut self, params: Vec<TypeVarId>) -> Self {
        self.type_params = params;
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub flags: Flags,
    pub span: Option<Span>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            flags: Flags::NONE,
            span: None,
        }
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub flags: Flags,
    pub return_type: Type,
    pub params: Vec<Type>,
    pub throws: Vec<Type>,
    pub type_params: Vec<TypeVarId>,
    /// `Some(has_default)` for annotation elements.
    pub annotation_default: Option<bool>,
    pub span: Option<Span>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            flags: Flags::NONE,
            return_type,
            params: Vec::new(),
            throws: Vec::new(),
            type_params: Vec::new(),
            annotation_default: None,
            span: None,
        }
    }

    /// An element of an annotation type: no parameters, optional default value.
    pub fn annotation_element(name: impl Into<String>, ty: Type, has_default: bool) -> Self {
        let mut decl = Self::new(name, ty).flags(Flags::PUBLIC | Flags::ABSTRACT);
        decl.annotation_default = Some(has_default);
        decl
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    pub fn param(mut self, ty: Type) -> Self {
        self.params.push(ty);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Type>) -> Self {
        self.params.extend(params);
        self
    }

    /// Mark the method variable-arity. The last parameter must be an array type.
    pub fn varargs(self) -> Self {
        self.flags(Flags::VARARGS)
    }

    pub fn throws(mut self, ty: Type) -> Self {
        self.throws.push(ty);
        self
    }

    pub fn type_params(mut self, params: Vec<TypeVarId>) -> Self {
        self.type_params = params;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}
