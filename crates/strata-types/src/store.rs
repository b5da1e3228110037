use std::collections::{HashMap, HashSet};

use strata_config::CheckerConfig;

use crate::builder::{ClassBuilder, FieldDecl, MethodDecl};
use crate::{ClassId, Flags, MethodId, Span, Type, TypeError, TypeVarId, TYPES_TARGET};

/// Read-only view of the class universe consumed by every relation and resolver query.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn method(&self, id: MethodId) -> Option<&MethodInstance>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    /// Name of a class, including classes that were interned but are not defined yet.
    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.class(id).map(|class| class.name.as_str())
    }

    /// Upper bound on links followed by any hierarchy walk.
    fn max_hierarchy_depth(&self) -> usize {
        CheckerConfig::DEFAULT_MAX_HIERARCHY_DEPTH
    }

    /// Resolve a class by name, failing with [`TypeError::UnresolvedClass`].
    fn find(&self, name: &str) -> Result<ClassId, TypeError> {
        self.lookup_class(name)
            .ok_or_else(|| TypeError::UnresolvedClass {
                name: name.to_owned(),
            })
    }
}

/// Ids of the runtime classes the relations treat specially.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub class: ClassId,
    pub throwable: ClassId,
    pub exception: ClassId,
    pub runtime_exception: ClassId,
    pub error: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub enum_: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub flags: Flags,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub outer: Option<ClassId>,
    pub type_params: Vec<TypeVarId>,
    pub fields: Vec<FieldInstance>,
    pub methods: Vec<MethodId>,
    pub span: Option<Span>,
}

impl ClassDef {
    /// Package part of the binary name; `None` for the unnamed package.
    pub fn package(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg)
    }

    pub fn is_interface(&self) -> bool {
        self.flags.is_interface()
    }

    pub fn is_final(&self) -> bool {
        self.flags.is_final()
    }

    pub fn is_enum(&self) -> bool {
        self.flags.is_enum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInstance> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInstance {
    pub name: String,
    pub ty: Type,
    pub flags: Flags,
    pub container: ClassId,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInstance {
    pub id: MethodId,
    pub container: ClassId,
    pub name: String,
    pub flags: Flags,
    pub return_type: Type,
    pub params: Vec<Type>,
    pub throws: Vec<Type>,
    pub type_params: Vec<TypeVarId>,
    /// `Some(has_default)` when this is an annotation element.
    pub annotation_default: Option<bool>,
    pub span: Option<Span>,
}

impl MethodInstance {
    pub fn is_varargs(&self) -> bool {
        self.flags.is_varargs()
    }

    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }

    pub fn is_final(&self) -> bool {
        self.flags.is_final()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_annotation_element(&self) -> bool {
        self.annotation_default.is_some()
    }

    pub fn has_default(&self) -> bool {
        self.annotation_default.unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeVarOwner {
    Class(ClassId),
    Method(MethodId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared bound; `java.lang.Object` when none was written.
    pub upper_bound: Type,
    /// Set once the declaring class or method is attached.
    pub owner: Option<TypeVarOwner>,
    pub span: Option<Span>,
}

#[derive(Clone, Debug)]
struct ClassSlot {
    name: String,
    def: Option<ClassDef>,
}

/// Arena owning every class, method and type parameter known to a compilation.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassSlot>,
    class_by_name: HashMap<String, ClassId>,
    methods: Vec<MethodInstance>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
    max_hierarchy_depth: usize,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_minimal_jdk()
    }
}

impl TypeStore {
    /// A store pre-populated with the `java.lang` classes the relations depend on.
    pub fn with_minimal_jdk() -> Self {
        let placeholder = ClassId::new(0);
        let mut store = TypeStore {
            classes: Vec::new(),
            class_by_name: HashMap::new(),
            methods: Vec::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                class: placeholder,
                throwable: placeholder,
                exception: placeholder,
                runtime_exception: placeholder,
                error: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                enum_: placeholder,
                number: placeholder,
                integer: placeholder,
            },
            max_hierarchy_depth: CheckerConfig::DEFAULT_MAX_HIERARCHY_DEPTH,
        };

        let wk = WellKnownTypes {
            object: store.intern_class_id("java.lang.Object"),
            string: store.intern_class_id("java.lang.String"),
            class: store.intern_class_id("java.lang.Class"),
            throwable: store.intern_class_id("java.lang.Throwable"),
            exception: store.intern_class_id("java.lang.Exception"),
            runtime_exception: store.intern_class_id("java.lang.RuntimeException"),
            error: store.intern_class_id("java.lang.Error"),
            cloneable: store.intern_class_id("java.lang.Cloneable"),
            serializable: store.intern_class_id("java.io.Serializable"),
            enum_: store.intern_class_id("java.lang.Enum"),
            number: store.intern_class_id("java.lang.Number"),
            integer: store.intern_class_id("java.lang.Integer"),
        };
        store.well_known = wk.clone();

        let object = Type::class(wk.object);
        let string = Type::class(wk.string);
        let serializable = Type::class(wk.serializable);
        let public = Flags::PUBLIC;

        let builtins = [
            ClassBuilder::class("java.lang.Object")
                .flags(public)
                .method(MethodDecl::new("toString", string.clone()).flags(public))
                .method(
                    MethodDecl::new("equals", Type::boolean())
                        .flags(public)
                        .param(object.clone()),
                )
                .method(MethodDecl::new("hashCode", Type::int()).flags(public)),
            ClassBuilder::interface("java.io.Serializable").flags(public),
            ClassBuilder::interface("java.lang.Cloneable").flags(public),
            ClassBuilder::class("java.lang.String")
                .flags(public | Flags::FINAL)
                .implements(serializable.clone())
                .method(MethodDecl::new("length", Type::int()).flags(public)),
            ClassBuilder::class("java.lang.Class").flags(public | Flags::FINAL),
            ClassBuilder::class("java.lang.Throwable")
                .flags(public)
                .implements(serializable.clone())
                .method(MethodDecl::new("getMessage", string).flags(public)),
            ClassBuilder::class("java.lang.Exception")
                .flags(public)
                .extends(Type::class(wk.throwable)),
            ClassBuilder::class("java.lang.RuntimeException")
                .flags(public)
                .extends(Type::class(wk.exception)),
            ClassBuilder::class("java.lang.Error")
                .flags(public)
                .extends(Type::class(wk.throwable)),
            ClassBuilder::class("java.lang.Enum")
                .flags(public | Flags::ABSTRACT)
                .implements(serializable.clone()),
            ClassBuilder::class("java.lang.Number")
                .flags(public | Flags::ABSTRACT)
                .implements(serializable),
            ClassBuilder::class("java.lang.Integer")
                .flags(public | Flags::FINAL)
                .extends(Type::class(wk.number))
                .field(
                    FieldDecl::new("MAX_VALUE", Type::int())
                        .flags(public | Flags::STATIC | Flags::FINAL),
                ),
        ];

        for builder in builtins {
            // Fresh store, fresh names: defining a builtin cannot collide.
            let _ = store.add_class(builder);
        }
        store
    }

    /// Minimal JDK store honouring the checker limits from `config`.
    pub fn with_config(config: &CheckerConfig) -> Self {
        let mut store = Self::with_minimal_jdk();
        store.max_hierarchy_depth = config.max_hierarchy_depth.max(1);
        store
    }

    /// Reserve an id for `name` without defining it. Supports forward and cyclic references
    /// between classes that are defined later.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(&id) = self.class_by_name.get(name) {
            return id;
        }
        let id = ClassId::new(self.classes.len());
        self.classes.push(ClassSlot {
            name: name.to_owned(),
            def: None,
        });
        self.class_by_name.insert(name.to_owned(), id);
        id
    }

    /// Intern and define in one step.
    pub fn add_class(&mut self, builder: ClassBuilder) -> Result<ClassId, TypeError> {
        let id = self.intern_class_id(&builder.name);
        self.define_class(id, builder)
    }

    /// Freeze `builder` into the definition of `id`.
    ///
    /// Methods receive ids, type parameters are attached to their owners and a missing superclass
    /// defaults to `java.lang.Object` for classes. Defining a class twice is an internal error.
    pub fn define_class(&mut self, id: ClassId, builder: ClassBuilder) -> Result<ClassId, TypeError> {
        let slot = self
            .classes
            .get(id.index())
            .ok_or_else(|| TypeError::internal(format!("{id:?} was never interned")))?;
        if slot.def.is_some() {
            return Err(TypeError::internal(format!(
                "class {} is already defined",
                slot.name
            )));
        }
        if slot.name != builder.name {
            return Err(TypeError::internal(format!(
                "{id:?} is interned as {} but the definition is named {}",
                slot.name, builder.name
            )));
        }

        let ClassBuilder {
            name,
            flags,
            super_class,
            interfaces,
            outer,
            type_params,
            fields,
            methods,
            span,
        } = builder;

        for decl in &methods {
            if decl.flags.is_varargs() && !matches!(decl.params.last(), Some(Type::Array(_))) {
                return Err(TypeError::internal(format!(
                    "variable-arity method {name}.{} must end with an array parameter",
                    decl.name
                )));
            }
            if decl.annotation_default.is_some()
                && !(decl.params.is_empty() && decl.throws.is_empty() && decl.type_params.is_empty())
            {
                return Err(TypeError::internal(format!(
                    "annotation element {name}.{} declares parameters, throws or type parameters",
                    decl.name
                )));
            }
        }

        self.check_unbound_type_params(id, &type_params, &methods)?;

        // Nothing below fails: the class is either fully defined or the store is untouched.
        for &tv in &type_params {
            self.bind_type_param(tv, TypeVarOwner::Class(id))?;
        }

        let mut method_ids = Vec::with_capacity(methods.len());
        for decl in methods {
            let method_id = MethodId::new(self.methods.len());
            for &tv in &decl.type_params {
                self.bind_type_param(tv, TypeVarOwner::Method(method_id))?;
            }
            self.methods.push(MethodInstance {
                id: method_id,
                container: id,
                name: decl.name,
                flags: decl.flags,
                return_type: decl.return_type,
                params: decl.params,
                throws: decl.throws,
                type_params: decl.type_params,
                annotation_default: decl.annotation_default,
                span: decl.span,
            });
            method_ids.push(method_id);
        }

        let super_class = match super_class {
            Some(ty) => Some(ty),
            None if !flags.is_interface() && id != self.well_known.object => {
                Some(Type::class(self.well_known.object))
            }
            None => None,
        };

        let fields = fields
            .into_iter()
            .map(|decl| FieldInstance {
                name: decl.name,
                ty: decl.ty,
                flags: decl.flags,
                container: id,
                span: decl.span,
            })
            .collect();

        tracing::trace!(
            target: TYPES_TARGET,
            class = %name,
            methods = method_ids.len(),
            "defined class"
        );

        self.classes[id.index()].def = Some(ClassDef {
            name,
            flags,
            super_class,
            interfaces,
            outer,
            type_params,
            fields,
            methods: method_ids,
            span,
        });
        Ok(id)
    }

    /// Every class type parameter is unowned or already owned by `id`, and every method type
    /// parameter is unowned and listed by a single declaration.
    fn check_unbound_type_params(
        &self,
        id: ClassId,
        class_params: &[TypeVarId],
        methods: &[MethodDecl],
    ) -> Result<(), TypeError> {
        let lookup = |tv: TypeVarId| {
            self.type_params
                .get(tv.index())
                .ok_or_else(|| TypeError::internal(format!("unknown type variable {tv:?}")))
        };
        let mut claimed = HashSet::new();
        for &tv in class_params {
            let param = lookup(tv)?;
            if param.owner.is_some_and(|owner| owner != TypeVarOwner::Class(id)) {
                return Err(TypeError::internal(format!(
                    "type variable {} is already declared by {:?}",
                    param.name, param.owner
                )));
            }
            claimed.insert(tv);
        }
        for decl in methods {
            for &tv in &decl.type_params {
                let param = lookup(tv)?;
                if param.owner.is_some() || !claimed.insert(tv) {
                    return Err(TypeError::internal(format!(
                        "type variable {} of method {} is already declared elsewhere",
                        param.name, decl.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Declare a type parameter. It stays unattached until its class or method is defined.
    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bound: Option<Type>,
        span: Option<Span>,
    ) -> TypeVarId {
        let id = TypeVarId::new(self.type_params.len());
        let upper_bound = upper_bound.unwrap_or_else(|| Type::class(self.well_known.object));
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bound,
            owner: None,
            span,
        });
        id
    }

    /// Attach a type parameter to its declaring class or method. Rebinding to the same owner is
    /// a no-op; moving it to another owner is an internal error.
    pub fn bind_type_param(&mut self, id: TypeVarId, owner: TypeVarOwner) -> Result<(), TypeError> {
        let param = self
            .type_params
            .get_mut(id.index())
            .ok_or_else(|| TypeError::internal(format!("unknown type variable {id:?}")))?;
        match param.owner {
            Some(existing) if existing != owner => Err(TypeError::internal(format!(
                "type variable {} is already declared by {existing:?}",
                param.name
            ))),
            _ => {
                param.owner = Some(owner);
                Ok(())
            }
        }
    }

    /// Whether `id` has a frozen definition.
    pub fn is_defined(&self, id: ClassId) -> bool {
        self.classes
            .get(id.index())
            .is_some_and(|slot| slot.def.is_some())
    }

    pub fn methods_of(&self, id: ClassId) -> impl Iterator<Item = &MethodInstance> + '_ {
        self.class(id)
            .into_iter()
            .flat_map(|class| class.methods.iter())
            .filter_map(move |&method| self.method(method))
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())?.def.as_ref()
    }

    fn method(&self, id: MethodId) -> Option<&MethodInstance> {
        self.methods.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(&id) = self.class_by_name.get(name) {
            return Some(id);
        }
        if name.contains('.') {
            return None;
        }
        // Simple names fall back to the implicit `java.lang` import.
        self.class_by_name.get(&format!("java.lang.{name}")).copied()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.classes.get(id.index()).map(|slot| slot.name.as_str())
    }

    fn max_hierarchy_depth(&self) -> usize {
        self.max_hierarchy_depth
    }
}
