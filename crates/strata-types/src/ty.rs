use crate::{ClassId, TypeError, TypeVarId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Void,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Numeric primitives in ladder order.
    pub const NUMERIC: [PrimitiveType; 7] = [
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Position on the numeric ladder `byte < short < char < int < long < float < double`.
    ///
    /// `boolean` and `void` are off the ladder.
    pub fn numeric_rank(self) -> Option<u8> {
        match self {
            PrimitiveType::Byte => Some(1),
            PrimitiveType::Short => Some(2),
            PrimitiveType::Char => Some(3),
            PrimitiveType::Int => Some(4),
            PrimitiveType::Long => Some(5),
            PrimitiveType::Float => Some(6),
            PrimitiveType::Double => Some(7),
            PrimitiveType::Boolean | PrimitiveType::Void => None,
        }
    }

    pub fn from_numeric_rank(rank: u8) -> Option<Self> {
        Self::NUMERIC.get(usize::from(rank).checked_sub(1)?).copied()
    }

    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Void => "void",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A type as seen by the checker.
///
/// Class types are referenced by id; their definitions live in the environment. `Named` is a name
/// the front end has not resolved yet. It may appear in supertype links (resolved lazily through
/// [`crate::TypeEnv::find`]) but every relation predicate rejects it as an argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    Null,
    Array(Box<Type>),
    Class(ClassId),
    TypeVar(TypeVarId),
    /// A package name used as a qualifier. Never a value type.
    Package(String),
    Named(String),
}

impl Type {
    pub fn class(id: ClassId) -> Type {
        Type::Class(id)
    }

    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn boolean() -> Type {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn void() -> Type {
        Type::Primitive(PrimitiveType::Void)
    }

    pub fn byte() -> Type {
        Type::Primitive(PrimitiveType::Byte)
    }

    pub fn short() -> Type {
        Type::Primitive(PrimitiveType::Short)
    }

    pub fn char() -> Type {
        Type::Primitive(PrimitiveType::Char)
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Type {
        Type::Primitive(PrimitiveType::Long)
    }

    pub fn float() -> Type {
        Type::Primitive(PrimitiveType::Float)
    }

    pub fn double() -> Type {
        Type::Primitive(PrimitiveType::Double)
    }

    pub fn named(name: impl Into<String>) -> Type {
        Type::Named(name.into())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.is_numeric())
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Null | Type::Array(_) | Type::Class(_) | Type::TypeVar(_)
        )
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Type::Class(id) => Some(*id),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Whether an unresolved name occurs anywhere in this type.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            Type::Named(_) => true,
            Type::Array(elem) => elem.is_ambiguous(),
            _ => false,
        }
    }

    /// Reject types that still carry unresolved names.
    pub fn ensure_canonical(&self) -> Result<(), TypeError> {
        if self.is_ambiguous() {
            return Err(TypeError::Internal(format!(
                "unresolved type {self:?} reached the type checker"
            )));
        }
        Ok(())
    }
}

impl From<PrimitiveType> for Type {
    fn from(value: PrimitiveType) -> Self {
        Type::Primitive(value)
    }
}
