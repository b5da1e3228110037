use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position of this entry in its arena.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to a class or interface interned in a [`crate::TypeStore`].
    ClassId,
    "class"
);
arena_id!(
    /// Handle to a frozen [`crate::MethodInstance`].
    MethodId,
    "method"
);
arena_id!(
    /// Handle to a declared type variable.
    TypeVarId,
    "tv"
);
