use indexmap::IndexMap;
use strata_types::{MethodInstance, Type, TypeVarId};

/// A finite mapping from type variables to types.
///
/// Application is a single simultaneous rewrite: the image of a variable is not itself rewritten.
/// Entries keep insertion order, which makes rendered and debug output deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subst {
    map: IndexMap<TypeVarId, Type>,
}

impl Subst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `from[i]` to the variable `to[i]`. Extra entries on either side are ignored.
    pub fn positional(from: &[TypeVarId], to: &[TypeVarId]) -> Self {
        from.iter()
            .zip(to)
            .map(|(&from, &to)| (from, Type::TypeVar(to)))
            .collect()
    }

    pub fn insert(&mut self, var: TypeVarId, ty: Type) -> Option<Type> {
        self.map.insert(var, ty)
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> + '_ {
        self.map.iter().map(|(&var, ty)| (var, ty))
    }

    pub fn subst_type(&self, ty: &Type) -> Type {
        match ty {
            Type::TypeVar(var) => self.map.get(var).cloned().unwrap_or_else(|| ty.clone()),
            Type::Array(elem) => Type::array(self.subst_type(elem)),
            _ => ty.clone(),
        }
    }

    pub fn subst_types(&self, types: &[Type]) -> Vec<Type> {
        types.iter().map(|ty| self.subst_type(ty)).collect()
    }

    /// Copy of `method` with parameter, return and throws types rewritten.
    ///
    /// Declared type parameters mapped to another variable are renamed; those mapped to any other
    /// type are instantiated and drop out of the signature.
    pub fn subst_method(&self, method: &MethodInstance) -> MethodInstance {
        let type_params = method
            .type_params
            .iter()
            .filter_map(|&var| match self.map.get(&var) {
                None => Some(var),
                Some(Type::TypeVar(renamed)) => Some(*renamed),
                Some(_) => None,
            })
            .collect();
        MethodInstance {
            params: self.subst_types(&method.params),
            return_type: self.subst_type(&method.return_type),
            throws: self.subst_types(&method.throws),
            type_params,
            ..method.clone()
        }
    }

    /// `self` followed by `then`: applying the result equals applying `self`, then `then`.
    pub fn compose(&self, then: &Subst) -> Subst {
        let mut map: IndexMap<TypeVarId, Type> = self
            .map
            .iter()
            .map(|(&var, ty)| (var, then.subst_type(ty)))
            .collect();
        for (&var, ty) in &then.map {
            map.entry(var).or_insert_with(|| ty.clone());
        }
        Subst { map }
    }
}

impl FromIterator<(TypeVarId, Type)> for Subst {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, Type)>>(iter: I) -> Self {
        Subst {
            map: iter.into_iter().collect(),
        }
    }
}
