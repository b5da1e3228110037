use crate::hierarchy::display_name;
use crate::{ClassId, MethodInstance, Type, TypeEnv};

pub fn format_class(env: &dyn TypeEnv, id: ClassId) -> String {
    display_name(env, id)
}

/// Source-like rendering: `java.lang.String[]`, `int`, `T`.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    match ty {
        Type::Primitive(prim) => prim.name().to_owned(),
        Type::Null => "null".to_owned(),
        Type::Array(elem) => format!("{}[]", format_type(env, elem)),
        Type::Class(id) => format_class(env, *id),
        Type::TypeVar(tv) => env
            .type_param(*tv)
            .map_or_else(|| format!("{tv:?}"), |param| param.name.clone()),
        Type::Package(name) | Type::Named(name) => name.clone(),
    }
}

pub fn format_types(env: &dyn TypeEnv, types: &[Type]) -> String {
    types
        .iter()
        .map(|ty| format_type(env, ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `<T> name(T, int...)`, with the type-parameter prefix only for generic methods.
pub fn format_method(env: &dyn TypeEnv, method: &MethodInstance) -> String {
    let mut out = String::new();
    if !method.type_params.is_empty() {
        let names: Vec<String> = method
            .type_params
            .iter()
            .map(|tv| format_type(env, &Type::TypeVar(*tv)))
            .collect();
        out.push('<');
        out.push_str(&names.join(", "));
        out.push_str("> ");
    }
    out.push_str(&method.name);
    out.push('(');
    let last = method.params.len().saturating_sub(1);
    for (idx, param) in method.params.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        match param {
            Type::Array(elem) if method.is_varargs() && idx == last => {
                out.push_str(&format_type(env, elem));
                out.push_str("...");
            }
            _ => out.push_str(&format_type(env, param)),
        }
    }
    out.push(')');
    out
}
