//! Bounded walks over superclass, interface and enclosing-class links.

use std::collections::{HashSet, VecDeque};

use crate::{ClassDef, ClassId, Type, TypeEnv, TypeError, TYPES_TARGET};

pub(crate) fn class_def(env: &dyn TypeEnv, id: ClassId) -> Result<&ClassDef, TypeError> {
    env.class(id).ok_or_else(|| TypeError::UnresolvedClass {
        name: display_name(env, id),
    })
}

pub(crate) fn display_name(env: &dyn TypeEnv, id: ClassId) -> String {
    env.class_name(id)
        .map_or_else(|| format!("{id:?}"), str::to_owned)
}

pub(crate) fn cyclic(env: &dyn TypeEnv, id: ClassId) -> TypeError {
    tracing::warn!(target: TYPES_TARGET, class = %display_name(env, id), "cyclic inheritance");
    TypeError::CyclicInheritance {
        class: display_name(env, id),
    }
}

/// Resolve a supertype link to a class id. Forward references are looked up by name.
pub(crate) fn resolve_link(env: &dyn TypeEnv, link: &Type) -> Result<ClassId, TypeError> {
    match link {
        Type::Class(id) => Ok(*id),
        Type::Named(name) => env.find(name),
        other => Err(TypeError::internal(format!(
            "supertype link {other:?} is not a class type"
        ))),
    }
}

pub(crate) fn superclass_of(env: &dyn TypeEnv, id: ClassId) -> Result<Option<ClassId>, TypeError> {
    let def = class_def(env, id)?;
    def.super_class
        .as_ref()
        .map(|link| resolve_link(env, link))
        .transpose()
}

pub(crate) fn interfaces_of(env: &dyn TypeEnv, id: ClassId) -> Result<Vec<ClassId>, TypeError> {
    let def = class_def(env, id)?;
    def.interfaces
        .iter()
        .map(|link| resolve_link(env, link))
        .collect()
}

/// Lazy walk from a class up its superclass links, starting with the class itself.
///
/// Revisiting a class or exceeding [`TypeEnv::max_hierarchy_depth`] yields a single
/// [`TypeError::CyclicInheritance`] and ends the walk.
pub struct SuperclassChain<'env> {
    env: &'env dyn TypeEnv,
    start: Option<ClassId>,
    last: Option<ClassId>,
    seen: HashSet<ClassId>,
    done: bool,
}

impl Iterator for SuperclassChain<'_> {
    type Item = Result<ClassId, TypeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let id = match self.start.take() {
            Some(id) => id,
            None => {
                let prev = self.last?;
                match superclass_of(self.env, prev) {
                    Ok(Some(id)) => id,
                    Ok(None) => {
                        self.done = true;
                        return None;
                    }
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
            }
        };
        if !self.seen.insert(id) || self.seen.len() > self.env.max_hierarchy_depth() {
            self.done = true;
            return Some(Err(cyclic(self.env, id)));
        }
        self.last = Some(id);
        Some(Ok(id))
    }
}

pub fn superclass_chain(env: &dyn TypeEnv, start: ClassId) -> SuperclassChain<'_> {
    SuperclassChain {
        env,
        start: Some(start),
        last: None,
        seen: HashSet::new(),
        done: false,
    }
}

/// All supertypes of `start`, itself included: the superclass chain first, then interfaces in
/// breadth-first order. Each class appears once.
///
/// Fails with [`TypeError::CyclicInheritance`] if any class reachable from `start` is its own
/// supertype.
pub fn supertype_closure(env: &dyn TypeEnv, start: ClassId) -> Result<Vec<ClassId>, TypeError> {
    ensure_acyclic(env, start)?;

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    for class in superclass_chain(env, start) {
        let class = class?;
        seen.insert(class);
        out.push(class);
        queue.push_back(class);
    }
    while let Some(class) = queue.pop_front() {
        for iface in interfaces_of(env, class)? {
            if seen.insert(iface) {
                out.push(iface);
                queue.push_back(iface);
            }
        }
    }
    Ok(out)
}

fn ensure_acyclic(env: &dyn TypeEnv, start: ClassId) -> Result<(), TypeError> {
    fn visit(
        env: &dyn TypeEnv,
        id: ClassId,
        on_path: &mut Vec<ClassId>,
        finished: &mut HashSet<ClassId>,
    ) -> Result<(), TypeError> {
        if finished.contains(&id) {
            return Ok(());
        }
        if on_path.contains(&id) || on_path.len() >= env.max_hierarchy_depth() {
            return Err(cyclic(env, id));
        }
        on_path.push(id);
        if let Some(sup) = superclass_of(env, id)? {
            visit(env, sup, on_path, finished)?;
        }
        for iface in interfaces_of(env, id)? {
            visit(env, iface, on_path, finished)?;
        }
        on_path.pop();
        finished.insert(id);
        Ok(())
    }

    visit(env, start, &mut Vec::new(), &mut HashSet::new())
}

/// Classes lexically enclosing `id`, innermost first.
pub(crate) fn enclosing_classes(env: &dyn TypeEnv, id: ClassId) -> Result<Vec<ClassId>, TypeError> {
    let mut out = Vec::new();
    let mut current = class_def(env, id)?.outer;
    while let Some(outer) = current {
        if outer == id || out.contains(&outer) || out.len() >= env.max_hierarchy_depth() {
            return Err(cyclic(env, outer));
        }
        out.push(outer);
        current = class_def(env, outer)?.outer;
    }
    Ok(out)
}
