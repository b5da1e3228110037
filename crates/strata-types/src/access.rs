use crate::hierarchy::{class_def, enclosing_classes};
use crate::relation::descends_from;
use crate::{ClassId, Flags, Type, TypeEnv, TypeError, TYPES_TARGET};

/// Where a member reference occurs: the class whose code is being checked plus the classes that
/// lexically enclose it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessContext {
    current: ClassId,
    enclosing: Vec<ClassId>,
}

impl AccessContext {
    /// Context with no enclosing classes.
    pub fn new(current: ClassId) -> Self {
        Self {
            current,
            enclosing: Vec::new(),
        }
    }

    /// Context derived from the `outer` links recorded on `current`'s definition.
    pub fn for_class(env: &dyn TypeEnv, current: ClassId) -> Result<Self, TypeError> {
        Ok(Self {
            current,
            enclosing: enclosing_classes(env, current)?,
        })
    }

    /// Replace the enclosing chain (innermost first).
    pub fn with_enclosing(mut self, enclosing: Vec<ClassId>) -> Self {
        self.enclosing = enclosing;
        self
    }

    pub fn current_class(&self) -> ClassId {
        self.current
    }

    pub fn enclosing(&self) -> &[ClassId] {
        &self.enclosing
    }

    /// Whether `class` is the current class or one of its enclosing classes.
    pub fn is_within(&self, class: ClassId) -> bool {
        self.current == class || self.enclosing.contains(&class)
    }
}

/// Whether `inner` is lexically nested, at any depth, inside `outer`.
pub fn is_enclosed(env: &dyn TypeEnv, inner: ClassId, outer: ClassId) -> Result<bool, TypeError> {
    Ok(enclosing_classes(env, inner)?.contains(&outer))
}

/// Whether a member of `target` declared with `flags` may be used from `ctx`.
///
/// Granted when any of the following holds: the member is public or belongs to the current class;
/// `target` encloses the context or is nested inside the current class; the member has package
/// access and both classes live in the same package; the member is protected and the current class
/// descends from `target`. Non-class targets only ever pass the first check.
pub fn is_accessible(
    env: &dyn TypeEnv,
    target: &Type,
    flags: Flags,
    ctx: &AccessContext,
) -> Result<bool, TypeError> {
    target.ensure_canonical()?;
    if flags.is_public() || *target == Type::class(ctx.current) {
        return Ok(true);
    }
    let Type::Class(target_id) = target else {
        return Ok(false);
    };
    let target_id = *target_id;

    if ctx.is_within(target_id) || is_enclosed(env, target_id, ctx.current)? {
        return Ok(true);
    }

    if flags.is_package() {
        let target_pkg = class_def(env, target_id)?.package();
        let current_pkg = class_def(env, ctx.current)?.package();
        if target_pkg == current_pkg {
            return Ok(true);
        }
    }

    if flags.is_protected() && descends_from(env, &Type::class(ctx.current), target)? {
        return Ok(true);
    }

    tracing::trace!(
        target: TYPES_TARGET,
        class = ?target_id,
        from = ?ctx.current,
        access = ?flags.access(),
        "access denied"
    );
    Ok(false)
}
