//! The form state snapshot: four parallel trees plus the initial values.
//!
//! `FormState` is plain data. Every transition consumes a snapshot and
//! returns the next one, so a host that keeps the previous snapshot around
//! can diff the two. Reads on missing paths degrade to `None`, `false` or
//! the open-world default and never fail.
//!
//! - `values`: typed values, shaped like the form's domain object
//! - `initial_values`: captured at construction, used by `changed` and resets
//! - `formatted_values`: last display text per path, sparse
//! - `touched`: blur/commit flags, sparse (absent or `null` = untouched)
//! - `valid`: last validity per path, sparse (absent or `null` = valid)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::compare::deep_equal;
use crate::error::FormError;
use crate::path::{empty_like, FieldPath};


// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Argument of every setter: a literal, or a function of the value
/// currently stored at the target (`None` when nothing is stored).
pub enum Update<T> {
    Literal(T),
    Updater(Box<dyn FnOnce(Option<T>) -> T>),
}

impl<T> Update<T> {
    /// Wrap an updater function.
    pub fn with(f: impl FnOnce(Option<T>) -> T + 'static) -> Self {
        Update::Updater(Box::new(f))
    }

    /// Produce the new value. `previous` is only evaluated for updaters.
    pub fn apply(self, previous: impl FnOnce() -> Option<T>) -> T {
        match self {
            Update::Literal(value) => value,
            Update::Updater(f) => f(previous()),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Literal(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Update::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}


// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Names one of the four parallel trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tree {
    Values,
    Formatted,
    Touched,
    Valid,
}

impl Tree {
    pub const ALL: [Tree; 4] = [Tree::Values, Tree::Formatted, Tree::Touched, Tree::Valid];

    /// The trees that mirror `values` with sparse per-path metadata.
    pub const AUXILIARY: [Tree; 3] = [Tree::Formatted, Tree::Touched, Tree::Valid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tree::Values => "values",
            Tree::Formatted => "formatted_values",
            Tree::Touched => "touched",
            Tree::Valid => "valid",
        }
    }
}


// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

/// One immutable snapshot of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    values: Value,
    initial_values: Value,
    formatted_values: Value,
    touched: Value,
    valid: Value,
}

impl Default for FormState {
    fn default() -> Self {
        FormState::new(Value::Null)
    }
}

impl FormState {
    /// Start a form from `values`. The initial snapshot is a deep copy.
    ///
    /// The root container kind is inferred once here: an array root gives
    /// array-rooted auxiliary trees, anything else a mapping. `null` starts
    /// from an empty mapping.
    pub fn new(values: Value) -> Self {
        let values = if values.is_null() { empty_like(&values) } else { values };
        let empty = empty_like(&values);
        FormState {
            initial_values: values.clone(),
            formatted_values: empty.clone(),
            touched: empty.clone(),
            valid: empty,
            values,
        }
    }

    /// Assemble a snapshot from explicit trees. Missing auxiliary trees
    /// start empty; a missing initial snapshot copies `values`.
    pub fn from_parts(
        values: Value,
        initial_values: Option<Value>,
        formatted_values: Option<Value>,
        touched: Option<Value>,
        valid: Option<Value>,
    ) -> Self {
        let mut state = FormState::new(values);
        let empty = empty_like(&state.values);
        let or_empty = |tree: Option<Value>| match tree {
            Some(Value::Null) | None => empty.clone(),
            Some(tree) => tree,
        };
        if let Some(initial) = initial_values.filter(|v| !v.is_null()) {
            state.initial_values = initial;
        }
        state.formatted_values = or_empty(formatted_values);
        state.touched = or_empty(touched);
        state.valid = or_empty(valid);
        state
    }

    // -------------------------------------------------------------------
    // Tree access
    // -------------------------------------------------------------------

    pub fn tree(&self, tree: Tree) -> &Value {
        match tree {
            Tree::Values => &self.values,
            Tree::Formatted => &self.formatted_values,
            Tree::Touched => &self.touched,
            Tree::Valid => &self.valid,
        }
    }

    pub(crate) fn tree_mut(&mut self, tree: Tree) -> &mut Value {
        match tree {
            Tree::Values => &mut self.values,
            Tree::Formatted => &mut self.formatted_values,
            Tree::Touched => &mut self.touched,
            Tree::Valid => &mut self.valid,
        }
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn initial_values(&self) -> &Value {
        &self.initial_values
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Typed value at `path`; `None` when nothing is stored.
    pub fn value(&self, path: &str) -> Option<&Value> {
        FieldPath::parse(path).resolve(&self.values)
    }

    /// True when a non-null typed value is stored at `path`.
    pub fn has_value(&self, path: &str) -> bool {
        self.value(path).is_some_and(|v| !v.is_null())
    }

    pub fn initial_value(&self, path: &str) -> Option<&Value> {
        FieldPath::parse(path).resolve(&self.initial_values)
    }

    pub fn has_initial_value(&self, path: &str) -> bool {
        self.initial_value(path).is_some_and(|v| !v.is_null())
    }

    /// Last display text stored for `path`.
    pub fn formatted_value(&self, path: &str) -> Option<&Value> {
        FieldPath::parse(path).resolve(&self.formatted_values)
    }

    /// True when display text is cached for `path`. Placeholders (`null`)
    /// do not count.
    pub fn has_formatted_value(&self, path: &str) -> bool {
        self.formatted_value(path).is_some_and(|v| !v.is_null())
    }

    /// Stored validity flag; `None` when never evaluated.
    pub fn validity(&self, path: &str) -> Option<bool> {
        FieldPath::parse(path).resolve(&self.valid).and_then(Value::as_bool)
    }

    /// Stored touched flag; `None` when never touched.
    pub fn touched(&self, path: &str) -> Option<bool> {
        FieldPath::parse(path).resolve(&self.touched).and_then(Value::as_bool)
    }

    pub fn is_touched(&self, path: &str) -> bool {
        self.touched(path).unwrap_or(false)
    }

    /// With a path: true unless a `false` leaf is stored at or below it.
    /// Without: true unless any stored leaf in `valid` is not `true`.
    pub fn is_valid(&self, path: Option<&str>) -> bool {
        match path {
            Some(path) => FieldPath::parse(path)
                .resolve(&self.valid)
                .map_or(true, all_valid),
            None => all_valid(&self.valid),
        }
    }

    /// True when the typed value differs from its initial value.
    pub fn changed(&self, path: Option<&str>) -> bool {
        match path {
            Some(path) => {
                let current = self.value(path).unwrap_or(&Value::Null);
                let initial = self.initial_value(path).unwrap_or(&Value::Null);
                !deep_equal(current, initial)
            }
            None => !deep_equal(&self.values, &self.initial_values),
        }
    }

    // -------------------------------------------------------------------
    // Transitions: values
    // -------------------------------------------------------------------

    /// Write the typed value at `path`. The root path is a bulk replacement
    /// (see [`with_values`](Self::with_values)).
    pub fn with_value(mut self, path: &str, update: impl Into<Update<Value>>) -> Self {
        let path = FieldPath::parse(path);
        if path.is_root() {
            return self.with_values(update);
        }
        trace!(%path, "set value");
        self.write(Tree::Values, &path, update.into());
        self
    }

    /// Replace `values` wholesale. Cached display text and validity are
    /// derived from the old tree and are cleared; `touched` is kept.
    pub fn with_values(mut self, update: impl Into<Update<Value>>) -> Self {
        let current = std::mem::take(&mut self.values);
        self.values = update.into().apply(|| Some(current));
        self.formatted_values = empty_like(&self.values);
        self.valid = empty_like(&self.values);
        debug!("replaced all values");
        self
    }

    /// Caller-facing `set`: write the value at `path` and drop the display
    /// text and validity cached for that path.
    pub fn with_field(mut self, path: &str, update: impl Into<Update<Value>>) -> Self {
        let field = FieldPath::parse(path);
        if field.is_root() {
            return self.with_values(update);
        }
        self.write(Tree::Values, &field, update.into());
        field.remove(&mut self.formatted_values);
        field.remove(&mut self.valid);
        trace!(path = %field, "set field");
        self
    }

    /// Strict variant of [`with_value`](Self::with_value): fails instead of
    /// overwriting a scalar that sits on the path.
    pub fn try_with_value(mut self, path: &str, value: Value) -> Result<Self, FormError> {
        FieldPath::parse(path).try_assign(&mut self.values, value)?;
        Ok(self)
    }

    /// Write one initial value. The root path replaces the whole snapshot.
    pub fn with_initial_value(mut self, path: &str, update: impl Into<Update<Value>>) -> Self {
        let path = FieldPath::parse(path);
        if path.is_root() {
            return self.with_initial_values(update);
        }
        let next = update.into().apply(|| path.resolve(&self.initial_values).cloned());
        path.assign(&mut self.initial_values, next);
        self
    }

    pub fn with_initial_values(mut self, update: impl Into<Update<Value>>) -> Self {
        let current = std::mem::take(&mut self.initial_values);
        self.initial_values = update.into().apply(|| Some(current));
        self
    }

    // -------------------------------------------------------------------
    // Transitions: auxiliary trees
    // -------------------------------------------------------------------

    /// Write display text at `path`. The root path replaces the whole tree.
    pub fn with_formatted_value(mut self, path: &str, update: impl Into<Update<Value>>) -> Self {
        let path = FieldPath::parse(path);
        if path.is_root() {
            return self.with_formatted_values(update);
        }
        self.write(Tree::Formatted, &path, update.into());
        self
    }

    pub fn with_formatted_values(mut self, update: impl Into<Update<Value>>) -> Self {
        let current = std::mem::take(&mut self.formatted_values);
        self.formatted_values = update.into().apply(|| Some(current));
        self
    }

    /// Flags are per field, so a write at the root path is ignored.
    pub fn with_validity(mut self, path: &str, update: impl Into<Update<bool>>) -> Self {
        let path = FieldPath::parse(path);
        if path.is_root() {
            debug!("validity flag at root ignored");
            return self;
        }
        let update = update.into();
        let valid = update.apply(|| path.resolve(&self.valid).and_then(Value::as_bool));
        path.assign(&mut self.valid, Value::Bool(valid));
        self
    }

    pub fn with_touched(mut self, path: &str, update: impl Into<Update<bool>>) -> Self {
        let path = FieldPath::parse(path);
        if path.is_root() {
            debug!("touched flag at root ignored");
            return self;
        }
        let update = update.into();
        let touched = update.apply(|| path.resolve(&self.touched).and_then(Value::as_bool));
        path.assign(&mut self.touched, Value::Bool(touched));
        self
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Restore `values` from the initial snapshot and clear the auxiliary
    /// trees.
    pub fn reset(mut self) -> Self {
        self.values = self.initial_values.clone();
        for tree in Tree::AUXILIARY {
            *self.tree_mut(tree) = empty_like(&self.values);
        }
        debug!("reset form");
        self
    }

    /// Restore one path from the initial snapshot (`null` when it has no
    /// initial value) and drop its auxiliary entries.
    pub fn reset_field(mut self, path: &str) -> Self {
        let field = FieldPath::parse(path);
        if field.is_root() {
            return self.reset();
        }
        let initial = field.resolve(&self.initial_values).cloned().unwrap_or(Value::Null);
        field.assign(&mut self.values, initial);
        for tree in Tree::AUXILIARY {
            field.remove(self.tree_mut(tree));
        }
        debug!(path = %field, "reset field");
        self
    }

    // -------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------

    fn write(&mut self, tree: Tree, path: &FieldPath, update: Update<Value>) {
        let target = self.tree_mut(tree);
        let next = update.apply(|| path.resolve(target).cloned());
        path.assign(target, next);
    }
}

/// Every stored leaf is `true`; `null` placeholders and empty containers
/// count as valid.
fn all_valid(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(true) => true,
        Value::Object(map) => map.values().all(all_valid),
        Value::Array(items) => items.iter().all(all_valid),
        _ => false,
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
