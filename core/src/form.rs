//! The `Form` handle callers and field binders work through.
//!
//! A `Form` pairs the pure [`FormState`] transitions with a
//! [`StateContainer`]. Reads look at the latest committed snapshot and every
//! write is one commit, so an event handler that writes several times sees
//! its own earlier writes, and the next event starts from the last commit.

use std::rc::Rc;

use serde_json::Value;

use crate::config::FormConfig;
use crate::container::{LocalContainer, StateContainer};
use crate::error::FormError;
use crate::state::{FormState, Update};


/// Cloneable handle onto one form instance.
pub struct Form<C: StateContainer = LocalContainer> {
    container: Rc<C>,
}

impl<C: StateContainer> Clone for Form<C> {
    fn clone(&self) -> Self {
        Form {
            container: Rc::clone(&self.container),
        }
    }
}

impl<C: StateContainer> std::fmt::Debug for Form<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form").field("state", &self.container.snapshot()).finish()
    }
}

impl Form<LocalContainer> {
    /// A form seeded with `values` (a deep copy becomes the initial snapshot).
    pub fn new(values: Value) -> Self {
        Self::from_state(FormState::new(values))
    }

    pub fn from_state(state: FormState) -> Self {
        Form {
            container: Rc::new(LocalContainer::new(state)),
        }
    }

    pub fn from_config(config: FormConfig) -> Result<Self, FormError> {
        Ok(Self::from_state(config.into_state()?))
    }

    /// Commits so far; see [`LocalContainer::revision`].
    pub fn revision(&self) -> u64 {
        self.container.revision()
    }
}

impl<C: StateContainer + 'static> Form<C> {
    /// Work on a host-supplied container.
    pub fn with_container(container: Rc<C>) -> Self {
        Form { container }
    }

    pub fn container(&self) -> &Rc<C> {
        &self.container
    }

    /// The latest committed snapshot.
    pub fn state(&self) -> Rc<FormState> {
        self.container.snapshot()
    }

    /// Commit one transition computed from the latest snapshot.
    pub fn commit(&self, transition: impl FnOnce(FormState) -> FormState + 'static) {
        self.container
            .replace(Update::with(move |old: Option<FormState>| transition(old.unwrap_or_default())));
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Typed value at `path`, `null` when absent.
    pub fn get(&self, path: &str) -> Value {
        self.state().value(path).cloned().unwrap_or(Value::Null)
    }

    /// The whole value tree.
    pub fn values(&self) -> Value {
        self.state().values().clone()
    }

    pub fn value(&self, path: &str) -> Option<Value> {
        self.state().value(path).cloned()
    }

    pub fn initial_value(&self, path: &str) -> Option<Value> {
        self.state().initial_value(path).cloned()
    }

    pub fn formatted_value(&self, path: &str) -> Option<Value> {
        self.state().formatted_value(path).cloned()
    }

    pub fn validity(&self, path: &str) -> Option<bool> {
        self.state().validity(path)
    }

    pub fn is_touched(&self, path: &str) -> bool {
        self.state().is_touched(path)
    }

    pub fn is_valid(&self, path: Option<&str>) -> bool {
        self.state().is_valid(path)
    }

    pub fn changed(&self, path: Option<&str>) -> bool {
        self.state().changed(path)
    }

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Set a field the way a caller outside the binders does: the cached
    /// display text and validity at `path` are dropped.
    pub fn set(&self, path: &str, update: impl Into<Update<Value>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_field(&path, update));
    }

    /// Replace the whole value tree; clears display text and validity.
    pub fn set_values(&self, update: impl Into<Update<Value>>) {
        let update = update.into();
        self.commit(move |state| state.with_values(update));
    }

    pub fn set_value(&self, path: &str, update: impl Into<Update<Value>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_value(&path, update));
    }

    pub fn try_set_value(&self, path: &str, value: Value) -> Result<(), FormError> {
        let next = (*self.state()).clone().try_with_value(path, value)?;
        self.container.replace(Update::Literal(next));
        Ok(())
    }

    pub fn set_formatted_value(&self, path: &str, update: impl Into<Update<Value>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_formatted_value(&path, update));
    }

    pub fn set_formatted_values(&self, update: impl Into<Update<Value>>) {
        let update = update.into();
        self.commit(move |state| state.with_formatted_values(update));
    }

    pub fn set_validity(&self, path: &str, update: impl Into<Update<bool>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_validity(&path, update));
    }

    pub fn set_touched(&self, path: &str, update: impl Into<Update<bool>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_touched(&path, update));
    }

    pub fn set_initial_value(&self, path: &str, update: impl Into<Update<Value>>) {
        let path = path.to_string();
        let update = update.into();
        self.commit(move |state| state.with_initial_value(&path, update));
    }

    pub fn set_initial_values(&self, update: impl Into<Update<Value>>) {
        let update = update.into();
        self.commit(move |state| state.with_initial_values(update));
    }

    // -------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------

    pub fn append(&self, path: &str, value: Value) {
        let path = path.to_string();
        self.commit(move |state| state.append(&path, value));
    }

    pub fn prepend(&self, path: &str, value: Value) {
        let path = path.to_string();
        self.commit(move |state| state.prepend(&path, value));
    }

    pub fn remove_at(&self, path: &str, index: usize) {
        let path = path.to_string();
        self.commit(move |state| state.remove_at(&path, index));
    }

    pub fn remove_field(&self, path: &str) {
        let path = path.to_string();
        self.commit(move |state| state.remove_field(&path));
    }

    pub fn splice(&self, path: &str, index: usize, count: usize) {
        let path = path.to_string();
        self.commit(move |state| state.splice(&path, index, count));
    }

    pub fn swap(&self, first: &str, second: &str) {
        let (first, second) = (first.to_string(), second.to_string());
        self.commit(move |state| state.swap(&first, &second));
    }

    pub fn move_up(&self, container: &str, index: usize) {
        let container = container.to_string();
        self.commit(move |state| state.move_up(&container, index));
    }

    pub fn move_down(&self, container: &str, index: usize) {
        let container = container.to_string();
        self.commit(move |state| state.move_down(&container, index));
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    pub fn reset(&self) {
        self.commit(FormState::reset);
    }

    pub fn reset_field(&self, path: &str) {
        let path = path.to_string();
        self.commit(move |state| state.reset_field(&path));
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_are_visible_to_later_reads() {
        let form = Form::new(json!({"tags": ["react"]}));
        form.set_value("tags.0", json!("hooks"));
        form.append("tags", json!("x"));
        assert_eq!(form.get("tags"), json!(["hooks", "x"]));
        assert_eq!(form.revision(), 2);
    }

    #[test]
    fn clones_share_one_container() {
        let form = Form::new(json!({}));
        let other = form.clone();
        other.set_touched("a", true);
        assert!(form.is_touched("a"));
    }

    #[test]
    fn updater_reads_committed_value() {
        let form = Form::new(json!({"count": 1}));
        let bump = |prev: Option<Value>| json!(prev.and_then(|v| v.as_i64()).unwrap_or(0) + 1);
        form.set_value("count", Update::with(bump));
        form.set_value("count", Update::with(bump));
        assert_eq!(form.get("count"), json!(3));
    }

    #[test]
    fn set_drops_cached_display_text() {
        let form = Form::new(json!({"title": "a"}));
        form.set_formatted_value("title", json!("typed"));
        form.set("title", json!("b"));
        assert_eq!(form.formatted_value("title"), None);
        assert!(form.changed(Some("title")));
    }

    #[test]
    fn set_values_replaces_tree() {
        let form = Form::new(json!({"a": 1}));
        form.set_validity("a", false);
        form.set_values(json!({"b": 2}));
        assert_eq!(form.values(), json!({"b": 2}));
        assert!(form.is_valid(None));
    }

    #[test]
    fn try_set_value_keeps_state_on_collision() {
        let form = Form::new(json!({"a": "text"}));
        assert!(form.try_set_value("a.b", json!(1)).is_err());
        assert_eq!(form.get("a"), json!("text"));
        assert_eq!(form.revision(), 0);
        form.try_set_value("c.d", json!(1)).unwrap();
        assert_eq!(form.get("c.d"), json!(1));
    }

    #[test]
    fn initial_value_writes_move_dirty_baseline() {
        let form = Form::new(json!({"a": 1}));
        form.set_value("a", json!(2));
        assert!(form.changed(None));
        form.set_initial_value("a", json!(2));
        assert!(!form.changed(None));
        form.set_initial_values(json!({}));
        assert_eq!(form.initial_value("a"), None);
    }

    #[test]
    fn reset_through_handle() {
        let form = Form::new(json!({"tags": ["a"]}));
        form.prepend("tags", json!("b"));
        form.set_touched("tags.1", true);
        form.reset_field("tags");
        assert_eq!(form.get("tags"), json!(["a"]));
        assert!(!form.is_touched("tags.1"));
        form.set_value("tags.0", json!("z"));
        form.reset();
        assert!(!form.changed(None));
    }

    #[test]
    fn collection_ops_through_handle() {
        let form = Form::new(json!({"rows": [1, 2, 3, 4]}));
        form.set_formatted_values(json!({"rows": ["1", "2", "3", "4"]}));
        form.move_down("rows", 0);
        form.move_up("rows", 3);
        form.swap("rows.0", "rows.1");
        form.splice("rows", 2, 1);
        form.remove_at("rows", 0);
        assert_eq!(form.get("rows"), json!([2, 3]));
        assert_eq!(form.formatted_value("rows"), Some(json!(["2", "3"])));
        form.remove_field("rows");
        assert_eq!(form.value("rows"), None);
    }

    #[test]
    fn far_indices_leave_state_alone() {
        let form = Form::new(json!({"rows": [1, 2]}));
        let before = form.state();
        form.set_value("rows.18446744073709551615", json!(0));
        form.set_touched("rows.4294967296", true);
        form.move_down("rows", usize::MAX);
        assert_eq!(*form.state(), *before);
        assert!(matches!(
            form.try_set_value("rows.9999999", json!(0)),
            Err(FormError::IndexOutOfRange { len: 2, .. })
        ));
    }
}
