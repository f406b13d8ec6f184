//! Selection binders: checkbox, radio, checklist and select.
//!
//! These controls never produce invalid input, so every change records the
//! field as valid. Candidates are matched with key-aware equality, which
//! lets a list of `{"id": ..}` records be selected by identity.

use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use super::{ChangeEvent, CheckProps, ChoiceOptions, FieldCallbacks, InputType, OptionProps, SelectProps};
use crate::compare::{contains, find_index, is_equal, is_truthy};
use crate::container::StateContainer;
use crate::form::Form;
use crate::handler::display_string;


impl<C: StateContainer + 'static> Form<C> {
    /// Boolean toggle. The raw control value is ignored.
    pub fn checkbox(&self, path: &str, callbacks: FieldCallbacks) -> CheckProps {
        let form = self.clone();
        let field = path.to_string();
        let on_change = callbacks.on_change;
        CheckProps {
            input_type: InputType::Checkbox,
            name: path.to_string(),
            checked: is_truthy(&self.get(path)),
            on_change: Rc::new(move |_: &ChangeEvent| {
                let target = field.clone();
                form.commit(move |state| {
                    let checked = !state.value(&target).is_some_and(is_truthy);
                    state
                        .with_value(&target, Value::Bool(checked))
                        .with_touched(&target, true)
                        .with_validity(&target, true)
                });
                if let Some(callback) = &on_change {
                    callback(&form.get(&field));
                }
            }),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.touch_on_blur(path, callbacks.on_blur),
        }
    }

    /// One radio button; selecting it stores the whole candidate.
    pub fn radio(&self, path: &str, candidate: Value, options: ChoiceOptions) -> CheckProps {
        let ChoiceOptions { key, callbacks } = options;
        let form = self.clone();
        let field = path.to_string();
        let on_change = callbacks.on_change;
        CheckProps {
            input_type: InputType::Radio,
            name: path.to_string(),
            checked: is_equal(&self.get(path), &candidate, key.as_ref()),
            on_change: Rc::new(move |_: &ChangeEvent| {
                let (target, value) = (field.clone(), candidate.clone());
                form.commit(move |state| {
                    state
                        .with_value(&target, value)
                        .with_touched(&target, true)
                        .with_validity(&target, true)
                });
                if let Some(callback) = &on_change {
                    callback(&candidate);
                }
            }),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.touch_on_blur(path, callbacks.on_blur),
        }
    }

    /// One checkbox of a multi-select list. Toggling removes the first
    /// matching member (with its auxiliary entries) or appends the
    /// candidate. The change callback receives the new list.
    pub fn checklist(&self, path: &str, candidate: Value, options: ChoiceOptions) -> CheckProps {
        let ChoiceOptions { key, callbacks } = options;
        let current = self.get(path);
        let checked = current
            .as_array()
            .is_some_and(|list| contains(list, &candidate, key.as_ref()));

        let form = self.clone();
        let field = path.to_string();
        let on_change = callbacks.on_change;
        CheckProps {
            input_type: InputType::Checkbox,
            name: path.to_string(),
            checked,
            on_change: Rc::new(move |_: &ChangeEvent| {
                let (target, value, key) = (field.clone(), candidate.clone(), key.clone());
                form.commit(move |state| {
                    let index = state
                        .value(&target)
                        .and_then(Value::as_array)
                        .and_then(|list| find_index(list, &value, key.as_ref()));
                    trace!(path = %target, ?index, "checklist toggle");
                    let state = match index {
                        Some(index) => state.remove_at(&target, index),
                        None => state.append(&target, value),
                    };
                    state.with_touched(&target, true).with_validity(&target, true)
                });
                if let Some(callback) = &on_change {
                    callback(&form.get(&field));
                }
            }),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.touch_on_blur(path, callbacks.on_blur),
        }
    }

    /// `<select>` bound at `path`. With `options`, the DOM value is an index
    /// into that list; without, the DOM value is stored as-is.
    pub fn select(&self, path: &str, options: Option<Vec<Value>>, choice: ChoiceOptions) -> SelectProps {
        let ChoiceOptions { key, callbacks } = choice;
        let current = self.get(path);
        let options = options.map(Rc::new);
        let (value, selected_index) = match &options {
            Some(list) => {
                let index = find_index(list, &current, key.as_ref());
                (index.map(|i| i.to_string()).unwrap_or_default(), index)
            }
            None => (display_string(&current), None),
        };

        let form = self.clone();
        let field = path.to_string();
        let on_change = callbacks.on_change;
        SelectProps {
            name: path.to_string(),
            value,
            selected_index,
            on_change: Rc::new(move |event: &ChangeEvent| {
                let picked = match &options {
                    Some(list) => usize::try_from(leading_int(&event.value))
                        .ok()
                        .and_then(|i| list.get(i))
                        .cloned()
                        .unwrap_or(Value::Null),
                    None => Value::String(event.value.clone()),
                };
                let (target, value) = (field.clone(), picked.clone());
                form.commit(move |state| state.with_value(&target, value).with_validity(&target, true));
                if let Some(callback) = &on_change {
                    callback(&picked);
                }
            }),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.touch_on_blur(path, callbacks.on_blur),
        }
    }

    /// Props for one `<option>`: its DOM value doubles as the render key.
    pub fn option(&self, value: impl Into<Value>) -> OptionProps {
        let value = display_string(&value.into());
        OptionProps {
            key: value.clone(),
            value,
        }
    }
}

/// Leading integer of a DOM index string; `0` when there is none.
fn leading_int(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['-', '+']));
    let digits = raw[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |end| end + sign_len);
    raw[..digits].parse().unwrap_or(0)
}
