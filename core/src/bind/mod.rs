//! Field binders: per-control helpers that turn a bound path into a flat
//! property bundle and the event closures a UI layer attaches to a native
//! control.
//!
//! The UI layer owns translating native events into a [`ChangeEvent`] and
//! running the control's own constraint check (required, pattern, min/max);
//! the result arrives as [`ChangeEvent::constraints_valid`] and is ANDed
//! into the validity computed here. Every closure holds a clone of the
//! [`Form`] handle, so each event starts from the latest committed snapshot.

pub mod choice;
pub mod file;
pub mod text;

pub use file::FileDescriptor;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compare::CompareKey;
use crate::container::StateContainer;
use crate::form::Form;
use crate::handler::InputHandler;


// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// The `type` attribute of a bound control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Password,
    Number,
    Email,
    Url,
    Color,
    Date,
    DatetimeLocal,
    Month,
    Search,
    Tel,
    Time,
    Week,
    Checkbox,
    Radio,
    File,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Number => "number",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Color => "color",
            InputType::Date => "date",
            InputType::DatetimeLocal => "datetime-local",
            InputType::Month => "month",
            InputType::Search => "search",
            InputType::Tel => "tel",
            InputType::Time => "time",
            InputType::Week => "week",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::File => "file",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What the UI layer reports when a control changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Raw control text (the DOM index as text for selects).
    pub value: String,
    /// Selected files, for file inputs.
    pub files: Vec<Value>,
    pub required: bool,
    /// Result of the control's own constraint check.
    pub constraints_valid: bool,
}

impl ChangeEvent {
    pub fn text(value: impl Into<String>) -> Self {
        ChangeEvent {
            value: value.into(),
            files: Vec::new(),
            required: false,
            constraints_valid: true,
        }
    }

    pub fn files(files: Vec<Value>) -> Self {
        ChangeEvent {
            files,
            ..ChangeEvent::text("")
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_constraints(mut self, valid: bool) -> Self {
        self.constraints_valid = valid;
        self
    }
}

pub type ChangeHandler = Rc<dyn Fn(&ChangeEvent)>;
pub type FocusHandler = Rc<dyn Fn()>;
pub type KeyDownHandler = Rc<dyn Fn(&str)>;

/// User callback; receives the field's typed value.
pub type ValueCallback = Rc<dyn Fn(&Value)>;


// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional user callbacks for one field.
#[derive(Clone, Default)]
pub struct FieldCallbacks {
    pub on_change: Option<ValueCallback>,
    pub on_focus: Option<ValueCallback>,
    pub on_blur: Option<ValueCallback>,
}

impl FieldCallbacks {
    pub fn on_change(mut self, f: impl Fn(&Value) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl Fn(&Value) + 'static) -> Self {
        self.on_focus = Some(Rc::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl Fn(&Value) + 'static) -> Self {
        self.on_blur = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for FieldCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .finish()
    }
}

/// Options for text-like and file fields.
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    /// Merged field-by-field over the preset for the input type.
    pub handler: Option<InputHandler>,
    pub callbacks: FieldCallbacks,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(mut self, handler: InputHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn callbacks(mut self, callbacks: FieldCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    fn resolve(&self, input_type: InputType) -> InputHandler {
        let preset = InputHandler::preset_for(input_type);
        match &self.handler {
            Some(handler) => handler.merged_over(&preset),
            None => preset,
        }
    }
}

impl From<InputHandler> for InputOptions {
    fn from(handler: InputHandler) -> Self {
        InputOptions::new().handler(handler)
    }
}

/// Options for radio, checklist and select fields.
#[derive(Debug, Clone, Default)]
pub struct ChoiceOptions {
    /// Compare candidates by this sub-field only.
    pub key: Option<CompareKey>,
    pub callbacks: FieldCallbacks,
}

impl ChoiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<CompareKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn callbacks(mut self, callbacks: FieldCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}


// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// Text-like `<input>`.
#[derive(Clone)]
pub struct InputProps {
    pub input_type: InputType,
    pub name: String,
    pub value: String,
    pub on_change: ChangeHandler,
    pub on_focus: FocusHandler,
    pub on_blur: FocusHandler,
    pub on_key_down: KeyDownHandler,
}

#[derive(Clone)]
pub struct TextareaProps {
    pub name: String,
    pub value: String,
    pub on_change: ChangeHandler,
    pub on_focus: FocusHandler,
    pub on_blur: FocusHandler,
}

/// Checkbox, radio and checklist controls.
#[derive(Clone)]
pub struct CheckProps {
    pub input_type: InputType,
    pub name: String,
    pub checked: bool,
    pub on_change: ChangeHandler,
    pub on_focus: FocusHandler,
    pub on_blur: FocusHandler,
}

#[derive(Clone)]
pub struct SelectProps {
    pub name: String,
    /// DOM value: the selected option index, or the raw value when the
    /// select has no options list. Empty when nothing matches.
    pub value: String,
    pub selected_index: Option<usize>,
    pub on_change: ChangeHandler,
    pub on_focus: FocusHandler,
    pub on_blur: FocusHandler,
}

#[derive(Clone)]
pub struct FileProps {
    pub input_type: InputType,
    pub name: String,
    pub on_change: ChangeHandler,
    pub on_focus: FocusHandler,
    pub on_blur: FocusHandler,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionProps {
    pub value: String,
    pub key: String,
}

impl fmt::Debug for InputProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputProps")
            .field("type", &self.input_type)
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for TextareaProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextareaProps")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CheckProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckProps")
            .field("type", &self.input_type)
            .field("name", &self.name)
            .field("checked", &self.checked)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for SelectProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectProps")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("selected_index", &self.selected_index)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for FileProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileProps")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}


// ---------------------------------------------------------------------------
// Shared handlers
// ---------------------------------------------------------------------------

impl<C: StateContainer + 'static> Form<C> {
    /// Reports the current value to the user's focus callback.
    pub(crate) fn focus_handler(&self, path: &str, callback: Option<ValueCallback>) -> FocusHandler {
        let form = self.clone();
        let path = path.to_string();
        Rc::new(move || {
            if let Some(callback) = &callback {
                callback(&form.get(&path));
            }
        })
    }

    /// Marks the path touched.
    pub(crate) fn touch_on_blur(&self, path: &str, callback: Option<ValueCallback>) -> FocusHandler {
        let form = self.clone();
        let path = path.to_string();
        Rc::new(move || {
            form.set_touched(&path, true);
            if let Some(callback) = &callback {
                callback(&form.get(&path));
            }
        })
    }
}
