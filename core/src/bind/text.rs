//! Text-like binders: typed `<input>` helpers and `<textarea>`.
//!
//! A change runs the raw text through filter and parse, then commits the
//! typed value, the filtered text and the validity in one transaction. The
//! display value prefers that cached text, so transient input such as a
//! trailing minus survives until blur snaps it to `format(value)`.

use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use super::{
    ChangeEvent, ChangeHandler, FocusHandler, InputOptions, InputProps, InputType,
    KeyDownHandler, TextareaProps, ValueCallback,
};
use crate::compare::is_empty;
use crate::container::StateContainer;
use crate::form::Form;
use crate::handler::{display_string, InputHandler};


impl<C: StateContainer + 'static> Form<C> {
    pub fn text(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Text, options)
    }

    pub fn password(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Password, options)
    }

    /// Numeric field; the float preset applies unless overridden.
    pub fn number(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Number, options)
    }

    pub fn email(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Email, options)
    }

    pub fn url(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Url, options)
    }

    pub fn color(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Color, options)
    }

    pub fn date(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Date, options)
    }

    pub fn datetime_local(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::DatetimeLocal, options)
    }

    pub fn month(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Month, options)
    }

    pub fn search(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Search, options)
    }

    pub fn tel(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Tel, options)
    }

    pub fn time(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Time, options)
    }

    pub fn week(&self, path: &str, options: InputOptions) -> InputProps {
        self.input(path, InputType::Week, options)
    }

    /// Bind a text-like `<input>` of any type at `path`.
    pub fn input(&self, path: &str, input_type: InputType, options: InputOptions) -> InputProps {
        let handler = options.resolve(input_type);
        let callbacks = options.callbacks;
        InputProps {
            input_type,
            name: path.to_string(),
            value: self.display_value(path, &handler),
            on_change: self.text_change_handler(path, handler.clone(), callbacks.on_change),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.text_blur_handler(path, handler, callbacks.on_blur),
            on_key_down: self.enter_handler(path),
        }
    }

    /// Same contract as [`text`](Self::text) without a type or keydown.
    pub fn textarea(&self, path: &str, options: InputOptions) -> TextareaProps {
        let handler = options.resolve(InputType::Text);
        let callbacks = options.callbacks;
        TextareaProps {
            name: path.to_string(),
            value: self.display_value(path, &handler),
            on_change: self.text_change_handler(path, handler.clone(), callbacks.on_change),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.text_blur_handler(path, handler, callbacks.on_blur),
        }
    }

    /// Text shown in a text-like control: the cached display text if any,
    /// else the formatted typed value, else empty.
    pub fn display_value(&self, path: &str, handler: &InputHandler) -> String {
        let state = self.state();
        if let Some(text) = state.formatted_value(path).filter(|v| !v.is_null()) {
            return display_string(text);
        }
        match state.value(path) {
            Some(value) if !value.is_null() => handler.format(value),
            _ => String::new(),
        }
    }

    fn text_change_handler(
        &self,
        path: &str,
        handler: InputHandler,
        callback: Option<ValueCallback>,
    ) -> ChangeHandler {
        let form = self.clone();
        let path = path.to_string();
        Rc::new(move |event: &ChangeEvent| {
            let text = handler.filter(&event.value);
            let parsed = handler.parse(&Value::String(text.clone()));
            let empty = text.is_empty();
            let valid = event.constraints_valid
                && ((empty && !event.required) || (!empty && handler.validate(&parsed)));
            trace!(path = %path, valid, "text change");

            let field = path.clone();
            let value = parsed.clone();
            form.commit(move |state| {
                state
                    .with_value(&field, value)
                    .with_formatted_value(&field, Value::String(text))
                    .with_validity(&field, valid)
            });

            if let Some(callback) = &callback {
                callback(&parsed);
            }
        })
    }

    /// Snap the display text to the canonical rendering of the typed value
    /// and mark the field touched.
    fn text_blur_handler(
        &self,
        path: &str,
        handler: InputHandler,
        callback: Option<ValueCallback>,
    ) -> FocusHandler {
        let form = self.clone();
        let path = path.to_string();
        Rc::new(move || {
            let current = form.get(&path);
            let formatted = if is_empty(Some(&current)) {
                Value::Null
            } else {
                Value::String(handler.format(&current))
            };
            let field = path.clone();
            form.commit(move |state| {
                state
                    .with_formatted_value(&field, formatted)
                    .with_touched(&field, true)
            });
            if let Some(callback) = &callback {
                callback(&current);
            }
        })
    }

    /// Enter commits the field: mark it touched.
    fn enter_handler(&self, path: &str) -> KeyDownHandler {
        let form = self.clone();
        let path = path.to_string();
        Rc::new(move |key: &str| {
            if key == "Enter" {
                form.set_touched(&path, true);
            }
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::FieldCallbacks;
    use serde_json::json;
    use std::cell::RefCell;

    fn form() -> Form {
        Form::new(json!({"title": "Form", "amount": null, "tags": ["react"]}))
    }

    // --- Display ---

    #[test]
    fn display_prefers_cached_text() {
        let form = form();
        assert_eq!(form.text("title", InputOptions::new()).value, "Form");
        assert_eq!(form.number("amount", InputOptions::new()).value, "");
        form.set_formatted_value("title", json!("Typing"));
        assert_eq!(form.text("title", InputOptions::new()).value, "Typing");
    }

    #[test]
    fn change_then_read_returns_raw_text() {
        let form = form();
        let props = form.number("amount", InputOptions::new());
        (props.on_change)(&ChangeEvent::text("12-"));
        assert_eq!(form.get("amount"), json!(12.0));
        assert_eq!(form.number("amount", InputOptions::new()).value, "12-");
        (props.on_blur)();
        assert_eq!(form.number("amount", InputOptions::new()).value, "12");
        assert!(form.is_touched("amount"));
    }

    // --- Change ---

    #[test]
    fn change_commits_value_text_and_validity() {
        let form = form();
        let props = form.text("tags.0", InputOptions::new());
        (props.on_change)(&ChangeEvent::text("hooks"));
        assert_eq!(form.get("tags"), json!(["hooks"]));
        assert_eq!(form.formatted_value("tags.0"), Some(json!("hooks")));
        assert_eq!(form.validity("tags.0"), Some(true));
    }

    #[test]
    fn float_change_and_blur_snap_to_canonical_text() {
        let form = form();
        let props = form.number("amount", InputOptions::new());
        (props.on_change)(&ChangeEvent::text("3200.50"));
        assert_eq!(form.get("amount"), json!(3200.5));
        assert_eq!(form.validity("amount"), Some(true));
        assert_eq!(form.number("amount", InputOptions::new()).value, "3200.50");
        (props.on_blur)();
        assert_eq!(form.number("amount", InputOptions::new()).value, "3200.5");
    }

    #[test]
    fn empty_input_validity_depends_on_required() {
        let form = form();
        let props = form.text("title", InputOptions::new());
        (props.on_change)(&ChangeEvent::text(""));
        assert_eq!(form.validity("title"), Some(true));
        (props.on_change)(&ChangeEvent::text("").required());
        assert_eq!(form.validity("title"), Some(false));
    }

    #[test]
    fn failed_constraints_make_field_invalid() {
        let form = form();
        let props = form.email("title", InputOptions::new());
        (props.on_change)(&ChangeEvent::text("not-an-email").with_constraints(false));
        assert_eq!(form.validity("title"), Some(false));
        assert!(!form.is_valid(None));
    }

    #[test]
    fn unparsable_number_is_null_and_invalid() {
        let form = form();
        let props = form.number("amount", InputOptions::new());
        (props.on_change)(&ChangeEvent::text("-"));
        assert_eq!(form.get("amount"), Value::Null);
        assert_eq!(form.validity("amount"), Some(false));
        (props.on_blur)();
        assert_eq!(form.formatted_value("amount"), Some(Value::Null));
        assert_eq!(form.number("amount", InputOptions::new()).value, "");
    }

    #[test]
    fn change_callback_sees_committed_state() {
        let form = form();
        let seen = Rc::new(RefCell::new(None));
        let (log, reader) = (Rc::clone(&seen), form.clone());
        let options = InputOptions::new().callbacks(FieldCallbacks::default().on_change(move |v| {
            *log.borrow_mut() = Some((v.clone(), reader.get("title")));
        }));
        let props = form.text("title", options);
        (props.on_change)(&ChangeEvent::text("New"));
        assert_eq!(*seen.borrow(), Some((json!("New"), json!("New"))));
    }

    // --- Handlers ---

    #[test]
    fn custom_handler_overrides_preset_piecewise() {
        let form = form();
        let options = InputOptions::from(
            InputHandler::new().with_validate(|v| v.as_f64().is_some_and(|f| f >= 0.0)),
        );
        let props = form.number("amount", options);
        (props.on_change)(&ChangeEvent::text("-5"));
        assert_eq!(form.get("amount"), json!(-5.0));
        assert_eq!(form.validity("amount"), Some(false));
    }

    #[test]
    fn enter_marks_touched() {
        let form = form();
        let props = form.search("title", InputOptions::new());
        (props.on_key_down)("a");
        assert!(!form.is_touched("title"));
        (props.on_key_down)("Enter");
        assert!(form.is_touched("title"));
        assert_eq!(props.input_type, InputType::Search);
    }

    #[test]
    fn textarea_binds_like_text() {
        let form = form();
        let props = form.textarea("description", InputOptions::new());
        assert_eq!(props.value, "");
        (props.on_change)(&ChangeEvent::text("line one\nline two"));
        (props.on_blur)();
        assert_eq!(form.get("description"), json!("line one\nline two"));
        assert!(form.is_touched("description"));
    }

    #[test]
    fn focus_reports_value_without_writing() {
        let form = form();
        let seen = Rc::new(RefCell::new(Value::Null));
        let log = Rc::clone(&seen);
        let options = InputOptions::new()
            .callbacks(FieldCallbacks::default().on_focus(move |v| *log.borrow_mut() = v.clone()));
        let revision = form.revision();
        (form.date("title", options).on_focus)();
        assert_eq!(*seen.borrow(), json!("Form"));
        assert_eq!(form.revision(), revision);
    }
}
