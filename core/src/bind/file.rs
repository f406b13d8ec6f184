//! File input binder and the serializable file descriptor.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::trace;

use super::{ChangeEvent, FileProps, InputOptions, InputType};
use crate::container::StateContainer;
use crate::form::Form;


/// A selected file as the UI layer reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_modified: Option<u64>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        FileDescriptor {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified: None,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "size": self.size,
            "mime_type": self.mime_type,
            "last_modified": self.last_modified,
        })
    }

    /// Read a descriptor back out of a stored value.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}


impl<C: StateContainer + 'static> Form<C> {
    /// File input. The typed value is `null` unless the list is non-empty
    /// and valid; a single file is stored bare, several as a list.
    pub fn file(&self, path: &str, options: InputOptions) -> FileProps {
        let handler = options.resolve(InputType::File);
        let callbacks = options.callbacks;
        let form = self.clone();
        let field = path.to_string();
        let on_change = callbacks.on_change;
        FileProps {
            input_type: InputType::File,
            name: path.to_string(),
            on_change: Rc::new(move |event: &ChangeEvent| {
                let files = Value::Array(event.files.clone());
                let empty = event.files.is_empty();
                let valid = event.constraints_valid && (empty || handler.validate(&files));
                let file = if !empty && valid { handler.parse(&files) } else { Value::Null };
                trace!(path = %field, count = event.files.len(), valid, "file change");

                let (target, value) = (field.clone(), file.clone());
                form.commit(move |state| state.with_value(&target, value).with_validity(&target, valid));
                if let Some(callback) = &on_change {
                    callback(&file);
                }
            }),
            on_focus: self.focus_handler(path, callbacks.on_focus),
            on_blur: self.touch_on_blur(path, callbacks.on_blur),
        }
    }
}
