//! Formstate core: a path-addressed form state engine.
//!
//! A form's runtime state is four parallel trees (typed values, display
//! text, touched flags, validity flags) plus an initial snapshot for dirty
//! checking. Every operation is a pure snapshot transition; a host-supplied
//! container commits the result. Field binders compose those transitions
//! with pluggable input handlers to drive native form controls.
//!
//! # Modules
//!
//! - [`path`]: Dotted/bracketed path addressing over `serde_json::Value`
//! - [`compare`]: Numeric-aware deep equality and key-aware list membership
//! - [`handler`]: Filter/parse/format/validate contract and presets
//! - [`state`]: The `FormState` snapshot and its field transitions
//! - [`collection`]: List operations that keep the four trees aligned
//! - [`container`]: Host container seam and the local implementation
//! - [`form`]: The `Form` handle that commits through a container
//! - [`bind`]: Text, choice and file binders
//! - [`config`]: YAML/JSON form seeds
//! - [`error`]: Crate error type

pub mod bind;
pub mod collection;
pub mod compare;
pub mod config;
pub mod container;
pub mod error;
pub mod form;
pub mod handler;
pub mod path;
pub mod state;

pub use bind::{
    ChangeEvent, CheckProps, ChoiceOptions, FieldCallbacks, FileDescriptor, FileProps,
    InputOptions, InputProps, InputType, OptionProps, SelectProps, TextareaProps,
};
pub use compare::CompareKey;
pub use config::FormConfig;
pub use container::{LocalContainer, StateContainer};
pub use error::FormError;
pub use form::Form;
pub use handler::InputHandler;
pub use path::FieldPath;
pub use state::{FormState, Tree, Update};
