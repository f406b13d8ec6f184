//! Input handler contract: filter, parse, format and validate.
//!
//! An [`InputHandler`] describes how the raw text of a field becomes its
//! typed value and back. Every function is optional; a missing one falls
//! back to the basic behaviour (identity filter and parse, display-string
//! format, always-valid). Caller handlers are merged field-by-field over a
//! preset with [`InputHandler::merged_over`], so overriding `validate`
//! alone keeps the preset's `parse` and `format`.

use std::fmt;
use std::rc::Rc;

use serde_json::{Number, Value};

use crate::bind::InputType;

pub type FilterFn = Rc<dyn Fn(&str) -> String>;
pub type ParseFn = Rc<dyn Fn(&Value) -> Value>;
pub type FormatFn = Rc<dyn Fn(&Value) -> String>;
pub type ValidateFn = Rc<dyn Fn(&Value) -> bool>;


/// Four optional conversion functions for one field.
#[derive(Clone, Default)]
pub struct InputHandler {
    filter: Option<FilterFn>,
    parse: Option<ParseFn>,
    format: Option<FormatFn>,
    validate: Option<ValidateFn>,
}

impl InputHandler {
    /// A handler with nothing overridden.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Presets
    // -------------------------------------------------------------------

    /// Plain text: every function is the basic default.
    pub fn basic() -> Self {
        Self::default()
    }

    /// Decimal numbers. Keeps the leading run of `[0-9.-]`, parses the
    /// longest decimal prefix (`"12-"` is 12, `"-"` is null) and accepts
    /// only numbers.
    pub fn float() -> Self {
        Self::new()
            .with_filter(|raw| {
                raw.chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect()
            })
            .with_parse(|raw| match raw {
                Value::Number(_) => raw.clone(),
                Value::String(s) => parse_float_prefix(s)
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            })
            .with_format(display_string)
            .with_validate(Value::is_number)
    }

    /// File inputs. A one-element file list collapses to the bare file.
    pub fn file() -> Self {
        Self::new().with_parse(|files| match files {
            Value::Array(items) if items.len() == 1 => items[0].clone(),
            other => other.clone(),
        })
    }

    /// Preset used for a given input type.
    pub fn preset_for(input_type: InputType) -> Self {
        match input_type {
            InputType::Number => Self::float(),
            InputType::File => Self::file(),
            _ => Self::basic(),
        }
    }

    // -------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------

    pub fn with_filter(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.filter = Some(Rc::new(f));
        self
    }

    pub fn with_parse(mut self, f: impl Fn(&Value) -> Value + 'static) -> Self {
        self.parse = Some(Rc::new(f));
        self
    }

    pub fn with_format(mut self, f: impl Fn(&Value) -> String + 'static) -> Self {
        self.format = Some(Rc::new(f));
        self
    }

    pub fn with_validate(mut self, f: impl Fn(&Value) -> bool + 'static) -> Self {
        self.validate = Some(Rc::new(f));
        self
    }

    /// Field-by-field merge: functions set on `self` win, the rest come
    /// from `preset`.
    pub fn merged_over(&self, preset: &InputHandler) -> InputHandler {
        InputHandler {
            filter: self.filter.clone().or_else(|| preset.filter.clone()),
            parse: self.parse.clone().or_else(|| preset.parse.clone()),
            format: self.format.clone().or_else(|| preset.format.clone()),
            validate: self.validate.clone().or_else(|| preset.validate.clone()),
        }
    }

    // -------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------

    pub fn filter(&self, raw: &str) -> String {
        match &self.filter {
            Some(f) => f(raw),
            None => raw.to_string(),
        }
    }

    /// `Value::Null` means "not currently representable", never an error.
    pub fn parse(&self, raw: &Value) -> Value {
        match &self.parse {
            Some(f) => f(raw),
            None => raw.clone(),
        }
    }

    pub fn format(&self, value: &Value) -> String {
        match &self.format {
            Some(f) => f(value),
            None => display_string(value),
        }
    }

    pub fn validate(&self, value: &Value) -> bool {
        match &self.validate {
            Some(f) => f(value),
            None => true,
        }
    }
}

impl fmt::Debug for InputHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandler")
            .field("filter", &self.filter.is_some())
            .field("parse", &self.parse.is_some())
            .field("format", &self.format.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}


/// Display text for a typed value: strings verbatim, numbers the way a
/// JavaScript number prints, `null` as the empty string, containers as JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        other => other.to_string(),
    }
}

fn number_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(float_string).unwrap_or_default()
    }
}

/// Plain decimals between `1e-6` and `1e21`, exponent notation with an
/// explicit sign outside that range. Negative zero prints as `0`.
fn float_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let text = format!("{:e}", f);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Longest leading decimal literal of `s`: optional sign, digits with an
/// optional fraction, optional exponent. Trailing garbage is ignored.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        end
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa += frac_end - (end + 1);
        if mantissa > 0 {
            end = frac_end;
        }
    }
    if mantissa == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
