//! End-to-end editing of a product form through the public binders.

use std::cell::RefCell;
use std::rc::Rc;

use formstate_core::handler::parse_float_prefix;
use formstate_core::{
    ChangeEvent, ChoiceOptions, FieldCallbacks, Form, FormConfig, InputHandler, InputOptions,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Amounts are stored in cents and displayed with two decimals.
fn money(min: i64) -> InputHandler {
    InputHandler::new()
        .with_filter(|raw| {
            raw.chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect()
        })
        .with_parse(|raw| {
            raw.as_str()
                .and_then(parse_float_prefix)
                .map(|euros| json!((euros * 100.0).round() as i64))
                .unwrap_or(Value::Null)
        })
        .with_format(|cents| match cents.as_f64() {
            Some(cents) => format!("{:.2}", cents / 100.0),
            None => String::new(),
        })
        .with_validate(move |cents| cents.as_i64().is_some_and(|c| c >= min))
}

fn categories() -> Vec<Value> {
    vec![
        json!({"id": 1, "title": "State management"}),
        json!({"id": 2, "title": "Hooks"}),
        json!({"id": 3, "title": "Forms"}),
    ]
}

fn product() -> Form {
    Form::new(json!({
        "title": "React form state manager",
        "description": "Description",
        "amount": 1000,
        "category": {"id": 2},
        "categories": [],
        "manufacturer": {"name": "TypeScript"},
        "tags": ["react"],
        "subscribe": true
    }))
}

fn text(form: &Form, path: &str) -> String {
    form.text(path, InputOptions::new()).value
}


#[test]
fn money_field_round_trip() {
    let form = product();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let options = || InputOptions::from(money(0));
    assert_eq!(form.text("amount", options()).value, "10.00");

    let props = form.text(
        "amount",
        options().callbacks(FieldCallbacks::default().on_change(move |v| log.borrow_mut().push(v.clone()))),
    );
    (props.on_change)(&ChangeEvent::text("12.5€").required());
    assert_eq!(form.get("amount"), json!(1250));
    assert_eq!(form.text("amount", options()).value, "12.5");
    (props.on_blur)();
    assert_eq!(form.text("amount", options()).value, "12.50");
    assert_eq!(*seen.borrow(), vec![json!(1250)]);

    (props.on_change)(&ChangeEvent::text("-3").required());
    assert_eq!(form.get("amount"), json!(-300));
    assert!(!form.is_valid(Some("amount")));
    assert!(!form.is_valid(None));
}

#[test]
fn nested_text_and_textarea() {
    let form = product();
    (form.text("manufacturer.name", InputOptions::new()).on_change)(&ChangeEvent::text("Rust"));
    (form.textarea("description", InputOptions::new()).on_change)(&ChangeEvent::text(""));
    assert_eq!(form.get("manufacturer"), json!({"name": "Rust"}));
    assert_eq!(form.get("description"), json!(""));
    assert!(form.changed(Some("manufacturer.name")));
    assert!(form.is_valid(None));
}

#[test]
fn category_pickers_agree_by_id() {
    let form = product();
    let by_id = || ChoiceOptions::new().key("id");

    let select = form.select("category", Some(categories()), by_id());
    assert_eq!(select.selected_index, Some(1));
    (select.on_change)(&ChangeEvent::text("2"));

    let checked: Vec<bool> = categories()
        .into_iter()
        .map(|c| form.radio("category", c, by_id()).checked)
        .collect();
    assert_eq!(checked, vec![false, false, true]);

    (form.radio("category", categories()[0].clone(), by_id()).on_change)(&ChangeEvent::text("on"));
    assert_eq!(form.select("category", Some(categories()), by_id()).value, "0");
    assert!(form.is_touched("category"));
}

#[test]
fn categories_checklist() {
    let form = product();
    let by_id = || ChoiceOptions::new().key("id");
    for category in categories() {
        (form.checklist("categories", category, by_id()).on_change)(&ChangeEvent::text("on"));
    }
    assert_eq!(form.get("categories").as_array().map(Vec::len), Some(3));
    (form.checklist("categories", json!({"id": 2}), by_id()).on_change)(&ChangeEvent::text("on"));
    assert_eq!(form.get("categories"), json!([categories()[0], categories()[2]]));
    (form.checklist("categories", json!({"id": 2}), by_id()).on_change)(&ChangeEvent::text("on"));
    // re-added at the end with the candidate as given
    assert_eq!(form.get("categories.2"), json!({"id": 2}));
}

#[test]
fn tag_list_scenario() {
    let form = Form::new(json!({"amount": null, "tags": ["react"]}));

    (form.text("tags.0", InputOptions::new()).on_change)(&ChangeEvent::text("hooks"));
    assert_eq!(form.get("tags.0"), json!("hooks"));

    form.append("tags", json!("x"));
    assert_eq!(form.get("tags"), json!(["hooks", "x"]));
    assert_eq!(form.formatted_value("tags"), Some(json!(["hooks"])));

    form.prepend("tags", json!("y"));
    assert_eq!(form.get("tags"), json!(["y", "hooks", "x"]));
    assert_eq!(form.formatted_value("tags.0"), Some(Value::Null));
    assert_eq!(form.formatted_value("tags.1"), Some(json!("hooks")));
    assert_eq!(form.validity("tags.1"), Some(true));
    assert!(form.is_valid(None));

    // each tag row shows the right text after reordering
    form.move_down("tags", 1);
    assert_eq!(form.get("tags"), json!(["y", "x", "hooks"]));
    assert_eq!(text(&form, "tags.2"), "hooks");
    assert_eq!(text(&form, "tags.1"), "x");

    form.remove_at("tags", 0);
    assert_eq!(form.get("tags"), json!(["x", "hooks"]));
    assert_eq!(text(&form, "tags.1"), "hooks");
    assert_eq!(form.validity("tags.1"), Some(true));
}

#[test]
fn tag_row_edits_after_append() {
    let form = product();
    form.append("tags", json!(""));
    let props = form.text("tags.1", InputOptions::new());
    assert_eq!(props.value, "");
    (props.on_change)(&ChangeEvent::text("").required());
    assert!(!form.is_valid(None));
    (props.on_change)(&ChangeEvent::text("forms").required());
    (props.on_key_down)("Enter");
    assert!(form.is_valid(None));
    assert!(form.is_touched("tags.1"));
    assert_eq!(form.get("tags"), json!(["react", "forms"]));
}

#[test]
fn subscribe_checkbox() {
    let form = product();
    let props = form.checkbox("subscribe", FieldCallbacks::default());
    assert!(props.checked);
    (props.on_change)(&ChangeEvent::text("on"));
    assert!(!form.checkbox("subscribe", FieldCallbacks::default()).checked);
    assert!(form.changed(None));
}

#[test]
fn reset_all_after_edits() {
    let form = product();
    (form.text("title", InputOptions::new()).on_change)(&ChangeEvent::text(""));
    (form.checkbox("subscribe", FieldCallbacks::default()).on_change)(&ChangeEvent::text("on"));
    form.prepend("tags", json!("new"));
    (form.text("title", InputOptions::new()).on_blur)();
    assert!(form.changed(None));

    form.reset();
    assert!(!form.changed(None));
    assert_eq!(text(&form, "title"), "React form state manager");
    assert!(!form.is_touched("title"));
    assert!(form.is_valid(None));
    assert_eq!(form.state().values(), form.state().initial_values());
}

#[test]
fn outside_set_refreshes_display() {
    let form = product();
    (form.text("title", InputOptions::new()).on_change)(&ChangeEvent::text("typed"));
    form.set("title", json!("From custom field"));
    assert_eq!(text(&form, "title"), "From custom field");
}

#[test]
fn form_from_yaml_seed() {
    let yaml = r#"
values:
  amount: 1999
  tags: [a, b]
formatted_values:
  tags: [A]
"#;
    let form = Form::from_config(FormConfig::from_yaml_str(yaml).unwrap()).unwrap();
    assert_eq!(form.text("amount", InputOptions::from(money(0))).value, "19.99");
    assert_eq!(text(&form, "tags.0"), "A");
    form.prepend("tags", json!("z"));
    assert_eq!(form.formatted_value("tags"), Some(json!([null, "A"])));
}
