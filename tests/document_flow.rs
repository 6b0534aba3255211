//! End-to-end flow over a stored document: persistence, completion gating,
//! outline navigation, and field editing the way an editor frontend drives
//! the model.

use serde_json::json;
use tempfile::TempDir;

use runbook::document::{Document, MoveDirection, MoveOutcome, Step, StepType, StepValues};
use runbook::fields::{codec, FieldType};
use runbook::outline;
use runbook::selection::Selection;
use runbook::store::DocumentStore;

fn build_document() -> Document {
    let mut doc = Document::new("Release runbook");

    doc.steps.push(Step::with_content(
        StepType::Markdown,
        "<h1>Release</h1>\nShip it.",
    ));

    // Required form step with a text field and a select field
    let mut fields = Vec::new();
    let host = codec::add_field(&mut fields, FieldType::Text);
    codec::update_field(&mut fields, host, "name", json!("host")).unwrap();
    codec::update_field(&mut fields, host, "label", json!("Hostname")).unwrap();
    let env = codec::add_field(&mut fields, FieldType::Select);
    codec::update_field(&mut fields, env, "name", json!("env")).unwrap();
    codec::add_option(&mut fields, env).unwrap();
    codec::edit_option(&mut fields, env, 0, "value", "prod").unwrap();
    codec::edit_option(&mut fields, env, 0, "label", "Production").unwrap();
    let mut form = Step::with_content(StepType::Form, codec::encode(&fields).unwrap());
    form.required = true;
    doc.steps.push(form);

    doc.steps
        .push(Step::with_content(StepType::Markdown, "<h2>Verify</h2>"));

    let mut script = Step::with_content(StepType::Script, "deploy.sh");
    codec::toggle_script_arg(&mut script.args, "host");
    codec::toggle_script_arg(&mut script.args, "env");
    doc.steps.push(script);

    doc
}

#[test]
fn store_round_trip_preserves_document() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::new(temp_dir.path());
    let doc = build_document();

    store.save_document("release", &doc).unwrap();
    let loaded = store.load_document("release").unwrap();
    assert_eq!(loaded, doc);

    // Form content survives as decodable field definitions
    let form = loaded.steps.get(1).unwrap();
    let fields = codec::decode(&form.content).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "host");
}

#[test]
fn gating_unlocks_once_the_required_form_completes() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::new(temp_dir.path());
    let doc = build_document();
    let form_id = doc.steps.get(1).unwrap().id;
    let verify_id = doc.steps.get(2).unwrap().id;
    let script_id = doc.steps.get(3).unwrap().id;

    let mut values = StepValues::default();
    let frozen = doc.steps.compute_frozen(&values);
    assert!(!frozen[&doc.steps.get(0).unwrap().id]);
    assert!(!frozen[&form_id]);
    assert!(frozen[&verify_id]);
    assert!(frozen[&script_id]);

    doc.steps.update_completed(&mut values, form_id, true).unwrap();
    store.save_values("release", &values).unwrap();

    // Re-derive from the persisted run state, as a fresh session would
    let values = store.load_values("release").unwrap();
    let frozen = doc.steps.compute_frozen(&values);
    assert!(frozen.values().all(|f| !f));
}

#[test]
fn outline_tracks_the_selected_section() {
    let doc = build_document();
    let headings = outline::extract_headings(doc.steps.as_slice());
    assert_eq!(headings.len(), 2);
    assert_eq!(outline::display_tiers(&headings), vec![0, 1]);

    let mut selection = Selection::default();
    selection.select(doc.steps.get(3).unwrap().id);

    // The script step sits after the "Verify" heading
    let position = selection.position(&doc.steps);
    let current = outline::current_heading(&headings, position).unwrap();
    assert_eq!(current.label, "Verify");

    selection.clear();
    assert!(outline::current_heading(&headings, selection.position(&doc.steps)).is_none());
}

#[test]
fn script_args_resolve_against_upstream_fields() {
    let mut doc = build_document();
    let script_id = doc.steps.get(3).unwrap().id;

    let bindings = doc.steps.resolved_args(script_id).unwrap();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].name, "host");
    assert_eq!(bindings[0].field.as_ref().unwrap().label, "Hostname");
    assert_eq!(bindings[1].name, "env");
    assert!(bindings[1].field.as_ref().unwrap().is_select());

    // Moving the script above the form dangles both references
    doc.steps.move_step(script_id, MoveDirection::Up).unwrap();
    doc.steps.move_step(script_id, MoveDirection::Up).unwrap();
    doc.steps.move_step(script_id, MoveDirection::Up).unwrap();
    assert_eq!(
        doc.steps.move_step(script_id, MoveDirection::Up).unwrap(),
        MoveOutcome::AtBoundary
    );

    let bindings = doc.steps.resolved_args(script_id).unwrap();
    assert!(bindings.iter().all(|b| b.field.is_none()));
}

#[test]
fn field_edits_round_trip_through_step_content() {
    let mut doc = build_document();
    let form_id = doc.steps.get(1).unwrap().id;

    // Decode, edit, re-encode: the write path an editor frontend uses
    let mut fields = codec::decode(&doc.steps.step(form_id).unwrap().content).unwrap();
    let added = codec::add_field(&mut fields, FieldType::Check);
    codec::update_field(&mut fields, added, "name", json!("confirm")).unwrap();
    codec::update_field(&mut fields, added, "defaultValue", json!(true)).unwrap();
    let host_id = fields[0].id;
    codec::delete_field(&mut fields, host_id).unwrap();
    let content = codec::encode(&fields).unwrap();

    // Write back through a fresh decoded copy
    let decoded = codec::decode(&content).unwrap();
    assert_eq!(decoded, fields);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[1].name, "confirm");
    assert_eq!(decoded[1].default_value, Some(json!(true)));

    // Writing the edited list back dangles the script's "host" binding
    let script_id = doc.steps.get(3).unwrap().id;
    doc.steps.update_content(form_id, content).unwrap();
    let bindings = doc.steps.resolved_args(script_id).unwrap();
    assert!(bindings[0].field.is_none());
    assert!(bindings[1].field.is_some());
}

#[test]
fn deleting_the_selected_step_clears_the_selection() {
    let mut doc = build_document();
    let verify_id = doc.steps.get(2).unwrap().id;

    let mut selection = Selection::default();
    selection.select(verify_id);

    let removed = doc.steps.delete_step(verify_id).unwrap();
    selection.note_removed(removed.id);
    assert!(selection.selected().is_none());
    assert_eq!(doc.steps.len(), 3);
}
