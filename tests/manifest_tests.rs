use std::io::BufRead;

use form_paths::binding::field::{AttributeErrors, AttributeValues, NoErrors};
use form_paths::form::form_node::BoundValue;
use form_paths::form::record::Record;
use form_paths::form::resolver::{DefaultResolver, RegistryResolver};
use form_paths::render::manifest::{
    Collaborators, RenderOptions, is_association, names_fingerprint, render_manifest, render_record,
};
use form_paths::trace::logger::TraceLogger;
use serde_json::json;

use crate::common::utils::temp_path;

mod common;

fn signup() -> Record {
    Record::new("User")
        .with("addresses", json!([
            { "id": 1, "street": "Main" },
            { "street": "Side" }
        ]))
        .with("errors", json!({ "name": ["can't be blank"] }))
        .with("name", "")
        .with("profile", json!({ "bio": "hi" }))
}

fn render(record: Record, options: &RenderOptions) -> form_paths::render::manifest::FormManifest {
    let tracer = TraceLogger::disabled();
    let with = Collaborators {
        resolver: &DefaultResolver,
        errors: &AttributeErrors,
        values: &AttributeValues,
        tracer: &tracer,
    };
    render_record(record, options, &with).unwrap()
}

// =========================================================================
// Layout
// =========================================================================

#[test]
fn manifest_lists_every_field_depth_first() {
    let manifest = render(signup(), &RenderOptions::default());

    assert_eq!(manifest.model_name, "user");
    assert_eq!(
        manifest.names(),
        vec![
            "user[name]",
            "user[addresses_attributes][0][id]",
            "user[addresses_attributes][0][street]",
            "user[addresses_attributes][1][street]",
            "user[profile_attributes][bio]",
        ]
    );
}

#[test]
fn manifest_node_summaries() {
    let manifest = render(signup(), &RenderOptions::default());

    assert_eq!(manifest.nodes.len(), 4);
    let root = &manifest.nodes[0];
    assert_eq!(root.depth, 0);
    assert_eq!(root.name_prefix, "user");
    assert_eq!(root.association, None);

    let first = &manifest.nodes[1];
    assert_eq!(first.depth, 1);
    assert_eq!(first.association.as_deref(), Some("addresses"));
    assert_eq!(first.index, Some(0));
    assert_eq!(first.name_prefix, "user[addresses_attributes][0]");
    assert_eq!(first.id_prefix, "user_addresses_attributes_0");
    assert_eq!(first.persisted_id.as_deref(), Some("1"));

    assert_eq!(manifest.nodes[2].persisted_id, None);
    assert_eq!(manifest.nodes[3].index, None);
    assert_eq!(manifest.nodes[3].name_prefix, "user[profile_attributes]");
}

#[test]
fn manifest_entries_carry_bindings() {
    let manifest = render(signup(), &RenderOptions::default());

    let name = manifest.entry("user[name]").unwrap();
    assert_eq!(name.field, "name");
    assert!(name.binding.invalid);
    assert_eq!(name.binding.css_class.as_deref(), Some("invalid"));

    let street = manifest.entry("user[addresses_attributes][1][street]").unwrap();
    assert_eq!(street.binding.value, "Side");
    assert_eq!(street.binding.id, "user_addresses_attributes_1_street");
    assert_eq!(street.node, 2);
}

#[test]
fn manifest_namespace_and_error_class() {
    let options = RenderOptions {
        namespace: Some("admin".to_string()),
        error_class: "error".to_string(),
        ..RenderOptions::default()
    };
    let manifest = render(signup(), &options);

    let name = manifest.entry("user[name]").unwrap();
    assert_eq!(name.binding.id, "admin_user_name");
    assert_eq!(name.binding.css_class.as_deref(), Some("error"));
    assert_eq!(
        manifest.entry("user[profile_attributes][bio]").unwrap().binding.id,
        "admin_user_profile_attributes_bio"
    );
}

#[test]
fn placeholder_root_uses_symbol_as_model_name() {
    let tracer = TraceLogger::disabled();
    let resolver = RegistryResolver::new().register("member", Record::new("Account").with("email", "a@b.c"));
    let with = Collaborators {
        resolver: &resolver,
        errors: &NoErrors,
        values: &AttributeValues,
        tracer: &tracer,
    };

    let manifest = render_manifest(
        BoundValue::Placeholder("member".into()),
        &RenderOptions::default(),
        &with,
    )
    .unwrap();

    assert_eq!(manifest.names(), vec!["member[email]"]);
    assert_eq!(manifest.entries[0].binding.value, "a@b.c");
}

// =========================================================================
// Fingerprint
// =========================================================================

#[test]
fn fingerprint_tracks_shape_not_values() {
    let a = render(signup(), &RenderOptions::default());
    let b = render(signup().with("name", "Bob"), &RenderOptions::default());
    let c = render(signup().with("zip", "12345"), &RenderOptions::default());

    assert_eq!(a.fingerprint.len(), 40);
    assert_eq!(a.fingerprint, b.fingerprint, "Values do not change the shape");
    assert_ne!(a.fingerprint, c.fingerprint, "A new field does");
}

#[test]
fn fingerprint_ignores_order() {
    let forward = names_fingerprint(["a[x]", "a[y]"].into_iter());
    let backward = names_fingerprint(["a[y]", "a[x]"].into_iter());
    assert_eq!(forward, backward);
}

#[test]
fn association_shapes() {
    assert!(is_association(&json!({ "a": 1 })));
    assert!(is_association(&json!([{ "a": 1 }])));
    assert!(is_association(&json!([])), "Empty collection");
    assert!(!is_association(&json!(["a"])));
    assert!(!is_association(&json!("text")));
    assert!(!is_association(&json!(null)));
}

// =========================================================================
// Trace
// =========================================================================

#[test]
fn render_pass_writes_trace_lines() {
    let path = temp_path("manifest_trace.jsonl");
    std::fs::remove_file(&path).ok();

    let tracer = TraceLogger::new(path.to_str().unwrap());
    assert!(tracer.is_enabled());
    let with = Collaborators {
        resolver: &DefaultResolver,
        errors: &AttributeErrors,
        values: &AttributeValues,
        tracer: &tracer,
    };
    render_record(signup(), &RenderOptions::default(), &with).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let lines: Vec<serde_json::Value> = std::io::BufReader::new(file)
        .lines()
        .map(|l| serde_json::from_str(&l.unwrap()).unwrap())
        .collect();

    // 5 fields x (name + id) + 2 association expansions at the root
    assert_eq!(lines.len(), 12);
    assert_eq!(lines.iter().filter(|l| l["kind"] == "expand").count(), 2);
    assert!(lines.iter().any(|l| l["output"] == "user[addresses_attributes][0][street]"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn disabled_tracer_is_silent() {
    let tracer = TraceLogger::open(None);
    assert!(!tracer.is_enabled());
}
