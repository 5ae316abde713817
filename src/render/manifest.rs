use serde::Serialize;
use serde_json::Value;

use crate::binding::field::{Binder, DEFAULT_ERROR_CLASS, ErrorLookup, FieldBinding, ValueAccessor};
use crate::form::error::FormError;
use crate::form::form_node::{BoundValue, FormOptions, NodeId};
use crate::form::record::Record;
use crate::form::resolver::ObjectResolver;
use crate::form::tree::FormTree;
use crate::path::resolver::{resolve_id, resolve_name};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

// ============================================================================
// Render pass over a whole record tree
// ============================================================================

/// Settings for one render pass.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Id prefix for the root form (default none)
    pub namespace: Option<String>,

    /// Class appended to fields with errors (default `invalid`)
    pub error_class: String,

    /// Attributes that are bookkeeping, not form fields
    pub skip_fields: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            error_class: DEFAULT_ERROR_CLASS.to_string(),
            skip_fields: vec!["errors".to_string(), "new_record".to_string()],
        }
    }
}

/// One level of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub node: usize,
    pub depth: usize,
    pub association: Option<String>,
    pub index: Option<usize>,
    /// Name with no field: the prefix every field of this node shares
    pub name_prefix: String,
    pub id_prefix: String,
    pub persisted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub node: usize,
    pub field: String,
    #[serde(flatten)]
    pub binding: FieldBinding,
}

/// Every field a form over one record tree would render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormManifest {
    pub model_name: String,
    pub nodes: Vec<NodeSummary>,
    pub entries: Vec<ManifestEntry>,
    /// SHA-1 over the sorted wire names; changes when the form's shape does
    pub fingerprint: String,
}

impl FormManifest {
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.binding.name.as_str()).collect()
    }

    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.binding.name == name)
    }
}

/// Capabilities a render pass needs from the host.
pub struct Collaborators<'a> {
    pub resolver: &'a dyn ObjectResolver,
    pub errors: &'a dyn ErrorLookup,
    pub values: &'a dyn ValueAccessor,
    pub tracer: &'a TraceLogger,
}

/// Builds the tree for `root`, expands every association depth-first and
/// binds every plain field. Plain fields of a node come before its children.
pub fn render_manifest(
    root: BoundValue,
    options: &RenderOptions,
    with: &Collaborators<'_>,
) -> Result<FormManifest, FormError> {
    let mut tree = FormTree::new();
    let mut form_options = FormOptions::root();
    form_options.namespace = options.namespace.clone();
    let root_id = tree.root(Some(root), form_options, with.resolver)?;

    let mut order = Vec::new();
    expand(&mut tree, root_id, options, with, &mut order)?;

    let binder = Binder::new(&tree, with.errors, with.values).with_error_class(options.error_class.clone());
    let mut nodes = Vec::with_capacity(order.len());
    let mut entries = Vec::new();

    for (node, fields) in &order {
        let depth = tree.depth(*node)?;
        let form = tree.node(*node)?;

        nodes.push(NodeSummary {
            node: node.0,
            depth,
            association: form.association().map(str::to_string),
            index: form.index(),
            name_prefix: resolve_name(&tree, *node, "")?,
            id_prefix: resolve_id(&tree, *node, "", None)?,
            persisted_id: binder.nested_object_id(*node)?,
        });

        for field in fields {
            let binding = binder.bind_field(*node, field, None)?;
            with.tracer.log(
                &TraceEvent::now(TraceKind::Name, *node, depth)
                    .with_field(field)
                    .with_output(&binding.name),
            );
            with.tracer.log(
                &TraceEvent::now(TraceKind::Id, *node, depth)
                    .with_field(field)
                    .with_output(&binding.id),
            );
            entries.push(ManifestEntry {
                node: node.0,
                field: field.clone(),
                binding,
            });
        }
    }

    let fingerprint = names_fingerprint(entries.iter().map(|e| e.binding.name.as_str()));

    Ok(FormManifest {
        model_name: tree.node(root_id)?.model_name().to_string(),
        nodes,
        entries,
        fingerprint,
    })
}

/// Depth-first: records `(node, plain fields)` then recurses into each
/// association in attribute order.
fn expand(
    tree: &mut FormTree,
    node: NodeId,
    options: &RenderOptions,
    with: &Collaborators<'_>,
    order: &mut Vec<(NodeId, Vec<String>)>,
) -> Result<(), FormError> {
    let depth = tree.depth(node)?;
    let mut fields = Vec::new();
    let mut associations = Vec::new();

    for (key, value) in &tree.node(node)?.object().attributes {
        if options.skip_fields.iter().any(|s| s == key) {
            continue;
        }
        if is_association(value) {
            associations.push(key.clone());
        } else {
            fields.push(key.clone());
        }
    }
    order.push((node, fields));

    for association in associations {
        let children = match tree.expand_association(node, &association, None, with.resolver) {
            Ok(children) => children,
            Err(e) => {
                with.tracer.log(
                    &TraceEvent::now(TraceKind::Expand, node, depth)
                        .with_association(&association)
                        .with_error(&e),
                );
                return Err(e);
            }
        };
        with.tracer.log(
            &TraceEvent::now(TraceKind::Expand, node, depth)
                .with_association(&association)
                .with_output(children.len()),
        );
        for child in children {
            expand(tree, child, options, with, order)?;
        }
    }

    Ok(())
}

/// Objects, and arrays made only of objects, are nested records. An empty
/// array counts as an empty collection.
pub fn is_association(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().all(Value::is_object),
        _ => false,
    }
}

pub fn names_fingerprint<'a>(names: impl Iterator<Item = &'a str>) -> String {
    use sha1::{Digest, Sha1};

    let mut sorted: Vec<&str> = names.collect();
    sorted.sort_unstable();

    let mut hasher = Sha1::new();
    for name in sorted {
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Convenience for a concrete root record.
pub fn render_record(
    record: Record,
    options: &RenderOptions,
    with: &Collaborators<'_>,
) -> Result<FormManifest, FormError> {
    render_manifest(BoundValue::Concrete(record), options, with)
}
