use std::path::Path;

use serde::Serialize;

use crate::binding::field::{AttributeErrors, AttributeValues};
use crate::cli::config::{parse_nest, parse_pair};
use crate::form::form_node::{BoundValue, FormOptions, Nesting};
use crate::form::record::Record;
use crate::form::resolver::DefaultResolver;
use crate::form::tree::FormTree;
use crate::path::decode::decode_pairs;
use crate::path::resolver::{resolve_id, resolve_name};
use crate::render::manifest::{Collaborators, FormManifest, RenderOptions, render_record};
use crate::trace::logger::TraceLogger;

// ============================================================================
// resolve subcommand
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveOutput {
    pub name: String,
    pub id: String,
}

/// Builds a one-path tree (root plus each `--nest` level) and resolves the
/// field at its deepest node.
pub fn cmd_resolve(
    model: &str,
    placeholder: bool,
    namespace: Option<&str>,
    nest: &[String],
    field: &str,
    value: Option<&str>,
    verbose: u8,
) -> Result<ResolveOutput, Box<dyn std::error::Error>> {
    let resolver = DefaultResolver;
    let mut tree = FormTree::new();

    let bound = if placeholder {
        BoundValue::Placeholder(model.to_string())
    } else {
        BoundValue::Concrete(Record::new(model))
    };
    let mut options = FormOptions::root();
    options.namespace = namespace.map(str::to_string);
    let mut current = tree.root(Some(bound), options, &resolver)?;

    for level in nest {
        let (association, index) = parse_nest(level)?;
        let nesting = Nesting::new(current, association.as_str(), index);
        current = tree.nest(nesting, Some(BoundValue::Placeholder(association)), &resolver)?;
    }

    if verbose > 1 {
        eprintln!("Resolving '{}' at depth {}", field, tree.depth(current)?);
    }

    Ok(ResolveOutput {
        name: resolve_name(&tree, current, field)?,
        id: resolve_id(&tree, current, field, value)?,
    })
}

pub fn format_resolve(output: &ResolveOutput, format: &str) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(output)?)),
        _ => Ok(format!("name: {}\nid:   {}\n", output.name, output.id)),
    }
}

// ============================================================================
// manifest subcommand
// ============================================================================

pub fn cmd_manifest(
    input: &str,
    namespace: Option<&str>,
    error_class: &str,
    tracer: &TraceLogger,
    verbose: u8,
) -> Result<FormManifest, Box<dyn std::error::Error>> {
    let record = load_record(input)?;

    if verbose > 0 {
        eprintln!("Rendering manifest for {} from {}...", record.model, input);
    }

    let options = RenderOptions {
        namespace: namespace.map(str::to_string),
        error_class: error_class.to_string(),
        ..RenderOptions::default()
    };
    let with = Collaborators {
        resolver: &DefaultResolver,
        errors: &AttributeErrors,
        values: &AttributeValues,
        tracer,
    };
    let manifest = render_record(record, &options, &with)?;

    if verbose > 0 {
        eprintln!(
            "  {} nodes, {} fields",
            manifest.nodes.len(),
            manifest.entries.len()
        );
    }

    Ok(manifest)
}

/// Load a record from a `.json` file, or YAML for any other extension.
pub fn load_record(path: &str) -> Result<Record, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .map_or(false, |e| e == "json");

    let record: Record = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(record)
}

pub fn format_manifest(manifest: &FormManifest, format: &str) -> Result<String, Box<dyn std::error::Error>> {
    if format == "json" {
        return Ok(format!("{}\n", serde_json::to_string_pretty(manifest)?));
    }

    let mut out = format!("{} ({})\n", manifest.model_name, manifest.fingerprint);
    for node in &manifest.nodes {
        let indent = "  ".repeat(node.depth);
        out.push_str(&format!("{}{}\n", indent, node.name_prefix));
        for entry in manifest.entries.iter().filter(|e| e.node == node.node) {
            let marker = if entry.binding.invalid { " !" } else { "" };
            out.push_str(&format!(
                "{}  {} #{} = {:?}{}\n",
                indent, entry.binding.name, entry.binding.id, entry.binding.value, marker
            ));
        }
    }
    Ok(out)
}

// ============================================================================
// decode subcommand
// ============================================================================

pub fn cmd_decode(pairs: &[String]) -> Result<String, Box<dyn std::error::Error>> {
    let parsed = pairs
        .iter()
        .map(|p| parse_pair(p))
        .collect::<Result<Vec<_>, _>>()?;
    let params = decode_pairs(parsed)?;
    Ok(format!("{}\n", serde_json::to_string_pretty(&params)?))
}
