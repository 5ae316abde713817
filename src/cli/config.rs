use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::binding::field::DEFAULT_ERROR_CLASS;
use crate::form::error::FormError;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-paths",
    version,
    about = "Wire names and element ids for nested forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-paths.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSONL trace of every resolution to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the name and id of one field
    Resolve {
        /// Root type name (`Admin::User`) or placeholder symbol
        #[arg(long)]
        model: String,

        /// Treat --model as a placeholder symbol used verbatim
        #[arg(long, default_value_t = false)]
        placeholder: bool,

        /// Id namespace of the root form
        #[arg(long)]
        namespace: Option<String>,

        /// Nested level as `association` or `association:index`, outermost first
        #[arg(long = "nest")]
        nest: Vec<String>,

        /// Field to resolve; empty resolves the level's prefix
        #[arg(long, default_value = "")]
        field: String,

        /// Variant value appended to the id (radio buttons)
        #[arg(long)]
        value: Option<String>,

        /// Output format: text or json
        #[arg(long)]
        format: Option<String>,
    },

    /// List every field binding of a record tree
    Manifest {
        /// YAML or JSON file holding `{ model, attributes }`
        #[arg(long)]
        input: String,

        /// Id namespace of the root form
        #[arg(long)]
        namespace: Option<String>,

        /// Output format: text or json
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Decode submitted `name=value` pairs into nested JSON
    Decode {
        /// A submitted pair, e.g. `user[addresses_attributes][0][street]=Main`
        #[arg(long = "pair")]
        pairs: Vec<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-paths.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub namespace: Option<String>,

    #[serde(default = "default_error_class")]
    pub error_class: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            error_class: DEFAULT_ERROR_CLASS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_text")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_error_class() -> String { DEFAULT_ERROR_CLASS.to_string() }
fn default_text() -> String { "text".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-paths.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

/// `addresses` -> (`addresses`, None); `addresses:2` -> (`addresses`, Some(2))
pub fn parse_nest(spec: &str) -> Result<(String, Option<usize>), FormError> {
    let (association, index) = match spec.split_once(':') {
        Some((association, index)) => {
            let index = index.trim().parse::<usize>().map_err(|_| {
                FormError::InvalidInput(format!(
                    "index in '{}' must be a non-negative integer",
                    spec
                ))
            })?;
            (association, Some(index))
        }
        None => (spec, None),
    };

    let association = association.trim();
    if association.is_empty() {
        return Err(FormError::InvalidInput(format!(
            "nesting '{}' has no association name",
            spec
        )));
    }
    Ok((association.to_string(), index))
}

/// `name=value`; the value may itself contain `=`.
pub fn parse_pair(pair: &str) -> Result<(&str, &str), FormError> {
    pair.split_once('=').ok_or_else(|| {
        FormError::InvalidInput(format!("pair '{}' is not of the form name=value", pair))
    })
}
