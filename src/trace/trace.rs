use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::form::form_node::NodeId;

/// What a trace event resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Expand,
    Name,
    Id,
}

/// One line of the JSONL render trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub kind: TraceKind,

    pub node: usize,
    pub depth: usize,

    pub field: Option<String>,
    pub association: Option<String>,
    pub output: Option<String>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(kind: TraceKind, node: NodeId, depth: usize) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            kind,
            node: node.0,
            depth,
            field: None,
            association: None,
            output: None,
            error: None,
        }
    }

    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_association(mut self, association: impl ToString) -> Self {
        self.association = Some(association.to_string());
        self
    }

    pub fn with_output(mut self, output: impl ToString) -> Self {
        self.output = Some(output.to_string());
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
