//! Resolution tracing for the `explainResolutions` diagnostic channel.
//!
//! Records which table was consulted, which rule fired and what it
//! produced, without changing the resolved name.

use serde::Serialize;

/// A single step in the resolution trace.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveTraceStep {
    /// Step name (see [`steps`]).
    pub step: &'static str,
    /// Whether this step mapped the name.
    pub ok: bool,
    /// Human-readable description of what happened.
    pub detail: String,
    /// Table consulted ("context" or "global").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<&'static str>,
    /// Alias key matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Name produced by this step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ResolveTraceStep {
    /// Create a new trace step.
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            table: None,
            key: None,
            target: None,
            notes: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Warning generated during resolution.
#[derive(Debug, Clone, Serialize)]
pub struct TraceWarning {
    pub code: &'static str,
    pub message: String,
}

impl TraceWarning {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Complete resolution trace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveTrace {
    pub steps: Vec<ResolveTraceStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl ResolveTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: ResolveTraceStep) {
        self.steps.push(step);
    }

    pub fn add_warning(&mut self, warning: TraceWarning) {
        self.warnings.push(warning);
    }

    /// Add a simple skipped step.
    pub fn skipped(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(ResolveTraceStep::new(step, false, detail));
    }

    /// Names of the steps that mapped the name, in order.
    pub fn fired(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().filter(|s| s.ok).map(|s| s.step)
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const CONTEXT_MAP: &str = "context_map";
    pub const GLOBAL_MAP: &str = "global_map";
    pub const DIRECT_KEY: &str = "direct_key";
    pub const EXACT_MATCH: &str = "exact_match";
    pub const PARTIAL_MATCH: &str = "partial_match";
    pub const WILDCARD: &str = "wildcard";
    pub const IDENTITY: &str = "identity";
    pub const REGISTRY_HIT: &str = "registry_hit";
}

/// Warning codes used in resolution tracing.
pub mod warning_codes {
    /// No table mapped the name; it resolves to itself.
    pub const UNMAPPED: &str = "unmapped";
    /// The contextual result was mapped again by the global table.
    pub const REMAPPED_BY_GLOBAL: &str = "remapped_by_global";
}
