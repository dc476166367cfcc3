//! Alias resolution across the contextual and global tables.
//!
//! The contextual table (scoped to one load operation) is applied first and
//! its output is fed into the global table. It is a chain, not a choice:
//! a name mapped by the context may be mapped again globally.

use super::table::{AliasMatch, MappingTable, MatchKind};
use super::trace::{steps, warning_codes, ResolveTrace, ResolveTraceStep, TraceWarning};
use serde::Serialize;

/// Trace label for the per-call table.
pub const CONTEXT_TABLE: &str = "context";
/// Trace label for the store-wide table.
pub const GLOBAL_TABLE: &str = "global";

/// Resolve `name` through an optional contextual table, then the global one.
///
/// Total: a name nothing maps resolves to itself.
#[must_use]
pub fn resolve_alias(name: &str, context: Option<&MappingTable>, global: &MappingTable) -> String {
    let intermediate = match context {
        Some(table) => table.resolve_one(name),
        None => name.to_string(),
    };

    if global.is_empty() {
        intermediate
    } else {
        global.resolve_one(&intermediate)
    }
}

/// Result of a traced resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Name as requested.
    pub specifier: String,
    /// Name after both tables.
    pub resolved: String,
    pub trace: ResolveTrace,
}

impl Resolution {
    /// Whether any table rule fired.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.trace.fired().next().is_some()
    }
}

/// Same as [`resolve_alias`], recording each table's decision.
#[must_use]
pub fn resolve_alias_with_trace(
    name: &str,
    context: Option<&MappingTable>,
    global: &MappingTable,
) -> Resolution {
    let mut trace = ResolveTrace::new();

    let (intermediate, context_mapped) = match context {
        Some(table) => {
            let m = table.lookup(name);
            trace.add_step(match_step(CONTEXT_TABLE, name, &m));
            let mapped = m.is_mapped();
            (m.resolved, mapped)
        }
        None => {
            trace.skipped(steps::CONTEXT_MAP, "no contextual map supplied");
            (name.to_string(), false)
        }
    };

    let resolved = if global.is_empty() {
        trace.skipped(steps::GLOBAL_MAP, "global map is empty");
        intermediate
    } else {
        let m = global.lookup(&intermediate);
        trace.add_step(match_step(GLOBAL_TABLE, &intermediate, &m));
        if context_mapped && m.is_mapped() {
            trace.add_warning(TraceWarning::new(
                warning_codes::REMAPPED_BY_GLOBAL,
                format!(
                    "contextual result '{intermediate}' was mapped again to '{}'",
                    m.resolved
                ),
            ));
        }
        m.resolved
    };

    if trace.fired().next().is_none() {
        trace.add_warning(TraceWarning::new(
            warning_codes::UNMAPPED,
            format!("no alias matched '{name}'; it resolves to itself"),
        ));
    }

    Resolution {
        specifier: name.to_string(),
        resolved,
        trace,
    }
}

fn match_step(table: &'static str, input: &str, m: &AliasMatch) -> ResolveTraceStep {
    let alias = m.alias.as_deref().unwrap_or_default();
    let (step, detail) = match m.kind {
        MatchKind::DirectKey => (
            steps::DIRECT_KEY,
            format!("'{input}' is a key of the {table} map"),
        ),
        MatchKind::ExactMatch => (
            steps::EXACT_MATCH,
            format!("exact alias '{alias}' matched '{input}'"),
        ),
        MatchKind::PartialMatch => (
            steps::PARTIAL_MATCH,
            format!("alias '{alias}' is a path prefix of '{input}'"),
        ),
        MatchKind::Wildcard => (
            steps::WILDCARD,
            format!("wildcard handler of the {table} map mapped '{input}'"),
        ),
        MatchKind::Identity => (
            steps::IDENTITY,
            format!("no rule in the {table} map matched '{input}'"),
        ),
    };

    let mut trace_step = ResolveTraceStep::new(step, m.is_mapped(), detail)
        .with_table(table)
        .with_target(&m.resolved);
    if let Some(alias) = &m.alias {
        trace_step = trace_step.with_key(alias);
    }
    if m.kind == MatchKind::PartialMatch {
        let remainder = input.get(alias.len()..).unwrap_or_default();
        if !remainder.is_empty() {
            trace_step = trace_step.with_note(format!(
                "kept remainder '{remainder}' after replacing '{alias}'"
            ));
        }
    }
    trace_step
}
