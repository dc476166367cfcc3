//! Module-name alias resolution.
//!
//! Tables map logical names onto registered names; the resolver chains a
//! per-call contextual table into the global table. Tracing reports which
//! rule fired for `explainResolutions`.

mod alias;
mod table;
pub mod trace;

pub use alias::{
    resolve_alias, resolve_alias_with_trace, Resolution, CONTEXT_TABLE, GLOBAL_TABLE,
};
pub use table::{AliasMatch, MappingEntry, MappingTable, MatchKind, WildcardFn};
pub use trace::{
    steps as trace_steps, warning_codes as trace_warning_codes, ResolveTrace, ResolveTraceStep,
    TraceWarning,
};
