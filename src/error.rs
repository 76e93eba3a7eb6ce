//! Error kinds for the solver, per `spec.md` §7.
//!
//! Invalid components and cancelled dependency cycles are *not* errors —
//! the former are silently skipped during topological application, the
//! latter are resolved by edge removal. Only authoring mistakes and
//! probe-time failures surface here.

use thiserror::Error;

use crate::ids::ComponentId;

#[derive(Debug, Error)]
pub enum ContfxError {
    /// A conjunction/disjunction built with no predicates, a duplicate
    /// object inserted into a zone, or some other card-code bug caught
    /// at authoring time rather than at apply time.
    #[error("authoring error: {0}")]
    Authoring(String),

    /// A component raised while being enacted under a hypothetical
    /// overlay during dependency analysis. The solver never masks
    /// these: masking would let a later probe run against an overlay
    /// that silently diverged from what the failing component actually
    /// produced.
    #[error("component {component:?} failed during probe: {source}")]
    Probe {
        component: ComponentId,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, ContfxError>;
