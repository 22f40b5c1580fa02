//! Validation errors surfaced by [`schedule`](crate::schedule).
//!
//! Every error is raised before the engine takes its first step, so callers
//! never observe a partially simulated run. Variants carry the name of the
//! offending field plus a human-readable reason; the reason text is not
//! stable for machine parsing.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SimError {
    /// The workload itself is malformed (empty, zero burst, negative arrival,
    /// duplicate id).
    InvalidWorkload { field: &'static str, reason: String },
    /// A policy parameter is out of range or the MLFQ level tables are
    /// inconsistent.
    InvalidPolicyParameter { param: &'static str, reason: String },
    /// The policy selector did not name a known policy.
    UnknownPolicy { name: String },
}

impl SimError {
    pub(crate) fn workload(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidWorkload {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn param(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPolicyParameter {
            param,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWorkload { field, reason } => {
                write!(f, "invalid workload: {field}: {reason}")
            }
            Self::InvalidPolicyParameter { param, reason } => {
                write!(f, "invalid policy parameter: {param}: {reason}")
            }
            Self::UnknownPolicy { name } => write!(
                f,
                "unknown policy {name:?} (expected one of fifo, sjf, srtf, rr, mlfq)"
            ),
        }
    }
}

impl std::error::Error for SimError {}
