// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Access decision engine — Bell-LaPadula confidentiality rules plus the
// discretionary ownership rule for deletion.
//
// The engine is a pure function over metadata: it never touches content,
// so it is independent of content size and safe to call before any I/O
// against the content store.

use sperrwerk_core::types::{Principal, Resource};

/// The kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Full fetch of the content.
    Read,
    /// Any content mutation — overwrite and append are the same to BLP.
    Write,
    /// Removal of the resource.  Gated by ownership, not classification.
    Delete,
}

/// Outcome of an access decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied, with a human-readable reason for diagnostics.
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decide whether `principal` may perform `mode` on `resource`.
///
/// - Read: no-read-up.  The clearance must dominate the classification.
/// - Write: no-write-down (the *-property).  The clearance must be
///   dominated by the classification.
/// - Delete: discretionary.  Only the owner may delete, at any level.
///
/// Equal levels satisfy both BLP relations (the bounds are inclusive).
pub fn decide(principal: &Principal, resource: &Resource, mode: AccessMode) -> Decision {
    match mode {
        AccessMode::Read => {
            if principal.clearance.dominates(resource.classification) {
                Decision::Allow
            } else {
                Decision::Deny(format!(
                    "clearance {} may not read classification {}",
                    principal.clearance, resource.classification
                ))
            }
        }
        AccessMode::Write => {
            if principal.clearance.is_dominated_by(resource.classification) {
                Decision::Allow
            } else {
                Decision::Deny(format!(
                    "clearance {} may not write to classification {}",
                    principal.clearance, resource.classification
                ))
            }
        }
        AccessMode::Delete => {
            if principal.id == resource.owner {
                Decision::Allow
            } else {
                Decision::Deny("the resource can be deleted only by its owner".into())
            }
        }
    }
}
