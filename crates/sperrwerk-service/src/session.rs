// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Token-to-actor resolution and role guards.
//
// Every operation calls these explicitly at its top, before any registry
// or decision-engine work — straight-line guards instead of implicit
// handler wrapping, and no request-scoped hidden state.

use sperrwerk_core::error::{Result, SperrwerkError};
use sperrwerk_core::types::{ADMIN_TOKEN, Actor, Principal, PrincipalId};
use sperrwerk_store::MetadataStore;

/// Resolve an opaque access token to an [`Actor`].
///
/// The reserved literal `"ADMIN"` denotes the administrative identity and
/// never resolves through the directory.  Any other token must parse as a
/// principal id and match a stored row; everything else is an
/// authentication failure.
pub fn resolve_actor(token: &str, directory: &MetadataStore) -> Result<Actor> {
    if token == ADMIN_TOKEN {
        return Ok(Actor::Admin);
    }

    let id: PrincipalId = token
        .parse()
        .map_err(|_| SperrwerkError::Unauthorized("invalid access token".into()))?;

    match directory.principal_by_id(id)? {
        Some(principal) => Ok(Actor::User(principal)),
        None => Err(SperrwerkError::Unauthorized("unknown principal".into())),
    }
}

/// Require the administrative identity (principal-management operations).
pub fn require_admin(actor: &Actor) -> Result<()> {
    match actor {
        Actor::Admin => Ok(()),
        Actor::User(_) => Err(SperrwerkError::Unauthorized(
            "administrative credentials required".into(),
        )),
    }
}

/// Require a registered principal (resource operations).
///
/// The administrative identity has no clearance and is never a subject of
/// BLP checks, so it cannot act on resources.
pub fn require_user(actor: &Actor) -> Result<&Principal> {
    match actor {
        Actor::User(principal) => Ok(principal),
        Actor::Admin => Err(SperrwerkError::Unauthorized(
            "the administrative identity cannot act on resources".into(),
        )),
    }
}
