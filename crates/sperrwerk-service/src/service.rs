// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The lifecycle coordinator.  Each operation resolves the caller's
// identity first, consults the registry, asks the decision engine, and
// only then touches the content store.
//
// Ordering rules: on create and delete the registry commit happens before
// the content-store effect.  If the content step then fails the registry
// change stands and the entry is orphaned — accepted, logged at warn, and
// the error still propagates.

use chrono::Utc;
use tracing::{info, instrument, warn};

use sperrwerk_core::config::ServiceConfig;
use sperrwerk_core::error::{Result, SperrwerkError};
use sperrwerk_core::types::{
    Principal, PrincipalId, PublicPrincipal, Resource, ResourceId, SecurityLevel,
};
use sperrwerk_security::credential::{hash_secret, verify_secret};
use sperrwerk_security::policy::{AccessMode, Decision, decide};
use sperrwerk_store::{ContentStore, MetadataStore};

use crate::session::{require_admin, require_user, resolve_actor};

/// One service instance: the metadata database plus the content store.
///
/// Constructed once at startup and passed around by reference — there is
/// no process-global state.  The decision engine itself is pure, so the
/// only shared mutable state is inside the two collaborators.
pub struct Sperrwerk {
    meta: MetadataStore,
    content: ContentStore,
}

impl Sperrwerk {
    /// Open a service instance from its configuration.
    pub fn open(config: &ServiceConfig) -> Result<Self> {
        let meta = MetadataStore::open(&config.db_path)?;
        let content = ContentStore::open(&config.content_dir, config.purge_content_on_start)?;
        Ok(Self { meta, content })
    }

    /// Assemble a service instance from already-open collaborators
    /// (used by tests that want an in-memory database).
    pub fn from_parts(meta: MetadataStore, content: ContentStore) -> Self {
        Self { meta, content }
    }

    // -- Principal management (admin-only) --

    /// Register a new principal with the given clearance.
    ///
    /// The secret is salted and digested before storage; the plaintext is
    /// never persisted.  A duplicate contact address is a conflict.
    #[instrument(skip(self, token, secret), fields(%contact_address, %clearance))]
    pub fn create_principal(
        &self,
        token: &str,
        name: &str,
        contact_address: &str,
        secret: &str,
        clearance: SecurityLevel,
    ) -> Result<PublicPrincipal> {
        let actor = resolve_actor(token, &self.meta)?;
        require_admin(&actor)?;

        let credential = hash_secret(secret, None)?;
        let principal = Principal {
            id: PrincipalId::new(),
            name: name.to_owned(),
            contact_address: contact_address.to_owned(),
            credential_digest: credential.digest,
            credential_salt: credential.salt,
            clearance,
            created_at: Utc::now(),
        };
        self.meta.insert_principal(&principal)?;

        info!(id = %principal.id, "principal created");
        Ok(principal.to_public())
    }

    /// Remove a principal.  Resources it owns are left behind.
    #[instrument(skip(self, token), fields(%id))]
    pub fn delete_principal(&self, token: &str, id: PrincipalId) -> Result<()> {
        let actor = resolve_actor(token, &self.meta)?;
        require_admin(&actor)?;

        if !self.meta.delete_principal(id)? {
            return Err(SperrwerkError::NotFound(format!("principal {id}")));
        }

        info!("principal deleted");
        Ok(())
    }

    /// Exchange a contact address and secret for the principal's id (the
    /// access token for subsequent requests).
    ///
    /// An unknown address and a wrong secret produce the same failure, so
    /// the response does not reveal which principals exist.
    #[instrument(skip(self, secret), fields(%contact_address))]
    pub fn authenticate(&self, contact_address: &str, secret: &str) -> Result<PrincipalId> {
        let denied = || SperrwerkError::Unauthorized("bad user or password".into());

        let Some(principal) = self.meta.principal_by_address(contact_address)? else {
            return Err(denied());
        };

        if verify_secret(secret, &principal.credential_salt, &principal.credential_digest)? {
            Ok(principal.id)
        } else {
            Err(denied())
        }
    }

    // -- Resource lifecycle --

    /// Create a named resource owned by the caller.
    ///
    /// The classification is forced to the caller's clearance; callers
    /// cannot choose.  The registry insert commits first, then the empty
    /// content entry is created.
    #[instrument(skip(self, token), fields(%name))]
    pub fn create_resource(&self, token: &str, name: &str) -> Result<Resource> {
        let actor = resolve_actor(token, &self.meta)?;
        let user = require_user(&actor)?;

        let resource = Resource {
            id: ResourceId::new(),
            name: name.to_owned(),
            classification: user.clearance,
            owner: user.id,
            created_at: Utc::now(),
        };
        self.meta.insert_resource(&resource)?;

        if let Err(e) = self.content.create(name) {
            warn!(error = %e, "registry record committed but content creation failed; entry orphaned");
            return Err(e);
        }

        info!(id = %resource.id, classification = %resource.classification, "resource created");
        Ok(resource)
    }

    /// Fetch the full content of a resource (no-read-up).
    #[instrument(skip(self, token), fields(%name))]
    pub fn read_resource(&self, token: &str, name: &str) -> Result<Vec<u8>> {
        let actor = resolve_actor(token, &self.meta)?;
        let user = require_user(&actor)?;
        let resource = self.lookup(name)?;

        match decide(user, &resource, AccessMode::Read) {
            Decision::Allow => self.content.read(name),
            Decision::Deny(reason) => Err(SperrwerkError::Unauthorized(reason)),
        }
    }

    /// Replace a resource's content wholesale (no-write-down).
    #[instrument(skip(self, token, content), fields(%name, len = content.len()))]
    pub fn overwrite_resource(&self, token: &str, name: &str, content: &[u8]) -> Result<()> {
        let actor = resolve_actor(token, &self.meta)?;
        let user = require_user(&actor)?;
        let resource = self.lookup(name)?;

        match decide(user, &resource, AccessMode::Write) {
            Decision::Allow => self.content.overwrite(name, content),
            Decision::Deny(reason) => Err(SperrwerkError::Unauthorized(reason)),
        }
    }

    /// Append to a resource's content (no-write-down).  Existing bytes
    /// come first, the new bytes follow, no separator is inserted.
    #[instrument(skip(self, token, content), fields(%name, len = content.len()))]
    pub fn append_resource(&self, token: &str, name: &str, content: &[u8]) -> Result<()> {
        let actor = resolve_actor(token, &self.meta)?;
        let user = require_user(&actor)?;
        let resource = self.lookup(name)?;

        match decide(user, &resource, AccessMode::Write) {
            Decision::Allow => self.content.append(name, content),
            Decision::Deny(reason) => Err(SperrwerkError::Unauthorized(reason)),
        }
    }

    /// Delete a resource.  Only its owner may, at any classification.
    ///
    /// The registry record is removed first; content removal follows.
    #[instrument(skip(self, token), fields(%name))]
    pub fn delete_resource(&self, token: &str, name: &str) -> Result<()> {
        let actor = resolve_actor(token, &self.meta)?;
        let user = require_user(&actor)?;
        let resource = self.lookup(name)?;

        if let Decision::Deny(reason) = decide(user, &resource, AccessMode::Delete) {
            return Err(SperrwerkError::Unauthorized(reason));
        }

        self.meta.delete_resource(name)?;
        if let Err(e) = self.content.remove(name) {
            warn!(error = %e, "registry record removed but content removal failed; bytes orphaned");
            return Err(e);
        }

        info!("resource deleted");
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Resource> {
        self.meta
            .resource_by_name(name)?
            .ok_or_else(|| SperrwerkError::FileNotExists(name.to_owned()))
    }
}
