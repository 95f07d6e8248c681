// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Sperrwerk MLS file service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::SperrwerkError;

/// Classification rank used both as a principal's clearance and a
/// resource's classification.
///
/// The four ranks form a simple linear lattice: every pair of levels is
/// comparable, there are no compartments or categories.  Variant order is
/// significant — `Ord` derives the lattice order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityLevel {
    Unclassified,
    Restricted,
    Secret,
    TopSecret,
}

impl SecurityLevel {
    /// All levels in ascending lattice order.
    pub const ALL: [SecurityLevel; 4] = [
        Self::Unclassified,
        Self::Restricted,
        Self::Secret,
        Self::TopSecret,
    ];

    /// Ordinal of this level within the lattice.
    pub fn rank(self) -> u8 {
        match self {
            Self::Unclassified => 0,
            Self::Restricted => 1,
            Self::Secret => 2,
            Self::TopSecret => 3,
        }
    }

    /// `self` sits at or above `other` in the lattice (the read direction).
    pub fn dominates(self, other: SecurityLevel) -> bool {
        self.rank() >= other.rank()
    }

    /// `self` sits at or below `other` in the lattice (the write direction).
    pub fn is_dominated_by(self, other: SecurityLevel) -> bool {
        self.rank() <= other.rank()
    }

    /// Wire name of this level (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unclassified => "UNCLASSIFIED",
            Self::Restricted => "RESTRICTED",
            Self::Secret => "SECRET",
            Self::TopSecret => "TOP_SECRET",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = SperrwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNCLASSIFIED" => Ok(Self::Unclassified),
            "RESTRICTED" => Ok(Self::Restricted),
            "SECRET" => Ok(Self::Secret),
            "TOP_SECRET" => Ok(Self::TopSecret),
            other => Err(SperrwerkError::Validation(format!(
                "unknown security level: {other}"
            ))),
        }
    }
}

/// Unique identifier for a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A registered, authenticated actor.
///
/// Deliberately NOT serializable — the credential fields must never leave
/// the process.  Use [`Principal::to_public`] for anything outward-facing.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: PrincipalId,
    /// Display label, no uniqueness constraint.
    pub name: String,
    /// Unique across all principals (e.g. an email address).
    pub contact_address: String,
    /// Hex digest of the salted secret.
    pub credential_digest: String,
    /// Salt used when the digest was computed.
    pub credential_salt: String,
    /// Clearance, fixed at creation.  No reclassification operation exists.
    pub clearance: SecurityLevel,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Outward-facing view without the credential fields.
    pub fn to_public(&self) -> PublicPrincipal {
        PublicPrincipal {
            id: self.id,
            name: self.name.clone(),
            contact_address: self.contact_address.clone(),
            clearance: self.clearance,
        }
    }
}

/// The serializable, credential-free view of a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPrincipal {
    pub id: PrincipalId,
    pub name: String,
    pub contact_address: String,
    pub clearance: SecurityLevel,
}

/// Metadata for a named, owned unit of content.
///
/// The content bytes themselves live in the content store; this entity is
/// metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    /// Unique across all resources.
    pub name: String,
    /// Fixed at creation to the owner's clearance.
    pub classification: SecurityLevel,
    /// The creating principal.  Ownership is not transferable and is used
    /// only for the discretionary delete check.
    pub owner: PrincipalId,
    pub created_at: DateTime<Utc>,
}

/// Reserved access token denoting the administrative principal.
///
/// The administrative principal is not a stored row: it is recognized by
/// this sentinel alone and may only perform principal-management
/// operations.
pub const ADMIN_TOKEN: &str = "ADMIN";

/// A resolved request identity.
#[derive(Debug, Clone)]
pub enum Actor {
    /// The reserved administrative identity.  Never a subject of resource
    /// BLP checks.
    Admin,
    /// A registered principal loaded from the directory.
    User(Principal),
}
