// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Principal directory and resource registry backed by SQLite.
//
// Uniqueness of `principals.contact_address` and `resources.name` is
// enforced by UNIQUE constraints at commit, so "check then insert" is a
// single atomic step even under concurrent creates.  Decision-relevant
// metadata (clearance, classification, owner) is stored here; content
// bytes live in the content store.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

use sperrwerk_core::error::{Result, SperrwerkError};
use sperrwerk_core::types::{Principal, PrincipalId, Resource, ResourceId, SecurityLevel};

/// SQLite schema for both metadata tables.
const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS principals (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL,
        contact_address  TEXT NOT NULL UNIQUE,
        credential_digest TEXT NOT NULL,
        credential_salt  TEXT NOT NULL,
        clearance        TEXT NOT NULL,
        created_at       TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS resources (
        id             TEXT PRIMARY KEY,
        name           TEXT NOT NULL UNIQUE,
        classification TEXT NOT NULL,
        owner_id       TEXT NOT NULL,
        created_at     TEXT NOT NULL
    );
"#;

/// Convert a `rusqlite::Error` into a `SperrwerkError::Database`.
fn db_err(e: rusqlite::Error) -> SperrwerkError {
    SperrwerkError::Database(e.to_string())
}

/// Whether an insert failed on a UNIQUE (or other) constraint.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Wrap a column conversion error in the rusqlite error type so it can
/// surface from a row-mapping closure.
fn conv_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conv_err(idx, e))
}

fn row_to_principal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Principal> {
    let id: String = row.get(0)?;
    let clearance: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Principal {
        id: id.parse::<PrincipalId>().map_err(|e| conv_err(0, e))?,
        name: row.get(1)?,
        contact_address: row.get(2)?,
        credential_digest: row.get(3)?,
        credential_salt: row.get(4)?,
        clearance: clearance
            .parse::<SecurityLevel>()
            .map_err(|e| conv_err(5, e))?,
        created_at: parse_timestamp(6, &created_at)?,
    })
}

fn row_to_resource(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resource> {
    let id: String = row.get(0)?;
    let classification: String = row.get(2)?;
    let owner: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(Resource {
        id: id.parse::<ResourceId>().map_err(|e| conv_err(0, e))?,
        name: row.get(1)?,
        classification: classification
            .parse::<SecurityLevel>()
            .map_err(|e| conv_err(2, e))?,
        owner: owner.parse::<PrincipalId>().map_err(|e| conv_err(3, e))?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

/// The principal directory and resource registry, one SQLite database.
///
/// All methods are synchronous because `rusqlite` does not support async
/// natively.  In an async context, wrap calls in a blocking task.
pub struct MetadataStore {
    conn: Connection,
}

impl MetadataStore {
    /// Open (or create) the metadata database at `path`.
    ///
    /// WAL journal mode is enabled for better concurrent-read behavior and
    /// both tables are created if they do not already exist.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| SperrwerkError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| SperrwerkError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLES_SQL)
            .map_err(|e| SperrwerkError::Database(format!("create tables: {e}")))?;

        info!("metadata database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SperrwerkError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLES_SQL)
            .map_err(|e| SperrwerkError::Database(format!("create tables: {e}")))?;

        debug!("in-memory metadata database opened");
        Ok(Self { conn })
    }

    // -- Principal directory --

    /// Insert a new principal.
    ///
    /// A duplicate contact address fails with
    /// [`SperrwerkError::UserExists`] — the UNIQUE constraint makes the
    /// uniqueness check atomic with the insert.
    #[instrument(skip(self, principal), fields(id = %principal.id, address = %principal.contact_address))]
    pub fn insert_principal(&self, principal: &Principal) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO principals
                 (id, name, contact_address, credential_digest, credential_salt, clearance, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    principal.id.to_string(),
                    principal.name,
                    principal.contact_address,
                    principal.credential_digest,
                    principal.credential_salt,
                    principal.clearance.as_str(),
                    principal.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SperrwerkError::UserExists(principal.contact_address.clone())
                } else {
                    db_err(e)
                }
            })?;

        debug!("principal inserted");
        Ok(())
    }

    /// Look up a principal by id.
    pub fn principal_by_id(&self, id: PrincipalId) -> Result<Option<Principal>> {
        self.conn
            .query_row(
                "SELECT id, name, contact_address, credential_digest, credential_salt, clearance, created_at
                 FROM principals WHERE id = ?1",
                params![id.to_string()],
                row_to_principal,
            )
            .optional()
            .map_err(db_err)
    }

    /// Look up a principal by its unique contact address.
    pub fn principal_by_address(&self, contact_address: &str) -> Result<Option<Principal>> {
        self.conn
            .query_row(
                "SELECT id, name, contact_address, credential_digest, credential_salt, clearance, created_at
                 FROM principals WHERE contact_address = ?1",
                params![contact_address],
                row_to_principal,
            )
            .optional()
            .map_err(db_err)
    }

    /// Remove a principal.  Returns whether a row was actually removed.
    ///
    /// Resources owned by the principal are NOT cascade-deleted; they stay
    /// behind with a dangling owner reference.
    #[instrument(skip(self), fields(%id))]
    pub fn delete_principal(&self, id: PrincipalId) -> Result<bool> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM principals WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(db_err)?;

        debug!(removed, "principal delete executed");
        Ok(removed > 0)
    }

    // -- Resource registry --

    /// Insert a new resource.
    ///
    /// A duplicate name fails with [`SperrwerkError::FileAlreadyExists`];
    /// as with principals, the UNIQUE constraint is the uniqueness check.
    #[instrument(skip(self, resource), fields(id = %resource.id, name = %resource.name))]
    pub fn insert_resource(&self, resource: &Resource) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO resources (id, name, classification, owner_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    resource.id.to_string(),
                    resource.name,
                    resource.classification.as_str(),
                    resource.owner.to_string(),
                    resource.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SperrwerkError::FileAlreadyExists(resource.name.clone())
                } else {
                    db_err(e)
                }
            })?;

        debug!("resource inserted");
        Ok(())
    }

    /// Look up a resource by its unique name.
    pub fn resource_by_name(&self, name: &str) -> Result<Option<Resource>> {
        self.conn
            .query_row(
                "SELECT id, name, classification, owner_id, created_at
                 FROM resources WHERE name = ?1",
                params![name],
                row_to_resource,
            )
            .optional()
            .map_err(db_err)
    }

    /// Remove a resource by name.  Returns whether a row was removed.
    ///
    /// The single DELETE statement is atomic with respect to concurrent
    /// readers: they observe either the pre-delete or post-delete state.
    #[instrument(skip(self), fields(%name))]
    pub fn delete_resource(&self, name: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM resources WHERE name = ?1", params![name])
            .map_err(db_err)?;

        debug!(removed, "resource delete executed");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store() -> MetadataStore {
        MetadataStore::open_in_memory().expect("open in-memory metadata store")
    }

    fn principal(address: &str, clearance: SecurityLevel) -> Principal {
        Principal {
            id: PrincipalId::new(),
            name: "Edi".into(),
            contact_address: address.into(),
            credential_digest: "digest".into(),
            credential_salt: "salt".into(),
            clearance,
            created_at: Utc::now(),
        }
    }

    fn resource(name: &str, owner: PrincipalId, level: SecurityLevel) -> Resource {
        Resource {
            id: ResourceId::new(),
            name: name.into(),
            classification: level,
            owner,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn principal_round_trip() {
        let store = store();
        let p = principal("edi@example.com", SecurityLevel::Secret);
        store.insert_principal(&p).unwrap();

        let by_id = store.principal_by_id(p.id).unwrap().unwrap();
        assert_eq!(by_id.contact_address, "edi@example.com");
        assert_eq!(by_id.clearance, SecurityLevel::Secret);
        assert_eq!(by_id.credential_digest, "digest");

        let by_address = store.principal_by_address("edi@example.com").unwrap().unwrap();
        assert_eq!(by_address.id, p.id);
    }

    #[test]
    fn duplicate_contact_address_is_a_conflict() {
        let store = store();
        store
            .insert_principal(&principal("dup@example.com", SecurityLevel::Restricted))
            .unwrap();

        let err = store
            .insert_principal(&principal("dup@example.com", SecurityLevel::Secret))
            .unwrap_err();
        assert!(matches!(err, SperrwerkError::UserExists(addr) if addr == "dup@example.com"));
    }

    #[test]
    fn duplicate_resource_name_is_a_conflict() {
        let store = store();
        let owner = PrincipalId::new();
        store
            .insert_resource(&resource("doc.txt", owner, SecurityLevel::Secret))
            .unwrap();

        let err = store
            .insert_resource(&resource("doc.txt", owner, SecurityLevel::Unclassified))
            .unwrap_err();
        assert!(matches!(err, SperrwerkError::FileAlreadyExists(name) if name == "doc.txt"));
    }

    #[test]
    fn lookups_of_unknown_rows_are_none() {
        let store = store();
        assert!(store.principal_by_id(PrincipalId::new()).unwrap().is_none());
        assert!(store.principal_by_address("nobody@example.com").unwrap().is_none());
        assert!(store.resource_by_name("ghost.txt").unwrap().is_none());
    }

    #[test]
    fn deletes_report_whether_a_row_was_removed() {
        let store = store();
        let p = principal("gone@example.com", SecurityLevel::Unclassified);
        store.insert_principal(&p).unwrap();
        assert!(store.delete_principal(p.id).unwrap());
        assert!(!store.delete_principal(p.id).unwrap());

        let r = resource("gone.txt", p.id, SecurityLevel::Unclassified);
        store.insert_resource(&r).unwrap();
        assert!(store.delete_resource("gone.txt").unwrap());
        assert!(!store.delete_resource("gone.txt").unwrap());
    }

    #[test]
    fn deleting_a_principal_leaves_its_resources() {
        let store = store();
        let p = principal("owner@example.com", SecurityLevel::Secret);
        store.insert_principal(&p).unwrap();
        store
            .insert_resource(&resource("kept.txt", p.id, p.clearance))
            .unwrap();

        store.delete_principal(p.id).unwrap();
        // The resource row survives with a dangling owner reference.
        let kept = store.resource_by_name("kept.txt").unwrap().unwrap();
        assert_eq!(kept.owner, p.id);
    }

    #[test]
    fn open_on_disk_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.db");

        let p = principal("disk@example.com", SecurityLevel::TopSecret);
        {
            let store = MetadataStore::open(&path).unwrap();
            store.insert_principal(&p).unwrap();
        }
        let store = MetadataStore::open(&path).unwrap();
        let loaded = store.principal_by_address("disk@example.com").unwrap().unwrap();
        assert_eq!(loaded.id, p.id);
        assert_eq!(loaded.clearance, SecurityLevel::TopSecret);
    }
}
