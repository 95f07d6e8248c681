// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Startup settings for a Sperrwerk service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Path of the SQLite metadata database.
    pub db_path: PathBuf,
    /// Root directory of the flat-file content store.
    pub content_dir: PathBuf,
    /// Wipe the content directory on startup (used by test deployments).
    pub purge_content_on_start: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("blp.db"),
            content_dir: PathBuf::from("fs"),
            purge_content_on_start: false,
        }
    }
}
