// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flat-file content store.  One file per resource, named by the resource
// name.  All metadata lives in the registry; this store only moves bytes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use sperrwerk_core::error::{Result, SperrwerkError};

/// Byte storage rooted at a single directory.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// With `purge` set, any existing content is wiped first (used by test
    /// deployments that want a fresh filesystem).
    #[instrument(skip_all, fields(root = %root.as_ref().display(), purge))]
    pub fn open(root: impl AsRef<Path>, purge: bool) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if purge && root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;

        info!("content store opened");
        Ok(Self { root })
    }

    /// Remove every stored entry and the root directory itself.
    pub fn purge(&self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }

    /// Resolve a resource name to its backing path.
    ///
    /// Names are registry-validated identifiers, not paths; anything that
    /// could escape the root directory is rejected outright.
    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(SperrwerkError::Validation(format!(
                "invalid resource name: {name:?}"
            )));
        }
        Ok(self.root.join(name))
    }

    /// Create an empty entry.  An already-present entry is left untouched.
    #[instrument(skip(self), fields(%name))]
    pub fn create(&self, name: &str) -> Result<()> {
        let path = self.entry_path(name)?;
        if path.exists() {
            return Ok(());
        }
        fs::File::create(&path)?;
        debug!("content entry created");
        Ok(())
    }

    /// Fetch the full content of an entry.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(name)?;
        Ok(fs::read(path)?)
    }

    /// Replace the content of an entry wholesale.
    #[instrument(skip(self, content), fields(%name, len = content.len()))]
    pub fn overwrite(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.entry_path(name)?;
        fs::write(path, content)?;
        debug!("content overwritten");
        Ok(())
    }

    /// Append to an entry: existing bytes first, new bytes after, no
    /// separator in between.
    #[instrument(skip(self, content), fields(%name, len = content.len()))]
    pub fn append(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.entry_path(name)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content)?;
        debug!("content appended");
        Ok(())
    }

    /// Remove an entry.  Removing an absent entry is a no-op.
    #[instrument(skip(self), fields(%name))]
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.entry_path(name)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)?;
        debug!("content entry removed");
        Ok(())
    }

    /// Whether an entry exists on disk.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.entry_path(name)?.exists())
    }
}
