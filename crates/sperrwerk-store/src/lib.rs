// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sperrwerk-store — persistence collaborators: the principal directory and
// resource registry (one SQLite database) and the flat-file content store.

pub mod content;
pub mod metadata;

pub use content::ContentStore;
pub use metadata::MetadataStore;
