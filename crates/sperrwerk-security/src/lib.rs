// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sperrwerk-security — credential verification and the access decision
// engine.  Both halves are pure: no I/O, no shared state, safe to call
// concurrently without synchronization.

pub mod credential;
pub mod policy;

pub use credential::{CredentialHash, hash_secret, verify_secret};
pub use policy::{AccessMode, Decision, decide};
