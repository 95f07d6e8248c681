// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sperrwerk-service — resolves request identities and orchestrates the
// metadata registry, decision engine, and content store for every
// operation the service exposes.

pub mod service;
pub mod session;

pub use service::Sperrwerk;
pub use session::resolve_actor;
