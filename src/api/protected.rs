// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Protected resource.

use crate::{auth::Auth, error::Data};

/// `GET /api`
///
/// Gate only: a valid bearer token gets `{"data": null}`, anything else is
/// rejected by the [`Auth`] extractor with a 401.
pub async fn protected(Auth(claims): Auth) -> Data<()> {
    tracing::debug!(scopes = ?claims.scope, exp = claims.exp, "Granted access to protected resource");
    Data::empty()
}
