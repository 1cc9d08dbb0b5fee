// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated session user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::session::SessionClaims;

/// User identity carried by a valid session token.
///
/// This is the type handlers receive through the [`super::Session`] extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    /// Telegram user id
    pub user_id: i64,
    /// Session expiry (Unix timestamp)
    pub expires_at: i64,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_user_and_expiry() {
        let user = SessionUser::from(SessionClaims {
            user_id: 42,
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        });
        assert_eq!(user.user_id, 42);
        assert_eq!(user.expires_at, 1_700_604_800);
    }
}
