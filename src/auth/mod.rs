// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Mini App launch authentication and cookie sessions.
//!
//! ## Auth Flow
//!
//! 1. At startup the bot token is turned into a [`SharedSecret`]
//!    (`HMAC-SHA256("WebAppData", bot_token)`) and stored in an [`AuthContext`]
//! 2. The Mini App posts its raw `initData` string to `/init`
//! 3. The server:
//!    - verifies the launch data tag and freshness ([`init_data::verify`])
//!    - issues an HS256 session token for the launching user ([`session::issue`])
//!    - sets it as the HTTP-only `jwt` cookie
//! 4. Later requests present the cookie; the [`Session`] extractor checks it
//!
//! ## Security
//!
//! - Tag comparison is constant-time
//! - Launch data older than 15 minutes or more than 60 seconds in the
//!   future is rejected
//! - Every launch data failure is reported to clients as a bare 401
//! - The secret, check string and computed tag are never logged outside
//!   `dev` builds

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod init_data;
pub mod secret;
pub mod session;

pub use claims::SessionUser;
pub use context::{AuthContext, SESSION_COOKIE};
pub use error::AuthError;
pub use extractor::Session;
pub use init_data::{InitDataError, InitDataPolicy, VerifiedInitData, WebAppUser};
pub use secret::SharedSecret;
pub use session::{SessionClaims, SessionError, SessionToken};
