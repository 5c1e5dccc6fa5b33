// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Room restoration API endpoint module
//!
//! Provides POST /generate (legacy body contract) and POST /v1/restorations.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{client_identifier, generate_handler, restorations_handler};
pub use request::RestoreRequest;
pub use response::{RestorationResponse, RESTORE_FAILED_MESSAGE};
