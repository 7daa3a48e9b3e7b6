// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain failure taxonomy. Infrastructure errors (sqlite, HTTP) travel
/// as `anyhow::Error`; these variants mark the conditions callers branch
/// on, and they downcast cleanly from an `anyhow` chain.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The capture pipeline's analysis was flagged invalid or could not be
    /// read as a financial transaction. Nothing is created.
    #[error("not recognized as a financial transaction: {0}")]
    InvalidCommand(String),

    /// No usable (finite, positive) exchange rate even after fallback.
    #[error("exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// Missing row or an ownership mismatch; the message does not reveal
    /// which, so callers cannot probe other users' data.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input rejected before persistence.
    #[error("invalid input: {0}")]
    Validation(String),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
