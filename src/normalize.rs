// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::errors::{DomainError, DomainResult};
use crate::models::{Currency, RateKind, RateSet};

/// Result of canonicalizing an entered amount into USD.
///
/// `amount` keeps the full-precision quotient; rounding to 2 decimals
/// happens at display time only. The `original_*` fields are set solely for
/// VES-entered amounts, `rate_*` whenever a rate actually took part.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub amount: Decimal,
    pub original_amount: Option<Decimal>,
    pub original_currency: Option<Currency>,
    pub rate_kind: Option<RateKind>,
    pub rate_value: Option<Decimal>,
}

impl Normalized {
    fn passthrough(amount: Decimal) -> Self {
        Normalized {
            amount,
            original_amount: None,
            original_currency: None,
            rate_kind: None,
            rate_value: None,
        }
    }
}

pub fn usable_rate(kind: RateKind, rates: &RateSet) -> DomainResult<Decimal> {
    let rate = rates.value_of(kind);
    // Decimal has no NaN/infinity; positive is the whole guard, and a zero
    // divisor would panic downstream.
    if rate <= Decimal::ZERO {
        return Err(DomainError::RateUnavailable(format!(
            "{} rate is {} (VES per USD)",
            kind.as_str(),
            rate
        )));
    }
    Ok(rate)
}

/// Canonicalize an entered amount to USD against a rate snapshot.
///
/// VES amounts divide by the rate selected by `rate_kind` (default bcv) and
/// keep the as-entered value for audit. USD amounts pass through unchanged;
/// a rate hint on a USD amount is deliberately ignored here. The explicit
/// cross-rate path is [`normalize_arbitrage`].
pub fn normalize(
    amount: Decimal,
    currency: Currency,
    rate_kind: Option<RateKind>,
    rates: &RateSet,
) -> DomainResult<Normalized> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    match currency {
        Currency::Usd => Ok(Normalized::passthrough(amount)),
        Currency::Ves => {
            let kind = rate_kind.unwrap_or(RateKind::Bcv);
            let rate = usable_rate(kind, rates)?;
            Ok(Normalized {
                amount: amount / rate,
                original_amount: Some(amount),
                original_currency: Some(Currency::Ves),
                rate_kind: Some(kind),
                rate_value: Some(rate),
            })
        }
    }
}

/// Secondary path for a USD amount quoted against a non-BCV rate ("40
/// dollars at the usdt rate"): the amount is pushed through VES at the
/// quoted rate and pulled back to USD at BCV. Only the quoted rate is
/// snapshotted; the entry stays USD-native so no original amount is kept.
pub fn normalize_arbitrage(
    amount: Decimal,
    special: RateKind,
    rates: &RateSet,
) -> DomainResult<Normalized> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if special == RateKind::Bcv {
        return Err(DomainError::Validation(
            "cross-rate entry needs a non-BCV rate (euro or usdt)".into(),
        ));
    }
    let special_rate = usable_rate(special, rates)?;
    let bcv = usable_rate(RateKind::Bcv, rates)?;
    Ok(Normalized {
        amount: amount * special_rate / bcv,
        original_amount: None,
        original_currency: None,
        rate_kind: Some(special),
        rate_value: Some(special_rate),
    })
}
