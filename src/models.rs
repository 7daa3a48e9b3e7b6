// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Ves,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ves => "VES",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "VES" => Ok(Currency::Ves),
            other => Err(DomainError::Validation(format!(
                "unknown currency '{}', expected USD or VES",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    Bcv,
    Euro,
    Usdt,
}

impl RateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Bcv => "bcv",
            RateKind::Euro => "euro",
            RateKind::Usdt => "usdt",
        }
    }
}

impl std::str::FromStr for RateKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bcv" => Ok(RateKind::Bcv),
            "euro" => Ok(RateKind::Euro),
            "usdt" => Ok(RateKind::Usdt),
            other => Err(DomainError::Validation(format!(
                "unknown rate kind '{}', expected bcv, euro or usdt",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Expense,
    Income,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Expense => "expense",
            TxKind::Income => "income",
        }
    }
}

impl std::str::FromStr for TxKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TxKind::Expense),
            "income" => Ok(TxKind::Income),
            other => Err(DomainError::Validation(format!(
                "unknown transaction type '{}', expected expense or income",
                other
            ))),
        }
    }
}

/// Loose savings-category match, applied where free-text categories enter
/// the system. "Ahorro", "AHORRO" and "ahorro vacaciones" all count.
pub fn is_savings_name(name: &str) -> bool {
    name.trim().to_lowercase().contains("ahorro")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub kind: TxKind,
    pub amount: Decimal, // canonical USD
    pub category: String,
    pub is_savings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_kind: Option<RateKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_value: Option<Decimal>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub amount: Decimal, // canonical USD
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub original_amount: Option<Decimal>,
    pub original_currency: Option<Currency>,
    pub rate_kind: Option<RateKind>,
    pub rate_value: Option<Decimal>,
}

/// Editable fields only. Conversion snapshots (`original_*`, `rate_*`) are
/// audit data and cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct TxPatch {
    pub kind: Option<TxKind>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TxPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub kind: TxKind,
    pub day: u32,       // 1-31, informational
    pub period: String, // YYYY-MM
}

impl RecurringItem {
    pub fn is_savings(&self) -> bool {
        is_savings_name(&self.category)
    }
}

/// Input for wholesale budget replacement; drafts with amount <= 0 are
/// dropped before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringDraft {
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub kind: TxKind,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    pub bcv: Decimal,
    pub euro: Decimal,
    pub usdt: Decimal,
}

impl RateSet {
    pub fn defaults() -> Self {
        RateSet {
            bcv: Decimal::new(34174, 2), // 341.74
            euro: Decimal::new(3950, 1), // 395.0
            usdt: Decimal::new(5000, 1), // 500.0
        }
    }

    pub fn value_of(&self, kind: RateKind) -> Decimal {
        match kind {
            RateKind::Bcv => self.bcv,
            RateKind::Euro => self.euro,
            RateKind::Usdt => self.usdt,
        }
    }

    /// Usable means every rate could act as a divisor.
    pub fn is_usable(&self) -> bool {
        self.bcv > Decimal::ZERO && self.euro > Decimal::ZERO && self.usdt > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    SavingsAmount,
    TxCount,
}

impl MissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionKind::SavingsAmount => "savings_amount",
            MissionKind::TxCount => "tx_count",
        }
    }
}

impl std::str::FromStr for MissionKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings_amount" => Ok(MissionKind::SavingsAmount),
            "tx_count" => Ok(MissionKind::TxCount),
            other => Err(DomainError::Validation(format!(
                "unknown mission kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Locked,
    Active,
    Completed,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Locked => "locked",
            MissionStatus::Active => "active",
            MissionStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for MissionStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "locked" => Ok(MissionStatus::Locked),
            "active" => Ok(MissionStatus::Active),
            "completed" => Ok(MissionStatus::Completed),
            other => Err(DomainError::Validation(format!(
                "unknown mission status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub kind: MissionKind,
    pub target: Decimal,
    pub status: MissionStatus,
    pub sort_order: i64,
}

/// Structured output of the external capture/extraction service, verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseAnalysis {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub r#type: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub is_invalid: Option<bool>,
}
