use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::parse_input_date;
use crate::error::{AppError, AppResult};
use crate::form_utils::AmountField;
use crate::models::category::Category;
use crate::services::analytics::format_cents;

/// Largest accepted amount, keeps cent sums far away from `i64` overflow.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub description: String,
    pub category: Category,
    pub created_at: String,
    pub updated_at: String,
}

impl Transaction {
    pub fn amount_display(&self) -> String {
        format_cents(self.amount_cents)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub description: String,
    pub category: Category,
}

/// Field replacements for an existing transaction; `None` leaves a field as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub date: Option<NaiveDate>,
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
    pub category: Option<Category>,
}

impl TransactionChanges {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount_cents.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }
}

/// Raw transaction payload as submitted by a client, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::form_utils::deserialize_optional_text"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::form_utils::deserialize_optional_amount"
    )]
    pub amount: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::form_utils::deserialize_optional_text"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::form_utils::deserialize_optional_text"
    )]
    pub category: Option<String>,
}

impl TransactionInput {
    pub fn new(
        description: impl Into<String>,
        amount_cents: i64,
        date: NaiveDate,
        category: Category,
    ) -> Self {
        Self {
            description: Some(description.into()),
            amount: Some(amount_cents as f64 / 100.0),
            date: Some(date.to_string()),
            category: Some(category.to_string()),
        }
    }

    /// Validate a create request: every field is required.
    pub fn into_new(self) -> AppResult<NewTransaction> {
        let description = self
            .description
            .ok_or_else(|| missing("description"))?;
        let amount = self.amount.ok_or_else(|| missing("amount"))?;
        let date = self.date.ok_or_else(|| missing("date"))?;
        let category = self.category.ok_or_else(|| missing("category"))?;

        Ok(NewTransaction {
            date: parse_date(&date)?,
            amount_cents: parse_amount(amount)?,
            description,
            category: parse_category(&category)?,
        })
    }
}

/// Raw update payload. A field that is absent (or `null`) stays unchanged.
/// A field that is present must be valid, so a blank value is rejected
/// rather than read as "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountField>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionPatch {
    /// Validate an update request: any subset of fields, each checked like on create.
    pub fn into_changes(self) -> AppResult<TransactionChanges> {
        let amount_cents = match self.amount {
            None => None,
            Some(field) if field.is_blank() => return Err(blank("amount")),
            Some(field) => {
                let amount = field
                    .value()
                    .ok_or_else(|| AppError::Validation("Amount must be a number".into()))?;
                Some(parse_amount(amount)?)
            }
        };

        Ok(TransactionChanges {
            date: present("date", self.date)?
                .as_deref()
                .map(parse_date)
                .transpose()?,
            amount_cents,
            description: present("description", self.description)?,
            category: present("category", self.category)?
                .as_deref()
                .map(parse_category)
                .transpose()?,
        })
    }
}

fn blank(field: &str) -> AppError {
    AppError::Validation(format!("Field must not be blank: {}", field))
}

/// Trim a supplied text field, rejecting it when nothing is left.
fn present(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(blank(field)),
        other => Ok(other),
    }
}

pub(crate) fn missing(field: &str) -> AppError {
    AppError::Validation(format!("Missing required field: {}", field))
}

pub(crate) fn parse_amount(amount: f64) -> AppResult<i64> {
    if !amount.is_finite() || amount > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "Amount {} is out of range",
            amount
        )));
    }
    let cents = from_decimal(amount);
    if cents <= 0 {
        return Err(AppError::Validation(
            "Amount must be a positive number".into(),
        ));
    }
    Ok(cents)
}

pub(crate) fn parse_category(category: &str) -> AppResult<Category> {
    category
        .parse()
        .map_err(|e| AppError::Validation(format!("Invalid category: {}", e)))
}

fn parse_date(date: &str) -> AppResult<NaiveDate> {
    parse_input_date(date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
}

/// Convert a decimal amount to integer cents, rounding half away from zero.
pub fn from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
