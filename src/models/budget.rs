use serde::{Deserialize, Serialize};

use crate::date_utils::MonthKey;
use crate::error::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::transaction::{missing, parse_amount, parse_category};

/// A spending limit for one category in one month. At most one exists per
/// `(category, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: Category,
    pub amount_cents: i64,
    pub month: MonthKey,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category: Category,
    pub amount_cents: i64,
    pub month: MonthKey,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetInput {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::form_utils::deserialize_optional_text"
    )]
    pub category: Option<String>,
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
    pub month: Option<String>,
}

impl BudgetInput {
    pub fn new(category: Category, amount_cents: i64, month: MonthKey) -> Self {
        Self {
            category: Some(category.to_string()),
            amount: Some(amount_cents as f64 / 100.0),
            month: Some(month.to_string()),
        }
    }

    pub fn into_new(self) -> AppResult<NewBudget> {
        let category = self.category.ok_or_else(|| missing("category"))?;
        let amount = self.amount.ok_or_else(|| missing("amount"))?;
        let month = self.month.ok_or_else(|| missing("month"))?;

        Ok(NewBudget {
            category: parse_category(&category)?,
            amount_cents: parse_amount(amount)?,
            month: parse_month(&month)?,
        })
    }
}

pub fn parse_month(month: &str) -> AppResult<MonthKey> {
    month
        .parse()
        .map_err(|e| AppError::Validation(format!("Invalid month: {}", e)))
}
