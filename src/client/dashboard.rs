use tracing::{debug, warn};

use crate::client::api::{ClientError, TrackerApi};
use crate::date_utils::{recent_months, DateRange, MonthKey};
use crate::models::{Budget, BudgetInput, Transaction, TransactionInput};
use crate::services::analytics::{self, CategoryTotal, MonthlyTotal, SpendingSummary};
use crate::services::budget::{build_comparison, BudgetComparison};
use crate::services::insights::InsightReport;

pub const NO_DATA_CAPTION: &str = "No data for the selected period";
pub const NO_BUDGET_CAPTION: &str = "Set a budget to see comparison.";

/// Number of months offered by the month selector.
pub const MONTH_CHOICES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Locally held records plus the selections that drive the derived views.
///
/// Records are fetched from a [`TrackerApi`]; every chart and insight is
/// computed from the local copies. A failed fetch keeps the previous copy.
#[derive(Debug, Clone)]
pub struct Dashboard {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    viewed_month: MonthKey,
    date_range: DateRange,
    notifications: Vec<Notification>,
}

impl Dashboard {
    pub fn new(viewed_month: MonthKey) -> Self {
        Self {
            transactions: Vec::new(),
            budgets: Vec::new(),
            viewed_month,
            date_range: DateRange::all(),
            notifications: Vec::new(),
        }
    }

    /// Newest first, as returned by the server.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn viewed_month(&self) -> MonthKey {
        self.viewed_month
    }

    pub fn month_choices(&self) -> Vec<MonthKey> {
        recent_months(MonthKey::current(), MONTH_CHOICES)
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    /// Fetch transactions, then budgets for the viewed month. Each fetch
    /// stands alone: when one fails its previous data is kept and the other
    /// still runs. Returns whether both succeeded.
    pub async fn refresh<A: TrackerApi>(&mut self, api: &A) -> bool {
        let transactions_ok = self.refresh_transactions(api).await;
        let budgets_ok = self.refresh_budgets(api).await;
        transactions_ok && budgets_ok
    }

    pub async fn refresh_transactions<A: TrackerApi>(&mut self, api: &A) -> bool {
        match api.list_transactions().await {
            Ok(transactions) => {
                debug!(count = transactions.len(), "Fetched transactions");
                self.transactions = transactions;
                true
            }
            Err(e) => {
                warn!("Failed to fetch transactions: {}", e);
                self.notify(NotificationLevel::Error, "Failed to load transactions.");
                false
            }
        }
    }

    pub async fn refresh_budgets<A: TrackerApi>(&mut self, api: &A) -> bool {
        match api.list_budgets(self.viewed_month).await {
            Ok(budgets) => {
                debug!(month = %self.viewed_month, count = budgets.len(), "Fetched budgets");
                self.budgets = budgets;
                true
            }
            Err(e) => {
                warn!(month = %self.viewed_month, "Failed to fetch budgets: {}", e);
                self.notify(NotificationLevel::Error, "Failed to load budgets.");
                false
            }
        }
    }

    /// Switch the viewed month and load its data. If the fetch fails the
    /// previously loaded budgets are kept; the comparison only uses budgets
    /// of the viewed month, so they are not shown against it.
    pub async fn view_month<A: TrackerApi>(&mut self, api: &A, month: MonthKey) -> bool {
        self.viewed_month = month;
        self.refresh(api).await
    }

    pub async fn add_transaction<A: TrackerApi>(
        &mut self,
        api: &A,
        input: &TransactionInput,
    ) -> Option<Transaction> {
        match api.create_transaction(input).await {
            Ok(created) => {
                self.insert_sorted(created.clone());
                self.notify(NotificationLevel::Success, "Transaction added successfully!");
                Some(created)
            }
            Err(e) => {
                warn!("Failed to add transaction: {}", e);
                self.notify(NotificationLevel::Error, failure_message("add transaction", &e));
                None
            }
        }
    }

    pub async fn edit_transaction<A: TrackerApi>(
        &mut self,
        api: &A,
        id: &str,
        input: &TransactionInput,
    ) -> Option<Transaction> {
        match api.update_transaction(id, input).await {
            Ok(updated) => {
                self.transactions.retain(|t| t.id != id);
                self.insert_sorted(updated.clone());
                self.notify(NotificationLevel::Success, "Transaction updated!");
                Some(updated)
            }
            Err(e) => {
                warn!(transaction_id = id, "Failed to update transaction: {}", e);
                self.notify(
                    NotificationLevel::Error,
                    failure_message("update transaction", &e),
                );
                None
            }
        }
    }

    /// Remove the row immediately, then delete it remotely. If the remote
    /// call fails the same row goes back to the same position.
    ///
    /// A not-found answer means the record is already gone, so the row stays
    /// removed.
    pub async fn delete_transaction<A: TrackerApi>(&mut self, api: &A, id: &str) -> bool {
        let Some(index) = self.transactions.iter().position(|t| t.id == id) else {
            return false;
        };
        let removed = self.transactions.remove(index);

        match api.delete_transaction(id).await {
            Ok(()) => {
                self.notify(NotificationLevel::Success, "Transaction deleted!");
                true
            }
            Err(ClientError::NotFound(_)) => {
                self.notify(
                    NotificationLevel::Success,
                    "Transaction was already removed.",
                );
                true
            }
            Err(e) => {
                warn!(transaction_id = id, "Delete failed, restoring row: {}", e);
                let index = index.min(self.transactions.len());
                self.transactions.insert(index, removed);
                self.notify(
                    NotificationLevel::Error,
                    "Failed to delete transaction. Reverting.",
                );
                false
            }
        }
    }

    pub async fn set_budget<A: TrackerApi>(
        &mut self,
        api: &A,
        input: &BudgetInput,
    ) -> Option<Budget> {
        match api.upsert_budget(input).await {
            Ok(budget) => {
                if budget.month == self.viewed_month {
                    match self
                        .budgets
                        .iter_mut()
                        .find(|b| b.category == budget.category)
                    {
                        Some(existing) => *existing = budget.clone(),
                        None => self.budgets.push(budget.clone()),
                    }
                }
                self.notify(
                    NotificationLevel::Success,
                    format!("Budget for {} set successfully!", budget.category),
                );
                Some(budget)
            }
            Err(e) => {
                warn!("Failed to set budget: {}", e);
                self.notify(NotificationLevel::Error, failure_message("set budget", &e));
                None
            }
        }
    }

    fn insert_sorted(&mut self, transaction: Transaction) {
        let index = self
            .transactions
            .partition_point(|t| t.date > transaction.date);
        self.transactions.insert(index, transaction);
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        analytics::category_totals(&self.transactions, &self.date_range)
    }

    pub fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        analytics::monthly_totals(&self.transactions, &self.date_range)
    }

    pub fn budget_comparison(&self) -> Vec<BudgetComparison> {
        build_comparison(&self.transactions, &self.budgets, self.viewed_month)
    }

    pub fn insights(&self) -> InsightReport {
        InsightReport::from_rows(&self.budget_comparison())
    }

    /// Lifetime totals over every loaded transaction, ignoring the date range.
    pub fn summary(&self) -> SpendingSummary {
        SpendingSummary::from_transactions(&self.transactions)
    }
}

fn failure_message(action: &str, error: &ClientError) -> String {
    match error {
        ClientError::Api { message, .. } => format!("Failed to {}: {}", action, message),
        ClientError::NotFound(_) => format!("Failed to {}: it no longer exists.", action),
        _ => format!("Failed to {}. Please try again.", action),
    }
}
