//! Dashboard behaviour against an in-process fake backend, including the
//! failure paths a live server rarely produces.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tally::client::{ClientError, ClientResult, Dashboard, NotificationLevel, TrackerApi};
use tally::date_utils::MonthKey;
use tally::models::{Budget, BudgetInput, Category, Transaction, TransactionInput};
use tally::services::insights::{InsightKind, InsightReport};

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn transaction(id: &str, date: &str, cents: i64, category: Category) -> Transaction {
    Transaction {
        id: id.into(),
        date: date.parse().unwrap(),
        amount_cents: cents,
        description: format!("Transaction {}", id),
        category,
        created_at: "2025-07-01 00:00:00".into(),
        updated_at: "2025-07-01 00:00:00".into(),
    }
}

fn budget(category: Category, cents: i64, month_key: &str) -> Budget {
    Budget {
        id: format!("{}-{}", category, month_key),
        category,
        amount_cents: cents,
        month: month(month_key),
        created_at: "2025-07-01 00:00:00".into(),
        updated_at: "2025-07-01 00:00:00".into(),
    }
}

fn server_error() -> ClientError {
    ClientError::Api {
        status: 500,
        message: "Internal server error".into(),
    }
}

/// Backend stand-in holding records in memory, with switches for failures.
#[derive(Default)]
struct FakeApi {
    transactions: Mutex<Vec<Transaction>>,
    budgets: Mutex<Vec<Budget>>,
    fail_reads: AtomicBool,
    fail_deletes: AtomicBool,
    next_id: Mutex<u32>,
}

impl FakeApi {
    fn with(transactions: Vec<Transaction>, budgets: Vec<Budget>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            budgets: Mutex::new(budgets),
            ..Default::default()
        }
    }

    fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn stored_ids(&self) -> Vec<String> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }
}

impl TrackerApi for FakeApi {
    async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let mut list = self.transactions.lock().unwrap().clone();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    }

    async fn get_transaction(&self, id: &str) -> ClientResult<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.into()))
    }

    async fn create_transaction(&self, input: &TransactionInput) -> ClientResult<Transaction> {
        let new = input.clone().into_new().map_err(|e| ClientError::Api {
            status: 400,
            message: e.to_string(),
        })?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Transaction {
            id: format!("new-{}", *next_id),
            date: new.date,
            amount_cents: new.amount_cents,
            description: new.description,
            category: new.category,
            created_at: "2025-07-01 00:00:00".into(),
            updated_at: "2025-07-01 00:00:00".into(),
        };
        self.transactions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: &str,
        input: &TransactionInput,
    ) -> ClientResult<Transaction> {
        let mut list = self.transactions.lock().unwrap();
        let existing = list
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(id.into()))?;
        if let Some(description) = &input.description {
            existing.description = description.clone();
        }
        if let Some(amount) = input.amount {
            existing.amount_cents = (amount * 100.0).round() as i64;
        }
        if let Some(date) = &input.date {
            existing.date = date.parse().map_err(|_| ClientError::Api {
                status: 400,
                message: "Invalid date".into(),
            })?;
        }
        Ok(existing.clone())
    }

    async fn delete_transaction(&self, id: &str) -> ClientResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let mut list = self.transactions.lock().unwrap();
        let before = list.len();
        list.retain(|t| t.id != id);
        if list.len() == before {
            return Err(ClientError::NotFound(id.into()));
        }
        Ok(())
    }

    async fn list_budgets(&self, month: MonthKey) -> ClientResult<Vec<Budget>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.month == month)
            .cloned()
            .collect())
    }

    async fn upsert_budget(&self, input: &BudgetInput) -> ClientResult<Budget> {
        let new = input.clone().into_new().map_err(|e| ClientError::Api {
            status: 400,
            message: e.to_string(),
        })?;
        let stored = budget(new.category, new.amount_cents, &new.month.to_string());
        let mut budgets = self.budgets.lock().unwrap();
        budgets.retain(|b| !(b.category == new.category && b.month == new.month));
        budgets.push(stored.clone());
        Ok(stored)
    }
}

fn seeded() -> FakeApi {
    FakeApi::with(
        vec![
            transaction("a", "2025-07-20", 9500, Category::Entertainment),
            transaction("b", "2025-07-10", 15000, Category::Groceries),
            transaction("c", "2025-07-05", 2000, Category::Transport),
            transaction("d", "2025-06-28", 4000, Category::Groceries),
        ],
        vec![
            budget(Category::Groceries, 10000, "2025-07"),
            budget(Category::Entertainment, 10000, "2025-07"),
            budget(Category::Groceries, 99900, "2025-06"),
        ],
    )
}

fn ids(dashboard: &Dashboard) -> Vec<&str> {
    dashboard
        .transactions()
        .iter()
        .map(|t| t.id.as_str())
        .collect()
}

/// A failed delete puts the same row back at the same position.
#[tokio::test]
async fn test_failed_delete_restores_row_in_place() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    assert!(dashboard.refresh(&api).await);
    let before = dashboard.transactions().to_vec();

    api.fail_deletes(true);
    assert!(!dashboard.delete_transaction(&api, "b").await);

    assert_eq!(dashboard.transactions(), before.as_slice());
    assert_eq!(api.stored_ids().len(), 4);
    let notifications = dashboard.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(
        notifications[0].message,
        "Failed to delete transaction. Reverting."
    );
}

/// A successful delete removes the row locally and remotely.
#[tokio::test]
async fn test_delete_removes_row() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    assert!(dashboard.delete_transaction(&api, "c").await);
    assert_eq!(ids(&dashboard), vec!["a", "b", "d"]);
    assert!(!api.stored_ids().contains(&"c".to_string()));
    assert_eq!(
        dashboard.take_notifications()[0].level,
        NotificationLevel::Success
    );
}

/// Deleting a row the server no longer has leaves it removed.
#[tokio::test]
async fn test_delete_of_vanished_record_stays_removed() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;
    api.transactions.lock().unwrap().retain(|t| t.id != "a");

    assert!(dashboard.delete_transaction(&api, "a").await);
    assert_eq!(ids(&dashboard), vec!["b", "c", "d"]);
}

/// Deleting an id that is not loaded does not call the backend.
#[tokio::test]
async fn test_delete_unknown_local_id_is_noop() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    assert!(!dashboard.delete_transaction(&api, "zzz").await);
    assert_eq!(api.stored_ids().len(), 4);
    assert!(dashboard.notifications().is_empty());
}

/// A failed refresh keeps what was loaded before and reports the failure.
#[tokio::test]
async fn test_failed_refresh_keeps_previous_data() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    assert!(dashboard.refresh(&api).await);
    dashboard.take_notifications();

    api.fail_reads(true);
    assert!(!dashboard.refresh(&api).await);
    assert_eq!(dashboard.transactions().len(), 4);
    assert_eq!(dashboard.budgets().len(), 2);

    let levels: Vec<NotificationLevel> = dashboard
        .take_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Error, NotificationLevel::Error]);
}

/// Budgets are scoped to the viewed month, and switching months reloads them.
#[tokio::test]
async fn test_view_month_switches_budgets() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;
    assert_eq!(dashboard.budgets().len(), 2);

    assert!(dashboard.view_month(&api, month("2025-06")).await);
    assert_eq!(dashboard.viewed_month(), month("2025-06"));
    assert_eq!(dashboard.budgets().len(), 1);
    assert_eq!(dashboard.budgets()[0].amount_cents, 99900);

    let comparison = dashboard.budget_comparison();
    assert_eq!(comparison.len(), 1);
    assert_eq!(comparison[0].actual_cents, 4000);
    assert_eq!(dashboard.insights(), InsightReport::AllGood);
}

/// A failed reload after switching months keeps the loaded budgets but never
/// compares them against the new month.
#[tokio::test]
async fn test_view_month_failure_keeps_budgets_out_of_comparison() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    api.fail_reads(true);
    assert!(!dashboard.view_month(&api, month("2025-06")).await);
    assert_eq!(dashboard.budgets().len(), 2);
    assert_eq!(dashboard.transactions().len(), 4);
    assert!(dashboard.budget_comparison().is_empty());
    assert_eq!(dashboard.insights(), InsightReport::AllGood);

    // Switching back shows them again without a successful fetch.
    assert!(!dashboard.view_month(&api, month("2025-07")).await);
    assert_eq!(dashboard.budget_comparison().len(), 2);
}

/// Insights follow the comparison for the viewed month.
#[tokio::test]
async fn test_insights_for_viewed_month() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    let report = dashboard.insights();
    let insights = report.insights();
    assert_eq!(insights.len(), 2);

    let groceries = insights
        .iter()
        .find(|i| i.category == Category::Groceries)
        .unwrap();
    assert_eq!(groceries.kind, InsightKind::OverBudget);
    assert_eq!(groceries.title(), "Over Budget in Groceries");
    assert_eq!(
        groceries.description(),
        "You have spent $50.00 more than your budget."
    );

    let entertainment = insights
        .iter()
        .find(|i| i.category == Category::Entertainment)
        .unwrap();
    assert_eq!(entertainment.kind, InsightKind::NearingLimit);
    assert_eq!(entertainment.amount_cents, 500);
}

/// Setting a budget replaces the category's entry for the viewed month.
#[tokio::test]
async fn test_set_budget_replaces_existing_entry() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;
    dashboard.take_notifications();

    let stored = dashboard
        .set_budget(&api, &BudgetInput::new(Category::Groceries, 30000, month("2025-07")))
        .await
        .unwrap();
    assert_eq!(stored.amount_cents, 30000);
    assert_eq!(dashboard.budgets().len(), 2);
    let groceries: Vec<&Budget> = dashboard
        .budgets()
        .iter()
        .filter(|b| b.category == Category::Groceries)
        .collect();
    assert_eq!(groceries.len(), 1);
    assert_eq!(groceries[0].amount_cents, 30000);

    let notifications = dashboard.take_notifications();
    assert_eq!(
        notifications[0].message,
        "Budget for Groceries set successfully!"
    );

    // A budget for another month is stored but not shown.
    dashboard
        .set_budget(&api, &BudgetInput::new(Category::Health, 5000, month("2025-08")))
        .await
        .unwrap();
    assert_eq!(dashboard.budgets().len(), 2);
}

/// Invalid budget input is reported and changes nothing.
#[tokio::test]
async fn test_set_budget_failure_is_reported() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;
    dashboard.take_notifications();

    let input = BudgetInput {
        category: Some("Groceries".into()),
        amount: Some(-5.0),
        month: Some("2025-07".into()),
    };
    assert!(dashboard.set_budget(&api, &input).await.is_none());
    assert_eq!(dashboard.budgets().len(), 2);
    let notifications = dashboard.take_notifications();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert!(notifications[0].message.starts_with("Failed to set budget"));
}

/// Added transactions land in date order without a refetch.
#[tokio::test]
async fn test_add_transaction_keeps_newest_first() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    let added = dashboard
        .add_transaction(
            &api,
            &TransactionInput::new("Pharmacy", 1200, "2025-07-08".parse().unwrap(), Category::Health),
        )
        .await
        .unwrap();

    assert_eq!(ids(&dashboard), vec!["a", "b", added.id.as_str(), "c", "d"]);
}

/// Editing a date moves the row to its new position.
#[tokio::test]
async fn test_edit_transaction_reorders() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;

    let changes = TransactionInput {
        date: Some("2025-07-25".into()),
        ..Default::default()
    };
    let updated = dashboard.edit_transaction(&api, "d", &changes).await.unwrap();
    assert_eq!(updated.date.to_string(), "2025-07-25");
    assert_eq!(ids(&dashboard), vec!["d", "a", "b", "c"]);
}

/// Lifetime summary ignores the chart date range.
#[tokio::test]
async fn test_summary_is_lifetime() {
    let api = seeded();
    let mut dashboard = Dashboard::new(month("2025-07"));
    dashboard.refresh(&api).await;
    dashboard.set_date_range(tally::date_utils::DateRange::day("2025-07-05".parse().unwrap()));

    assert_eq!(dashboard.summary().total_cents, 30500);
    assert_eq!(dashboard.summary().transaction_count, 4);
    let totals = dashboard.category_totals();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total_cents, 2000);
}

/// The month selector offers the last twelve months, latest first.
#[test]
fn test_month_choices() {
    let dashboard = Dashboard::new(month("2025-07"));
    let choices = dashboard.month_choices();
    assert_eq!(choices.len(), 12);
    assert_eq!(choices[0], MonthKey::current());
    assert!(choices.windows(2).all(|w| w[0] > w[1]));
}
