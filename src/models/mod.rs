pub mod budget;
pub mod category;
pub mod envelope;
pub mod transaction;

pub use budget::{Budget, BudgetInput, NewBudget};
pub use category::Category;
pub use envelope::Envelope;
pub use transaction::{
    NewTransaction, Transaction, TransactionChanges, TransactionInput, TransactionPatch,
};
