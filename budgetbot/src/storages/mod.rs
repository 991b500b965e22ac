pub mod adapter;
pub mod memory_adapter;
pub mod provider;
pub mod records;
pub mod remote_adapter;
pub mod session_storage;
pub mod sheets_client;
mod storage;
#[cfg(test)]
pub mod testing;

pub use adapter::{Balances, EntityKind, Expenses, Incomes, Limits, REMOTE_SECTIONS};
pub use provider::BackendProvider;
pub use records::{Expense, ExpenseCategory, Income, Limit};
pub use session_storage::{ConversationState, SessionStore, StorageMode};
pub use sheets_client::{SheetsClient, YamlSheetsClient};
pub use storage::Storage;
