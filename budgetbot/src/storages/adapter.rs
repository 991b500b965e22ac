use std::{fmt::Debug, sync::Arc};

use teloxide::types::ChatId;

use crate::{
    errors::BotError,
    storages::{
        memory_adapter::MemoryAdapter,
        records::{Expense, Income, Limit, SheetRow},
        remote_adapter::RemoteAdapter,
        session_storage::SessionStore,
        sheets_client::SheetsClient,
    },
};

/// Marker for one kind of per-chat financial data
pub trait EntityKind: Send + Sync + Sized + 'static {
    type Item: SheetRow + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Name of the section holding this entity in a remote document
    const SECTION: &'static str;

    /// Pick this entity's adapter out of a set
    fn select(set: &AdapterSet) -> Arc<dyn EntityAdapter<Self>>;
}

pub struct Incomes;
pub struct Expenses;
pub struct Balances;
pub struct Limits;

impl EntityKind for Incomes {
    type Item = Income;
    const SECTION: &'static str = "Incomes";

    fn select(set: &AdapterSet) -> Arc<dyn EntityAdapter<Self>> {
        set.incomes.clone()
    }
}

impl EntityKind for Expenses {
    type Item = Expense;
    const SECTION: &'static str = "Expenses";

    fn select(set: &AdapterSet) -> Arc<dyn EntityAdapter<Self>> {
        set.expenses.clone()
    }
}

impl EntityKind for Balances {
    type Item = f64;
    const SECTION: &'static str = "Balance";

    fn select(set: &AdapterSet) -> Arc<dyn EntityAdapter<Self>> {
        set.balance.clone()
    }
}

impl EntityKind for Limits {
    type Item = Limit;
    const SECTION: &'static str = "Limit";

    fn select(set: &AdapterSet) -> Arc<dyn EntityAdapter<Self>> {
        set.limit.clone()
    }
}

/// Sections every remote document must provide
pub const REMOTE_SECTIONS: [&str; 4] = [
    Incomes::SECTION,
    Expenses::SECTION,
    Balances::SECTION,
    Limits::SECTION,
];

/// Uniform per-chat CRUD contract over an insertion-ordered item list
#[async_trait::async_trait]
pub trait EntityAdapter<K: EntityKind>: Send + Sync {
    /// All items of the chat, oldest first
    async fn read(&self, chat_id: ChatId) -> Result<Vec<K::Item>, BotError>;

    /// Append items after the existing ones
    async fn append(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError>;

    /// Replace all items of the chat
    async fn overwrite(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError>;

    /// Remove all items of the chat
    async fn clear(&self, chat_id: ChatId) -> Result<(), BotError>;
}

/// The adapters of one storage mode
#[derive(Clone)]
pub struct AdapterSet {
    pub incomes: Arc<dyn EntityAdapter<Incomes>>,
    pub expenses: Arc<dyn EntityAdapter<Expenses>>,
    pub balance: Arc<dyn EntityAdapter<Balances>>,
    pub limit: Arc<dyn EntityAdapter<Limits>>,
}

impl AdapterSet {
    /// In-process adapters
    pub fn memory() -> Self {
        Self {
            incomes: Arc::new(MemoryAdapter::<Incomes>::new()),
            expenses: Arc::new(MemoryAdapter::<Expenses>::new()),
            balance: Arc::new(MemoryAdapter::<Balances>::new()),
            limit: Arc::new(MemoryAdapter::<Limits>::new()),
        }
    }

    /// Spreadsheet adapters; the document is looked up from the chat's session
    pub fn remote(client: Arc<dyn SheetsClient>, sessions: SessionStore) -> Self {
        Self {
            incomes: Arc::new(RemoteAdapter::<Incomes>::new(client.clone(), sessions.clone())),
            expenses: Arc::new(RemoteAdapter::<Expenses>::new(client.clone(), sessions.clone())),
            balance: Arc::new(RemoteAdapter::<Balances>::new(client.clone(), sessions.clone())),
            limit: Arc::new(RemoteAdapter::<Limits>::new(client, sessions)),
        }
    }
}
