mod balance;
mod expense;
mod income;
mod limit;
mod migration;
mod store;

use crate::storages::{SessionStore, Storage};

pub use balance::BalanceService;
pub use expense::ExpenseService;
pub use income::IncomeService;
pub use limit::LimitService;
pub use migration::MigrationCoordinator;
pub use store::Store;

/// Everything a handler may call, built once from the storage
#[derive(Clone)]
pub struct Services {
    pub sessions: SessionStore,
    pub balance: BalanceService,
    pub incomes: IncomeService,
    pub expenses: ExpenseService,
    pub limit: LimitService,
    pub migration: MigrationCoordinator,
}

impl Services {
    pub fn new(storage: &Storage) -> Self {
        let provider = storage.provider.clone();
        let balance = BalanceService::new(Store::new(provider.clone()));
        let limit = LimitService::new(Store::new(provider.clone()));
        let incomes = IncomeService::new(Store::new(provider.clone()), balance.clone());
        let expenses = ExpenseService::new(
            Store::new(provider.clone()),
            balance.clone(),
            limit.clone(),
        );
        let migration = MigrationCoordinator::new(
            storage.sessions.clone(),
            provider,
            storage.sheets.clone(),
            incomes.clone(),
            expenses.clone(),
            balance.clone(),
            limit.clone(),
        );
        Self {
            sessions: storage.sessions.clone(),
            balance,
            incomes,
            expenses,
            limit,
            migration,
        }
    }
}
