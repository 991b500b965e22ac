pub mod command_balance;
pub mod command_categories;
pub mod command_change_storage;
pub mod command_help;
pub mod command_limit;
pub mod command_list;
pub mod command_start;

use std::sync::Arc;

use teloxide::{types::ChatId, utils::command::BotCommands};
use yoroolbot::{
    dispatch::{DispatchTable, DuplicateKey, Keyed},
    reply::Reply,
};

use crate::{
    commands::{
        command_balance::CommandBalance,
        command_categories::{CommandCategoryTotals, CommandExpensesByCategory},
        command_change_storage::CommandChangeStorage,
        command_help::CommandHelp,
        command_limit::{CommandDeleteLimit, CommandLimit},
        command_list::{CommandListExpenses, CommandListIncomes},
        command_start::CommandStart,
    },
    errors::BotError,
    services::Services,
};

// Dispatch keys, as produced by `Command::name`
pub const START: &str = "/start";
pub const HELP: &str = "/help";
pub const LIST_EXPENSES: &str = "/list_expenses";
pub const LIST_INCOMES: &str = "/list_incomes";
pub const BALANCE: &str = "/balance";
pub const CHANGE_STORAGE: &str = "/change_storage";
pub const LIMIT: &str = "/limit";
pub const DELETE_LIMIT: &str = "/delete_limit";
pub const EXPENSES_BY_CATEGORY: &str = "/expenses_by_category";
pub const CATEGORY_TOTALS: &str = "/category_totals";

/// Bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "display this help")]
    Help,
    #[command(description = "list expenses", rename = "list_expenses")]
    ListExpenses,
    #[command(description = "list incomes", rename = "list_incomes")]
    ListIncomes,
    #[command(description = "show the balance")]
    Balance,
    #[command(
        description = "choose where records are kept",
        rename = "change_storage"
    )]
    ChangeStorage,
    #[command(description = "show the daily spending limit, or set it: /limit 100")]
    Limit(String),
    #[command(
        description = "remove the daily spending limit",
        rename = "delete_limit"
    )]
    DeleteLimit,
    #[command(
        description = "list expenses of one category",
        rename = "expenses_by_category"
    )]
    ExpensesByCategory,
    #[command(
        description = "sum expenses per category",
        rename = "category_totals"
    )]
    CategoryTotals,
}

impl Command {
    /// Key of the handler in the command table
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => START,
            Command::Help => HELP,
            Command::ListExpenses => LIST_EXPENSES,
            Command::ListIncomes => LIST_INCOMES,
            Command::Balance => BALANCE,
            Command::ChangeStorage => CHANGE_STORAGE,
            Command::Limit(_) => LIMIT,
            Command::DeleteLimit => DELETE_LIMIT,
            Command::ExpensesByCategory => EXPENSES_BY_CATEGORY,
            Command::CategoryTotals => CATEGORY_TOTALS,
        }
    }

    /// Text after the command word, empty for commands without arguments
    pub fn args(&self) -> &str {
        match self {
            Command::Limit(amount) => amount.trim(),
            _ => "",
        }
    }
}

/// Handler of one literal command
#[async_trait::async_trait]
pub trait CommandHandler: Keyed<String> + Send + Sync {
    /// `args` is the text after the command word, possibly empty.
    /// Must leave the chat in its next conversation state before returning.
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        args: &str,
    ) -> Result<Vec<Reply>, BotError>;
}

pub type CommandTable = DispatchTable<String, dyn CommandHandler>;

/// Command text -> handler table
pub fn command_table() -> Result<CommandTable, DuplicateKey> {
    CommandTable::builder("commands")
        .register_keyed(Arc::new(CommandStart))
        .register_keyed(Arc::new(CommandHelp))
        .register_keyed(Arc::new(CommandListExpenses))
        .register_keyed(Arc::new(CommandListIncomes))
        .register_keyed(Arc::new(CommandBalance))
        .register_keyed(Arc::new(CommandChangeStorage))
        .register_keyed(Arc::new(CommandLimit))
        .register_keyed(Arc::new(CommandDeleteLimit))
        .register_keyed(Arc::new(CommandExpensesByCategory))
        .register_keyed(Arc::new(CommandCategoryTotals))
        .build()
}
