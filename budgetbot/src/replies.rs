//! Fixed texts sent by the bot and formatting helpers for amounts and records

use chrono::{DateTime, Local, Utc};

use crate::{
    errors::DomainError,
    storages::{Expense, ExpenseCategory, Income, Limit},
};

pub const PLEASE_START: &str = "👋 Please send /start to begin.";
pub const UNKNOWN_COMMAND: &str = "🤷 Unknown command. Send /help to see what I can do.";
pub const UNRECOGNIZED_TEXT: &str =
    "🤔 I did not get that. Send \"+ 500 salary\" to add an income or \"- 50 coffee\" to add an expense.";
pub const STALE_BUTTON: &str = "⌛ This button is no longer active.";

pub const WELCOME: &str = "🤖 Budget Bot\nI keep track of your incomes, expenses and a daily spending limit.\n\nWhere should I keep your records?";
pub const WELCOME_BACK: &str = "👋 Welcome back! Send /help to see the commands.";
pub const CHOOSE_STORAGE: &str = "💾 Where should I keep your records?";
pub const LOCAL_SELECTED: &str = "✅ Your records are kept by the bot.";
pub const ASK_REMOTE_HANDLE: &str = "📄 Send me the id of your spreadsheet. Share the document with the bot first.";
pub const REMOTE_SELECTED: &str = "✅ Your records are now kept in your spreadsheet.";
pub const MOVED_TO_LOCAL: &str = "✅ Your records were moved back to the bot.";
pub const ALREADY_IN_MODE: &str = "ℹ️ Your records are already kept there.";

pub const INCOME_ADDED: &str = "✅ Income added.";
pub const CHOOSE_CATEGORY: &str = "✅ Expense added. Choose a category:";
pub const CATEGORY_CHANGED: &str = "🏷 Category saved.";
pub const NO_EXPENSE_TO_CATEGORIZE: &str = "📝 There is no expense to categorize.";
pub const CHOOSE_FILTER_CATEGORY: &str = "🗂 Which category do you want to see?";

pub const ASK_DAILY_LIMIT: &str = "💰 Send me your daily spending limit, e.g. 100.";
pub const LIMIT_DELETED: &str = "🗑 Daily limit removed.";
pub const NO_LIMIT: &str = "ℹ️ No daily limit is set.";
pub const NON_POSITIVE_LIMIT: &str = "❌ The daily limit must be a positive number. Try again.";

pub const NO_EXPENSES: &str = "📝 No expenses recorded yet. Send \"- 50 coffee\" to add one.";
pub const NO_INCOMES: &str = "📝 No incomes recorded yet. Send \"+ 500 salary\" to add one.";

pub const REMOTE_FAILURE_CAUSES: &str = "❌ I could not work with your spreadsheet. Most likely:\n\
     • the document is not shared with the bot,\n\
     • the document misses the Incomes, Expenses, Balance or Limit sheets,\n\
     • the document id is wrong or the document is not accessible.";
pub const REMOTE_DATA_UNREACHABLE: &str = "⚠️ I switched you back to local storage. Whatever is in the spreadsheet is no longer reachable from the bot; use /change_storage to try again.";

pub const RECORDS_HELP: &str = "Add records by sending \"+ 500 salary\" or \"- 50 coffee\".";

/// Whole amounts without decimals, others with two
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

pub fn limit_exceeded(spent: f64, cap: f64) -> String {
    format!(
        "⚠️ Daily limit exceeded: you spent {} of {} today.",
        format_amount(spent),
        format_amount(cap)
    )
}

pub fn limit_status(limit: &Limit) -> String {
    format!(
        "💰 Daily limit: {}, spent today: {}.",
        format_amount(limit.daily_cap),
        format_amount(limit.daily_spent)
    )
}

pub fn no_expenses_in(category: &ExpenseCategory) -> String {
    format!("📝 No expenses in {}.", category.label())
}

pub fn invalid_amount(text: &str) -> String {
    format!("❌ \"{}\" is not a valid amount.", text)
}

/// The single message a handler sends for a recoverable outcome
pub fn domain_error(error: &DomainError) -> String {
    match error {
        DomainError::InvalidAmount(text) => invalid_amount(text),
        DomainError::NonPositiveLimit => NON_POSITIVE_LIMIT.to_string(),
        DomainError::UnrecognizedRecord(_) => UNRECOGNIZED_TEXT.to_string(),
        DomainError::LimitExceeded { spent, cap } => limit_exceeded(*spent, *cap),
    }
}

pub fn balance(balance: f64) -> String {
    format!("💼 Balance: {}", format_amount(balance))
}

/// Chronological list, one record per line
pub fn format_expenses(expenses: &[Expense]) -> String {
    expenses
        .iter()
        .map(|e| {
            format!(
                "{} {} {} [{}]",
                format_date(&e.timestamp),
                e.description,
                format_amount(e.amount),
                e.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_incomes(incomes: &[Income]) -> String {
    incomes
        .iter()
        .map(|i| {
            format!(
                "{} {} {}",
                format_date(&i.timestamp),
                i.description,
                format_amount(i.amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
