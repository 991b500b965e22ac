use std::sync::LazyLock;

use regex::Regex;
use teloxide::utils::command::{BotCommands, ParseError};

use crate::{commands::Command, errors::DomainError};

/// Prefix that marks a message as a command
pub const COMMAND_PREFIX: char = '/';

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])\s*(\S+)(?:\s+(.*))?$").expect("record pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Expense,
}

/// A "+amount description" / "-amount description" shorthand line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub kind: RecordKind,
    pub amount: f64,
    pub description: String,
}

/// Parse a number written by a user; both `12.5` and `12,5` are accepted
pub fn parse_amount(text: &str) -> Result<f64, DomainError> {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(DomainError::InvalidAmount(text.trim().to_string())),
    }
}

/// Parse the income/expense shorthand. The amount must be positive, the sign selects the kind.
pub fn parse_record(text: &str) -> Result<ParsedRecord, DomainError> {
    let text = text.trim();
    let Some(captures) = RECORD_RE.captures(text) else {
        return Err(DomainError::UnrecognizedRecord(text.to_string()));
    };
    let kind = match &captures[1] {
        "+" => RecordKind::Income,
        _ => RecordKind::Expense,
    };
    let amount = parse_amount(&captures[2])?;
    if amount <= 0.0 {
        return Err(DomainError::InvalidAmount(captures[2].to_string()));
    }
    let description = captures
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Ok(ParsedRecord {
        kind,
        amount,
        description,
    })
}

/// Parse a command addressed to this bot. Returns None for text that is not a command.
pub fn parse_command(text: &str, bot_name: &str) -> Option<Result<Command, ParseError>> {
    let text = text.trim();
    if !text.starts_with(COMMAND_PREFIX) {
        return None;
    }
    Some(Command::parse(text, bot_name))
}
