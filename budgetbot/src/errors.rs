use teloxide::types::ChatId;

/// Operating on a chat that has never been opened with /start
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("chat {0} has not been opened")]
    NotFound(ChatId),
}

/// Any failure talking to the remote spreadsheet storage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote document `{0}` is not accessible")]
    NotAccessible(String),
    #[error("remote document `{handle}` is malformed: {reason}")]
    MalformedDocument { handle: String, reason: String },
    #[error("section `{section}` is missing in remote document `{handle}`")]
    MissingSection { handle: String, section: String },
    #[error("malformed row in section `{section}`: {reason}")]
    MalformedRow { section: String, reason: String },
    #[error("no remote document is linked to chat {0}")]
    NotLinked(ChatId),
    #[error("remote storage I/O failure: {0}")]
    Io(String),
}

/// Fault channel: only the router's error boundary handles these
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Recoverable outcomes reported to the user by the originating handler
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("`{0}` is not a valid amount")]
    InvalidAmount(String),
    #[error("the daily limit must be a positive number")]
    NonPositiveLimit,
    #[error("unrecognized record `{0}`")]
    UnrecognizedRecord(String),
    #[error("daily limit exceeded: spent {spent} of {cap}")]
    LimitExceeded { spent: f64, cap: f64 },
}

/// Result of an operation that may both fault and produce a domain outcome
pub type Outcome<T> = Result<Result<T, DomainError>, BotError>;

/// Startup configuration problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} not found")]
    MissingTokenVariable(String),
    #[error("no bot token provided and no precompiled token available, use --bot-token-env")]
    NoToken,
}
