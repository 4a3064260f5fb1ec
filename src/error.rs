use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("module `{0}` is registered more than once")]
    DuplicateModule(String),

    #[error("action `{action}` is declared by both `{first}` and `{second}`")]
    DuplicateAction {
        action: String,
        first: String,
        second: String,
    },

    #[error("slice `{slice}` is claimed by both `{first}` and `{second}`")]
    SliceOwnershipConflict {
        slice: String,
        first: String,
        second: String,
    },

    #[error("module `{module}` is not allowed to write slice `{slice}`")]
    SliceWriteDenied { module: String, slice: String },

    #[error("action `{action}` re-entered while running: {chain}")]
    ActionCycle { action: String, chain: String },

    #[error("notification limit of {limit} exceeded while propagating `{slice}`")]
    NotificationLimit { limit: usize, slice: String },

    #[error("action `{action}` expects {expected} payload")]
    InvalidPayload { action: String, expected: String },

    #[error("legend entry `{0}` not found")]
    LegendEntryNotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
