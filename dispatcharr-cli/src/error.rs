use dispatcharr_grid::query::ActionError;
use dispatcharr_grid::reorder::DragError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Api(#[from] dispatcharr_lib::error::Error),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Drag(#[from] DragError),

    #[error("{0} is not configured; run `dispatcharr config set {0} <value>` or pass it as an option")]
    NotConfigured(&'static str),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("could not load the table: {0}")]
    Fetch(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}
