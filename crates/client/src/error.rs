//! Session-layer error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty/whitespace-only argument, caught before any network call
    #[error("Argument text must not be empty")]
    EmptyArgument,

    /// A submission is already awaiting acknowledgment
    #[error("A submission is already in flight")]
    SubmissionPending,

    #[error(transparent)]
    Net(#[from] podium_net::Error),

    #[error(transparent)]
    Core(#[from] podium_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
