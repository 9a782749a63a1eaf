/// Crate-wide error type.
///
/// Gameplay failure (running out of tries) is not an error; only device
/// faults and user-initiated shutdown travel through here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ctrl+C / Esc on the host, or an exhausted input script in tests.
    #[error("interrupted")]
    Interrupted,

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the error means "stop playing" rather than a device fault.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}
