use thiserror::Error;

/// All errors produced by quietcut-core.
#[derive(Debug, Error)]
pub enum QuietcutError {
    #[error("invalid input buffer: {0}")]
    InvalidBuffer(String),

    #[error(
        "incompatible chunk format: expected {expected_rate} Hz / {expected_channels} ch, \
         found {found_rate} Hz / {found_channels} ch"
    )]
    IncompatibleFormat {
        expected_rate: u32,
        expected_channels: u16,
        found_rate: u32,
        found_channels: u16,
    },
}

pub type Result<T> = std::result::Result<T, QuietcutError>;
