use thiserror::Error;

/// Anything that can end a session. The per-connection loop treats every variant the same
/// way: log it at `warn`, then let the thread return — there is no recoverable path back
/// into the state machine once one of these fires.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("varint is longer than 5 bytes")]
    MalformedVarInt,
    #[error("frame length {0} is out of bounds")]
    FrameTooLarge(i32),
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("peer closed the connection")]
    Closed,
}

impl From<mc_binary::CodecError> for ServerError {
    fn from(err: mc_binary::CodecError) -> Self {
        match err {
            mc_binary::CodecError::Io(e) => ServerError::Io(e),
            mc_binary::CodecError::MalformedVarInt => ServerError::MalformedVarInt,
            mc_binary::CodecError::FrameTooLarge(n) => ServerError::FrameTooLarge(n),
            mc_binary::CodecError::UnexpectedEof => ServerError::UnexpectedEof,
            mc_binary::CodecError::InvalidUtf8 => ServerError::InvalidUtf8,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
