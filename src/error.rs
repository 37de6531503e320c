/// Failures raised by the board engine and the session's debug surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid rotation of {0} degrees (expected ±90, ±180 or ±270)")]
    InvalidRotation(i32),
    #[error("no empty cell left to place a tile")]
    ExhaustedBoard,
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}
