//! 错误类型

/// 引擎错误
///
/// 全部是调用方的编程错误（输入结构不合法），重试无意义。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("board length {len} does not match a {size}x{size} board")]
    InvalidDimension { len: usize, size: usize },

    #[error("search depth must be >= 0, got {0}")]
    InvalidDepth(i64),

    #[error("search depth {0} exceeds the maximum of {max}", max = u32::MAX)]
    DepthTooLarge(i64),

    #[error("cell index {index} out of range for a board of {cells} cells")]
    IndexOutOfRange { index: usize, cells: usize },

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("invalid board notation: {0}")]
    InvalidNotation(String),
}
