//! N 子棋核心类型定义
//!
//! 定义棋子、格子和终局结果等基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋子（双方阵营）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    X,
    O,
}

impl Piece {
    /// 获取对方棋子
    pub fn opposite(&self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
        }
    }

    /// 从记谱字符解析（大小写均可）
    pub fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_uppercase() {
            'X' => Some(Piece::X),
            'O' => Some(Piece::O),
            _ => None,
        }
    }

    /// 转换为记谱字符
    pub fn to_char(&self) -> char {
        match self {
            Piece::X => 'X',
            Piece::O => 'O',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// 格子：`None` 表示空
pub type Cell = Option<Piece>;

/// 终局判定结果
///
/// 不变量：
/// - `is_draw` 时 `is_over` 为真且 `winning_line` 为空
/// - `winning_line` 非空时 `is_over` 为真且 `winning_piece` 非空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// 获胜方，未分胜负时为 None
    pub winning_piece: Option<Piece>,
    /// 所有成线格子的下标（多条线时按顺序拼接，交点不去重）
    pub winning_line: Vec<usize>,
    pub is_over: bool,
    pub is_draw: bool,
}

impl Outcome {
    /// 是否有一方获胜
    #[inline]
    pub fn has_winner(&self) -> bool {
        self.winning_piece.is_some()
    }
}

/// 走法评分（根节点候选格及其 minimax 值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub index: usize,
    pub score: i32,
}
