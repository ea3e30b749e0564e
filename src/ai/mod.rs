//! AI 搜索模块
//!
//! 提供 Minimax + Alpha-Beta 剪枝搜索，以及面向外部调用方的入口函数

mod minimax;

pub use minimax::{MinimaxAI, SCORE_BOUND, WIN_SCORE};

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{Cell, Piece, ScoredMove};
use serde::Serialize;
use std::cmp::Ordering;

/// 默认搜索深度（3×3 棋盘可搜到底）
pub const DEFAULT_DEPTH: u32 = 9;

/// AI 配置
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// 搜索深度上限（层数，从搜索根节点算起）
    pub max_depth: u32,
    /// 根节点候选走法是否并行搜索
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: DEFAULT_DEPTH,
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// 按调用方给出的深度创建配置，负数或超出 u32 范围的深度报错
    pub fn with_depth(depth: i64) -> Result<Self, EngineError> {
        if depth < 0 {
            return Err(EngineError::InvalidDepth(depth));
        }
        let max_depth = u32::try_from(depth).map_err(|_| EngineError::DepthTooLarge(depth))?;
        Ok(SearchConfig {
            max_depth,
            ..Default::default()
        })
    }
}

/// 单次搜索统计
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchStats {
    /// 访问节点数
    pub nodes: u64,
    pub elapsed_ms: f64,
}

/// 按分数从高到低排序并截断
///
/// 同分时下标大的排前面，与 `best_move` 的同分取后者规则一致。
pub fn rank_moves(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => b.index.cmp(&a.index),
        other => other,
    });
    scored.truncate(n);
}

/// 选择最佳落子格
///
/// `cells` 长度必须为 `size²`，`max_depth` 不能为负。对手固定为 `mover.opposite()`。
/// 棋盘已满时返回 `None`。
pub fn best_move(
    cells: &[Cell],
    size: usize,
    mover: Piece,
    max_depth: i64,
) -> Result<Option<usize>, EngineError> {
    let board = Board::from_cells(cells.to_vec(), size)?;
    let config = SearchConfig::with_depth(max_depth)?;
    Ok(MinimaxAI::new(&config).best_move(&board, mover))
}
