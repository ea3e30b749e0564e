//! 终局判定
//!
//! N 行、N 列、主对角线、副对角线共 2N+2 条线。一条线的 N 格全部非空且
//! 为同一方棋子即成线获胜。
//!
//! 提供两种实现：
//! - `evaluate`: 全盘扫描所有线
//! - `evaluate_at`: 只检查经过刚落子格的线
//!
//! 在"每步落子后都判定一次"的协议下，两者对所有可达局面结果一致。

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{Cell, Outcome, Piece};

/// 一条线经过的格子下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Column(usize),
    MainDiagonal,
    AntiDiagonal,
}

impl Line {
    fn indices(self, size: usize) -> impl Iterator<Item = usize> {
        (0..size).map(move |i| match self {
            Line::Row(r) => r * size + i,
            Line::Column(c) => i * size + c,
            Line::MainDiagonal => i * size + i,
            Line::AntiDiagonal => i * size + (size - 1 - i),
        })
    }
}

/// 全部 2N+2 条线，顺序：各行、各列、主对角线、副对角线
fn all_lines(size: usize) -> impl Iterator<Item = Line> {
    (0..size)
        .map(Line::Row)
        .chain((0..size).map(Line::Column))
        .chain([Line::MainDiagonal, Line::AntiDiagonal])
}

/// 经过某格的线，顺序与 `all_lines` 一致
fn lines_through(size: usize, index: usize) -> Vec<Line> {
    let (row, col) = (index / size, index % size);
    let mut lines = vec![Line::Row(row), Line::Column(col)];
    if row == col {
        lines.push(Line::MainDiagonal);
    }
    if row + col == size - 1 {
        lines.push(Line::AntiDiagonal);
    }
    lines
}

/// 该线是否被同一方占满，返回该方
fn line_owner(cells: &[Cell], size: usize, line: Line) -> Option<Piece> {
    let mut indices = line.indices(size);
    let first = cells[indices.next()?]?;
    indices
        .all(|i| cells[i] == Some(first))
        .then_some(first)
}

/// 所有线的下标列表，顺序：各行、各列、主对角线、副对角线
pub fn winning_lines(size: usize) -> Vec<Vec<usize>> {
    all_lines(size)
        .map(|line| line.indices(size).collect())
        .collect()
}

/// 汇总成线结果
fn collect_outcome(board: &Board, lines: impl Iterator<Item = Line>) -> Outcome {
    let cells = board.cells();
    let size = board.size();
    let mut winning_piece = None;
    let mut winning_line = Vec::new();

    for line in lines {
        if let Some(owner) = line_owner(cells, size, line) {
            winning_piece.get_or_insert(owner);
            winning_line.extend(line.indices(size));
        }
    }

    let full = board.is_full();
    let has_line = !winning_line.is_empty();
    Outcome {
        winning_piece,
        winning_line,
        is_over: full || has_line,
        is_draw: full && !has_line,
    }
}

/// 全盘判定
pub fn evaluate(board: &Board) -> Outcome {
    collect_outcome(board, all_lines(board.size()))
}

/// 从原始格子序列判定，长度必须等于 size²
pub fn evaluate_cells(cells: &[Cell], size: usize) -> Result<Outcome, EngineError> {
    let board = Board::from_cells(cells.to_vec(), size)?;
    Ok(evaluate(&board))
}

/// 增量判定：只检查经过 `placed` 的行、列和对角线
///
/// 仅在上一步之前局面尚未结束时与 `evaluate` 等价。
pub fn evaluate_at(board: &Board, placed: usize) -> Result<Outcome, EngineError> {
    if placed >= board.len() {
        return Err(EngineError::IndexOutOfRange {
            index: placed,
            cells: board.len(),
        });
    }
    Ok(collect_outcome(
        board,
        lines_through(board.size(), placed).into_iter(),
    ))
}
