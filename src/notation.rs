//! 棋盘记谱解析和生成
//!
//! 格式: `<行>/<行>/...`，共 N 行，每行 N 格，从第 0 行写起
//!
//! 棋盘符号：
//! - 棋子：X O（大小写均可）
//! - 空格：`.` `_` `-` 或数字 (1-9，表示连续空格数)
//!
//! 不带 `/` 时整串视为 N² 个格子（长度必须是完全平方数，不支持数字）。

use crate::error::EngineError;
use crate::types::{Cell, Piece};

/// 解析记谱字符串，返回 (格子序列, 边长)
pub fn parse_board(s: &str) -> Result<(Vec<Cell>, usize), EngineError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(EngineError::InvalidNotation("empty board".to_string()));
    }

    if s.contains('/') {
        parse_rows(s)
    } else {
        parse_flat(s)
    }
}

fn parse_rows(s: &str) -> Result<(Vec<Cell>, usize), EngineError> {
    let rows: Vec<&str> = s.split('/').collect();
    let size = rows.len();
    let mut cells = Vec::with_capacity(size * size);

    for (row_idx, row_str) in rows.iter().enumerate() {
        let mut row = Vec::with_capacity(size);
        for ch in row_str.chars() {
            if let Some(run) = ch.to_digit(10).filter(|&d| d > 0) {
                row.extend(std::iter::repeat(None).take(run as usize));
            } else {
                row.push(parse_cell(ch)?);
            }
        }

        if row.len() != size {
            return Err(EngineError::InvalidNotation(format!(
                "row {} has {} cells, expected {}",
                row_idx,
                row.len(),
                size
            )));
        }
        cells.extend(row);
    }

    Ok((cells, size))
}

fn parse_flat(s: &str) -> Result<(Vec<Cell>, usize), EngineError> {
    let cells = s.chars().map(parse_cell).collect::<Result<Vec<_>, _>>()?;
    let size = integer_sqrt(cells.len());
    if size * size != cells.len() {
        return Err(EngineError::InvalidNotation(format!(
            "{} cells is not a square board",
            cells.len()
        )));
    }
    Ok((cells, size))
}

fn parse_cell(ch: char) -> Result<Cell, EngineError> {
    match ch {
        '.' | '_' | '-' => Ok(None),
        _ => Piece::from_char(ch)
            .map(Some)
            .ok_or_else(|| EngineError::InvalidNotation(format!("unexpected character '{}'", ch))),
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// 生成记谱字符串（`/` 分隔，空格用 `.`）
pub fn format_board(cells: &[Cell], size: usize) -> String {
    cells
        .chunks(size.max(1))
        .map(|row| {
            row.iter()
                .map(|c| c.map_or('.', |p| p.to_char()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}
