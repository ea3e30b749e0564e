//! N×N 棋盘
//!
//! 行优先存储：下标 `i` 对应第 `i / N` 行、第 `i % N` 列。

use crate::error::EngineError;
use crate::notation::{format_board, parse_board};
use crate::types::{Cell, Piece};
use std::fmt;

/// 棋盘（长度恒为 size²）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

/// 合法边长对应的格子数；边长为 0 或 size² 溢出时返回 None
fn cell_count(size: usize) -> Option<usize> {
    size.checked_mul(size).filter(|_| size > 0)
}

impl Board {
    /// 创建空棋盘
    pub fn new(size: usize) -> Result<Board, EngineError> {
        let len = cell_count(size).ok_or(EngineError::InvalidDimension { len: 0, size })?;
        Ok(Board {
            size,
            cells: vec![None; len],
        })
    }

    /// 从格子序列创建棋盘，长度必须等于 size²
    pub fn from_cells(cells: Vec<Cell>, size: usize) -> Result<Board, EngineError> {
        if cell_count(size) != Some(cells.len()) {
            return Err(EngineError::InvalidDimension {
                len: cells.len(),
                size,
            });
        }
        Ok(Board { size, cells })
    }

    /// 从记谱字符串创建棋盘
    pub fn from_notation(s: &str) -> Result<Board, EngineError> {
        let (cells, size) = parse_board(s)?;
        Board::from_cells(cells, size)
    }

    /// 转换为记谱字符串
    pub fn to_notation(&self) -> String {
        format_board(&self.cells, self.size)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// 格子总数
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 棋盘上没有任何棋子
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// 获取某格的棋子，越界返回 None
    #[inline]
    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// 下标转 (行, 列)
    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// (行, 列) 转下标
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// 棋盘是否已下满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 已落子数量
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// 所有空格下标（升序）
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    /// 正中心格（仅奇数边长存在）
    pub fn center(&self) -> Option<usize> {
        if self.size % 2 == 1 {
            let mid = self.size / 2;
            Some(self.index_of(mid, mid))
        } else {
            None
        }
    }

    /// 生成后继局面：返回新棋盘，原棋盘不变
    pub fn with_move(&self, index: usize, piece: Piece) -> Board {
        let mut next = self.clone();
        next.cells[index] = Some(piece);
        next
    }

    /// 原地落子（供外部调用方维护自己的棋盘）
    pub fn place(&mut self, index: usize, piece: Piece) -> Result<(), EngineError> {
        match self.cells.get(index) {
            None => Err(EngineError::IndexOutOfRange {
                index,
                cells: self.cells.len(),
            }),
            Some(Some(_)) => Err(EngineError::CellOccupied(index)),
            Some(None) => {
                self.cells[index] = Some(piece);
                Ok(())
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: String = row
                .iter()
                .map(|c| c.map_or('.', |p| p.to_char()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
