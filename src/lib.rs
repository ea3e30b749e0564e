//! N-in-a-row AI Engine
//!
//! N 子棋（广义井字棋）终局判定与 Minimax 搜索引擎 - 支持记谱输入输出

pub mod ai;
pub mod board;
pub mod error;
pub mod notation;
pub mod outcome;
pub mod test_positions;
pub mod types;

pub use ai::{best_move, rank_moves, MinimaxAI, SearchConfig, SearchStats, DEFAULT_DEPTH};
pub use board::Board;
pub use error::EngineError;
pub use notation::{format_board, parse_board};
pub use outcome::{evaluate, evaluate_at, evaluate_cells, winning_lines};
pub use types::{Cell, Outcome, Piece, ScoredMove};
