//! Minimax AI 策略

use super::{SearchConfig, SearchStats};
use crate::board::Board;
use crate::outcome::evaluate;
use crate::types::{Outcome, Piece, ScoredMove};
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// 胜负基准分：第 d 层获胜得 `WIN_SCORE - d`，失败得 `d - WIN_SCORE`
pub const WIN_SCORE: i32 = 10;

/// Alpha-Beta 初始窗口
pub const SCORE_BOUND: i32 = 100;

/// Minimax AI - 使用 Alpha-Beta 剪枝
///
/// 无置换表、无迭代加深，按下标顺序展开。
pub struct MinimaxAI {
    max_depth: u32,
    parallel: bool,
}

/// 单次搜索的上下文
struct Search {
    mover: Piece,
    opponent: Piece,
    max_depth: u32,
    nodes: AtomicU64,
}

impl Search {
    fn new(mover: Piece, max_depth: u32) -> Self {
        Search {
            mover,
            opponent: mover.opposite(),
            max_depth,
            nodes: AtomicU64::new(0),
        }
    }

    /// 叶子节点评分（始终从 mover 视角）
    fn score(&self, outcome: &Outcome, depth: u32) -> i32 {
        let depth = depth as i32;
        match outcome.winning_piece {
            Some(piece) if piece == self.mover => WIN_SCORE - depth,
            Some(_) => depth - WIN_SCORE,
            None => 0,
        }
    }

    /// Minimax 搜索（带 Alpha-Beta 剪枝）
    fn minimax(&self, board: &Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes.fetch_add(1, Ordering::Relaxed);

        let outcome = evaluate(board);
        if outcome.is_over || depth >= self.max_depth {
            return self.score(&outcome, depth);
        }

        if maximizing {
            let mut best = -SCORE_BOUND;
            for index in board.empty_cells() {
                let child = board.with_move(index, self.mover);
                best = best.max(self.minimax(&child, depth + 1, alpha, beta, false));
                alpha = alpha.max(best);
                if best >= beta {
                    break; // Beta 剪枝
                }
            }
            best
        } else {
            let mut best = SCORE_BOUND;
            for index in board.empty_cells() {
                let child = board.with_move(index, self.opponent);
                best = best.min(self.minimax(&child, depth + 1, alpha, beta, true));
                beta = beta.min(best);
                if best <= alpha {
                    break; // Alpha 剪枝
                }
            }
            best
        }
    }

    /// 根节点：mover 落子后轮到对手，从第 1 层的极小层开始
    fn score_root_move(&self, board: &Board, index: usize) -> ScoredMove {
        let child = board.with_move(index, self.mover);
        let score = self.minimax(&child, 1, -SCORE_BOUND, SCORE_BOUND, false);
        trace!("candidate {} -> {}", index, score);
        ScoredMove { index, score }
    }
}

impl MinimaxAI {
    pub fn new(config: &SearchConfig) -> Self {
        MinimaxAI {
            max_depth: config.max_depth,
            parallel: config.parallel,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// 开局定式：全盘至多一子且正中心为空时直接占中心
    pub fn opening_move(board: &Board) -> Option<usize> {
        if board.occupied_count() > 1 {
            return None;
        }
        board.center().filter(|&center| board.get(center).is_none())
    }

    /// 为每个空格打分（下标升序，不含开局定式）
    pub fn score_moves(&self, board: &Board, mover: Piece) -> Vec<ScoredMove> {
        let search = Search::new(mover, self.max_depth);
        self.score_with(&search, board)
    }

    fn score_with(&self, search: &Search, board: &Board) -> Vec<ScoredMove> {
        let candidates: Vec<usize> = board.empty_cells().collect();
        if self.parallel {
            // 各分支互不共享状态，collect 保持下标顺序
            candidates
                .par_iter()
                .map(|&index| search.score_root_move(board, index))
                .collect()
        } else {
            candidates
                .iter()
                .map(|&index| search.score_root_move(board, index))
                .collect()
        }
    }

    /// 选择最佳落子格，棋盘已满时返回 None
    pub fn best_move(&self, board: &Board, mover: Piece) -> Option<usize> {
        self.search_moves(board, mover).0
    }

    /// 选择最佳落子格并返回搜索统计
    pub fn best_move_with_stats(&self, board: &Board, mover: Piece) -> (Option<usize>, SearchStats) {
        let (best, _, stats) = self.search_moves(board, mover);
        (best, stats)
    }

    /// 一次搜索同时返回最佳落子格、全部候选评分（下标升序）和统计
    ///
    /// 开局定式命中时不搜索，候选列表为空。
    pub fn search_moves(&self, board: &Board, mover: Piece) -> (Option<usize>, Vec<ScoredMove>, SearchStats) {
        let start = Instant::now();

        if let Some(center) = Self::opening_move(board) {
            debug!("opening move: center {}", center);
            return (Some(center), Vec::new(), SearchStats::default());
        }

        if !board.is_full() && evaluate(board).is_over {
            warn!("searching a finished position:\n{}", board);
        }

        let search = Search::new(mover, self.max_depth);
        let scored = self.score_with(&search, board);
        let best = pick_best(&scored);

        let stats = SearchStats {
            nodes: search.nodes.load(Ordering::Relaxed),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        debug!(
            "minimax: mover={} depth={} best={:?} nodes={} time={:.3}ms",
            mover, self.max_depth, best, stats.nodes, stats.elapsed_ms
        );
        (best.map(|sm| sm.index), scored, stats)
    }
}

/// 取最高分；同分时取后出现的（>= 比较）
fn pick_best(scored: &[ScoredMove]) -> Option<ScoredMove> {
    let mut best_score = -SCORE_BOUND;
    let mut best = None;
    for sm in scored {
        if sm.score >= best_score {
            best_score = sm.score;
            best = Some(*sm);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions::*;
    use rand::prelude::*;

    fn board(s: &str) -> Board {
        Board::from_notation(s).unwrap()
    }

    fn ai(depth: u32) -> MinimaxAI {
        MinimaxAI::new(&SearchConfig {
            max_depth: depth,
            parallel: false,
        })
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board(WIN_IN_ONE);
        assert_eq!(ai(9).best_move(&b, Piece::X), Some(2));

        let scored = ai(9).score_moves(&b, Piece::X);
        let win = scored.iter().find(|sm| sm.index == 2).unwrap();
        assert_eq!(win.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_immediate_win_at_depth_zero() {
        assert_eq!(ai(0).best_move(&board(WIN_IN_ONE), Piece::X), Some(2));
    }

    #[test]
    fn test_blocks_opponent_win() {
        assert_eq!(ai(9).best_move(&board(MUST_BLOCK), Piece::X), Some(2));
    }

    #[test]
    fn test_blocks_even_when_lost() {
        // O 堵 2 之后 X 走 4 形成双杀，但晚输好过马上输
        let b = board(BLOCK_THEN_LOSE);
        let scored = ai(9).score_moves(&b, Piece::O);
        assert_eq!(ai(9).best_move(&b, Piece::O), Some(2));
        let block = scored.iter().find(|sm| sm.index == 2).unwrap();
        assert_eq!(block.score, 4 - WIN_SCORE);
        assert!(scored
            .iter()
            .filter(|sm| sm.index != 2)
            .all(|sm| sm.score == 2 - WIN_SCORE));
    }

    #[test]
    fn test_opening_takes_center() {
        assert_eq!(ai(9).best_move(&Board::new(3).unwrap(), Piece::X), Some(4));
        assert_eq!(ai(9).best_move(&Board::new(3).unwrap(), Piece::O), Some(4));
        assert_eq!(ai(2).best_move(&Board::new(5).unwrap(), Piece::X), Some(12));
        assert_eq!(ai(9).best_move(&board(CORNER_OPENING), Piece::O), Some(4));
    }

    #[test]
    fn test_opening_skips_search() {
        let (mv, stats) = ai(9).best_move_with_stats(&Board::new(3).unwrap(), Piece::X);
        assert_eq!(mv, Some(4));
        assert_eq!(stats.nodes, 0);

        // 中心已被占，正常搜索
        let (mv, stats) = ai(9).best_move_with_stats(&board(CENTER_OPENING), Piece::O);
        assert!(mv.is_some());
        assert_ne!(mv, Some(4));
        assert!(stats.nodes > 0);
    }

    #[test]
    fn test_ties_favor_last_cell() {
        // 深度 1 只看得到一步杀，其余全部 0 分
        let b = board("X../.O./...");
        assert_eq!(ai(1).best_move(&b, Piece::X), Some(8));

        // 偶数边长没有中心，空棋盘浅搜全 0 分
        assert_eq!(ai(2).best_move(&Board::new(4).unwrap(), Piece::X), Some(15));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board(DRAWN);
        assert_eq!(ai(9).best_move(&b, Piece::X), None);
        assert!(ai(9).score_moves(&b, Piece::X).is_empty());
    }

    #[test]
    fn test_never_picks_occupied_cell() {
        let mut rng = StdRng::seed_from_u64(7);

        for (size, depth) in [(3, 9), (3, 2), (4, 3)] {
            for _ in 0..30 {
                let mut b = Board::new(size).unwrap();
                let mut piece = Piece::X;
                let moves = rng.gen_range(0..size * size);
                for _ in 0..moves {
                    let empty: Vec<usize> = b.empty_cells().collect();
                    let index = *empty.choose(&mut rng).unwrap();
                    b.place(index, piece).unwrap();
                    if evaluate(&b).is_over {
                        break;
                    }
                    piece = piece.opposite();
                }
                if evaluate(&b).is_over {
                    continue;
                }

                let mv = ai(depth).best_move(&b, piece).unwrap();
                assert!(b.get(mv).is_none(), "picked occupied cell {} on\n{}", mv, b);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let par = MinimaxAI::new(&SearchConfig {
            max_depth: 9,
            parallel: true,
        });
        for notation in [WIN_IN_ONE, MUST_BLOCK, BLOCK_THEN_LOSE, CENTER_OPENING, FORK] {
            let b = board(notation);
            for mover in [Piece::X, Piece::O] {
                assert_eq!(par.score_moves(&b, mover), ai(9).score_moves(&b, mover));
                assert_eq!(par.best_move(&b, mover), ai(9).best_move(&b, mover));
            }
        }
    }

    #[test]
    fn test_takes_fork() {
        // X 走 4 形成 (0,4,8) 与 (3,4,5) 双杀
        let b = board(FORK);
        let scored = ai(9).score_moves(&b, Piece::X);
        let fork = scored.iter().find(|sm| sm.index == 4).unwrap();
        assert_eq!(fork.score, WIN_SCORE - 3);
    }

    #[test]
    fn test_self_play_is_draw() {
        for parallel in [false, true] {
            let engine = MinimaxAI::new(&SearchConfig {
                max_depth: 9,
                parallel,
            });
            let mut b = Board::new(3).unwrap();
            let mut mover = Piece::X;

            loop {
                let outcome = evaluate(&b);
                if outcome.is_over {
                    assert!(outcome.is_draw, "self-play ended with a win:\n{}", b);
                    break;
                }
                let mv = engine.best_move(&b, mover).unwrap();
                b.place(mv, mover).unwrap();
                mover = mover.opposite();
            }
        }
    }

    #[test]
    fn test_search_moves_single_pass() {
        let b = board(BLOCK_THEN_LOSE);
        let engine = ai(9);
        let (best, scored, stats) = engine.search_moves(&b, Piece::O);
        let (_, stats_best) = engine.best_move_with_stats(&b, Piece::O);

        assert_eq!(best, Some(2));
        assert_eq!(scored, engine.score_moves(&b, Piece::O));
        assert_eq!(best, pick_best(&scored).map(|sm| sm.index));
        assert_eq!(stats.nodes, stats_best.nodes);

        let (best, scored, stats) = engine.search_moves(&Board::new(3).unwrap(), Piece::X);
        assert_eq!(best, Some(4));
        assert!(scored.is_empty());
        assert_eq!(stats.nodes, 0);
    }

    /// 不剪枝的 minimax，作为对照
    fn plain_minimax(search: &Search, board: &Board, depth: u32, maximizing: bool) -> i32 {
        let outcome = evaluate(board);
        if outcome.is_over || depth >= search.max_depth {
            return search.score(&outcome, depth);
        }
        let piece = if maximizing { search.mover } else { search.opponent };
        let values = board
            .empty_cells()
            .map(|index| plain_minimax(search, &board.with_move(index, piece), depth + 1, !maximizing));
        if maximizing {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    #[test]
    fn test_pruning_preserves_minimax_values() {
        let mut rng = StdRng::seed_from_u64(2024);

        for (size, max_depth) in [(3, 9), (3, 3), (4, 3)] {
            for _ in 0..60 {
                let mut b = Board::new(size).unwrap();
                let mut piece = Piece::X;
                // 至少两子，控制对照搜索的规模
                for _ in 0..rng.gen_range(2..size * size) {
                    let empty: Vec<usize> = b.empty_cells().collect();
                    b.place(*empty.choose(&mut rng).unwrap(), piece).unwrap();
                    if evaluate(&b).is_over {
                        break;
                    }
                    piece = piece.opposite();
                }
                if evaluate(&b).is_over {
                    continue;
                }

                let search = Search::new(piece, max_depth);
                for index in b.empty_cells() {
                    let child = b.with_move(index, piece);
                    assert_eq!(
                        search.minimax(&child, 1, -SCORE_BOUND, SCORE_BOUND, false),
                        plain_minimax(&search, &child, 1, false),
                        "cell {} on\n{}",
                        index,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_depth_limit_scores_zero() {
        // 深度 2 看不到 X 的双杀
        let scored = ai(2).score_moves(&board(FORK), Piece::X);
        let fork = scored.iter().find(|sm| sm.index == 4).unwrap();
        assert_eq!(fork.score, 0);
    }
}
