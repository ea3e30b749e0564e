//! N-in-a-row AI CLI
//!
//! 命令行界面，供表现层调用判定与搜索
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use nrow_ai::test_positions::get_position;
use nrow_ai::{
    evaluate, evaluate_at, rank_moves, Board, EngineError, MinimaxAI, Outcome, Piece, ScoredMove,
    SearchConfig, SearchStats, DEFAULT_DEPTH,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "nrow-ai")]
#[command(about = "N-in-a-row (tic-tac-toe) AI Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 判定局面是否结束
    Eval {
        /// 棋盘记谱（或命名局面，如 fork）
        #[arg(long)]
        board: String,

        /// 刚落子的格子，给出时只做增量判定
        #[arg(long)]
        last: Option<usize>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳落子格
    Best {
        /// 棋盘记谱（或命名局面）
        #[arg(long)]
        board: String,

        /// 行棋方 (X / O)
        #[arg(long, value_parser = parse_piece)]
        mover: Piece,

        /// 搜索深度
        #[arg(long, default_value_t = DEFAULT_DEPTH as i64, allow_negative_numbers = true)]
        depth: i64,

        /// 根节点并行搜索
        #[arg(long)]
        parallel: bool,

        /// 显示的候选走法数量
        #[arg(long, default_value = "3")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 两个 AI 从空棋盘开始对弈
    Selfplay {
        /// 棋盘边长
        #[arg(long, default_value = "3")]
        size: usize,

        /// 搜索深度
        #[arg(long, default_value_t = DEFAULT_DEPTH as i64, allow_negative_numbers = true)]
        depth: i64,

        /// 根节点并行搜索
        #[arg(long)]
        parallel: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

fn parse_piece(s: &str) -> Result<Piece, String> {
    let mut chars = s.trim().chars();
    match (chars.next().and_then(Piece::from_char), chars.next()) {
        (Some(piece), None) => Ok(piece),
        _ => Err(format!("Invalid piece: {} (expected X or O)", s)),
    }
}

/// 命名局面优先，否则按记谱解析
fn resolve_board(s: &str) -> Result<Board, EngineError> {
    Board::from_notation(get_position(s).unwrap_or(s))
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    board: String,
    #[serde(default)]
    mover: Option<String>,
    #[serde(default)]
    depth: Option<i64>,
    #[serde(default)]
    parallel: Option<bool>,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    last: Option<usize>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    // 规范化后的棋盘记谱
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<String>,
    // eval 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    // best 命令的字段，-1 表示没有空格
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<ScoredMove>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_eval(board: &Board, outcome: Outcome) -> Self {
        Self {
            ok: true,
            board: Some(board.to_notation()),
            outcome: Some(outcome),
            ..Default::default()
        }
    }

    fn success_best(result: BestResult) -> Self {
        Self {
            ok: true,
            board: Some(result.board),
            best: Some(move_to_wire(result.best)),
            moves: Some(result.moves),
            depth: Some(result.depth),
            nodes: Some(result.stats.nodes),
            elapsed_ms: Some(result.stats.elapsed_ms),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

/// 外部约定：没有可走格时返回 -1
fn move_to_wire(mv: Option<usize>) -> i64 {
    mv.map_or(-1, |index| index as i64)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match encoded {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: failed to encode JSON: {}", e),
    }
}

fn exit_with(e: EngineError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

struct BestResult {
    board: String,
    best: Option<usize>,
    moves: Vec<ScoredMove>,
    depth: u32,
    stats: SearchStats,
}

/// 执行搜索并返回最佳走法和排序后的候选走法
fn do_best(board: &Board, mover: Piece, depth: i64, parallel: bool, n: usize) -> Result<BestResult, EngineError> {
    let config = SearchConfig {
        parallel,
        ..SearchConfig::with_depth(depth)?
    };
    let ai = MinimaxAI::new(&config);
    let (best, mut moves, stats) = ai.search_moves(board, mover);
    rank_moves(&mut moves, n);

    Ok(BestResult {
        board: board.to_notation(),
        best,
        moves,
        depth: ai.max_depth(),
        stats,
    })
}

fn do_eval(board: &Board, last: Option<usize>) -> Result<Outcome, EngineError> {
    match last {
        Some(index) => evaluate_at(board, index),
        None => Ok(evaluate(board)),
    }
}

fn print_outcome(outcome: &Outcome) {
    if outcome.is_draw {
        println!("Draw");
    } else if let Some(piece) = outcome.winning_piece {
        println!("{} has won! line: {:?}", piece, outcome.winning_line);
    } else {
        println!("Game in progress");
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { board, last, json } => {
            let board = resolve_board(&board).unwrap_or_else(|e| exit_with(e));
            let outcome = do_eval(&board, last).unwrap_or_else(|e| exit_with(e));
            if json {
                print_json(&outcome, true);
            } else {
                print!("{}", board);
                print_outcome(&outcome);
            }
        }

        Commands::Best {
            board,
            mover,
            depth,
            parallel,
            n,
            json,
        } => {
            let board = resolve_board(&board).unwrap_or_else(|e| exit_with(e));
            let result = do_best(&board, mover, depth, parallel, n).unwrap_or_else(|e| exit_with(e));

            if json {
                print_json(&ServerResponse::success_best(result), true);
            } else {
                println!("Best move for {}: {}", mover, move_to_wire(result.best));
                for sm in &result.moves {
                    let (row, col) = board.row_col(sm.index);
                    println!("  {} [{},{}] (score: {})", sm.index, row, col, sm.score);
                }
                println!(
                    "\nStats: depth={}, nodes={}, time={:.3}ms",
                    result.depth, result.stats.nodes, result.stats.elapsed_ms
                );
            }
        }

        Commands::Selfplay {
            size,
            depth,
            parallel,
        } => {
            let config = SearchConfig {
                parallel,
                ..SearchConfig::with_depth(depth).unwrap_or_else(|e| exit_with(e))
            };
            run_selfplay(size, &config);
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// 自我对弈：X 先手，直到终局
fn run_selfplay(size: usize, config: &SearchConfig) {
    let ai = MinimaxAI::new(config);
    let mut board = Board::new(size).unwrap_or_else(|e| exit_with(e));
    let mut mover = Piece::X;

    loop {
        let outcome = evaluate(&board);
        if outcome.is_over {
            print!("{}", board);
            print_outcome(&outcome);
            break;
        }

        let (mv, stats) = ai.best_move_with_stats(&board, mover);
        let Some(index) = mv else {
            break;
        };
        if let Err(e) = board.place(index, mover) {
            exit_with(e);
        }
        println!(
            "{} -> {} (nodes={}, time={:.3}ms)",
            mover, index, stats.nodes, stats.elapsed_ms
        );
        mover = mover.opposite();
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::error(&format!("Invalid JSON: {}", e)), false);
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "eval" => handle_eval_request(&request),
            "best" => handle_best_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        print_json(&response, false);
        let _ = stdout.flush();
    }
}

/// 处理 eval 命令
fn handle_eval_request(request: &ServerRequest) -> ServerResponse {
    let result = resolve_board(&request.board)
        .and_then(|board| do_eval(&board, request.last).map(|outcome| (board, outcome)));
    match result {
        Ok((board, outcome)) => ServerResponse::success_eval(&board, outcome),
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}

/// 处理 best 命令
fn handle_best_request(request: &ServerRequest) -> ServerResponse {
    let mover = match request.mover.as_deref().map(parse_piece) {
        Some(Ok(piece)) => piece,
        Some(Err(e)) => return ServerResponse::error(&e),
        None => return ServerResponse::error("Missing mover"),
    };
    let depth = request.depth.unwrap_or(DEFAULT_DEPTH as i64);
    let parallel = request.parallel.unwrap_or(false);
    let n = request.n.unwrap_or(3);

    let result = resolve_board(&request.board)
        .and_then(|board| do_best(&board, mover, depth, parallel, n));
    match result {
        Ok(result) => ServerResponse::success_best(result),
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}
