//! 测试局面库
//!
//! 提供命名的 3×3 测试局面（记谱格式），方便测试和调试
//!
//! 命名规范:
//! - OPENING: 开局（至多一子）
//! - WIN / BLOCK / FORK: 战术局面
//! - 终局: 已分胜负或和棋

// =============================================================================
// 开局
// =============================================================================

/// 空棋盘
pub const EMPTY: &str = ".../.../...";

/// X 占角
pub const CORNER_OPENING: &str = "X../.../...";

/// X 占中心
pub const CENTER_OPENING: &str = ".../.X./...";

// =============================================================================
// 战术
// =============================================================================

/// X 走 2 一步胜
pub const WIN_IN_ONE: &str = "XX./OO./...";

/// X 必须走 2 堵住 O 的第 0 行
pub const MUST_BLOCK: &str = "OO./X../...";

/// O 必须走 2 堵住，但随后 X 走 4 形成双杀
pub const BLOCK_THEN_LOSE: &str = "XX./O../...";

/// X 走 4 形成 (0,4,8) 与 (3,4,5) 双杀
pub const FORK: &str = "XO./X../O..";

// =============================================================================
// 终局
// =============================================================================

/// 和棋（下满无成线）
pub const DRAWN: &str = "XOX/XOO/OXX";

/// X 第 0 行成线
pub const X_WINS_ROW: &str = "XXX/OO./...";

/// O 副对角线成线
pub const O_WINS_ANTI_DIAGONAL: &str = "X.O/XO./O..";

/// 所有命名局面
pub const ALL_POSITIONS: &[(&str, &str)] = &[
    ("EMPTY", EMPTY),
    ("CORNER_OPENING", CORNER_OPENING),
    ("CENTER_OPENING", CENTER_OPENING),
    ("WIN_IN_ONE", WIN_IN_ONE),
    ("MUST_BLOCK", MUST_BLOCK),
    ("BLOCK_THEN_LOSE", BLOCK_THEN_LOSE),
    ("FORK", FORK),
    ("DRAWN", DRAWN),
    ("X_WINS_ROW", X_WINS_ROW),
    ("O_WINS_ANTI_DIAGONAL", O_WINS_ANTI_DIAGONAL),
];

/// 按名称查找局面（大小写不敏感）
pub fn get_position(name: &str) -> Option<&'static str> {
    ALL_POSITIONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, notation)| *notation)
}
