//! 行处理上下文
//!
//! 封装"我正在处理第几行"这一信息

use std::fmt::Display;

/// 行处理上下文
#[derive(Debug, Clone, Copy)]
pub struct RowCtx {
    /// 表格中的行号（从 1 开始）
    pub row_number: i64,

    /// 本批次中的序号（从 1 开始，仅用于日志显示）
    pub position: usize,

    /// 本批次总行数
    pub total: usize,
}

impl RowCtx {
    /// 创建新的行上下文
    pub fn new(row_number: i64, position: usize, total: usize) -> Self {
        Self {
            row_number,
            position,
            total,
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[第 {} 行 {}/{}]",
            self.row_number, self.position, self.total
        )
    }
}
