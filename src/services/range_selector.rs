//! 行范围计算 - 业务能力层

use crate::error::ConfigError;
use crate::models::{RangeMode, RangeSpec, RowRange};

/// 计算要处理的闭区间行范围
///
/// - `Auto`：从 `header_row + 1` 开始数 `auto_count` 行，
///   `auto_count <= 0` 得到空范围（不是错误）
/// - `Fixed`：原样使用 `fixed_start` / `fixed_end`，不检查与表头的关系
pub fn select_range(
    mode: RangeMode,
    header_row: i64,
    auto_count: Option<i64>,
    fixed_start: Option<i64>,
    fixed_end: Option<i64>,
) -> Result<RowRange, ConfigError> {
    match mode {
        RangeMode::Auto => {
            let count = auto_count.ok_or_else(|| missing_field("auto", "count"))?;
            let start = header_row.saturating_add(1);
            let end = start.saturating_add(count).saturating_sub(1);
            Ok(RowRange::new(start, end))
        }
        RangeMode::Fixed => {
            let start = fixed_start.ok_or_else(|| missing_field("fixed", "start"))?;
            let end = fixed_end.ok_or_else(|| missing_field("fixed", "end"))?;
            Ok(RowRange::new(start, end))
        }
    }
}

impl RangeSpec {
    /// 按当前表头行解析成行范围
    pub fn resolve(&self, header_row: i64) -> Result<RowRange, ConfigError> {
        select_range(self.mode, header_row, self.count, self.start, self.end)
    }
}

fn missing_field(mode: &str, field: &str) -> ConfigError {
    ConfigError::MissingRangeField {
        mode: mode.to_string(),
        field: field.to_string(),
    }
}
