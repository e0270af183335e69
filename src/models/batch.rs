//! 批处理参数与输出单元格

use crate::models::column::ColumnLetter;
use crate::models::row::RowRange;
use crate::models::template::Template;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 缺少数据时写入的标记
pub const MISSING_DATA_MARKER: &str = "Error: Missing data in one or more columns";
/// 服务返回成功但没有摘要字段时写入的标记
pub const DEGRADED_MARKER: &str = "Error";
/// `FailurePolicy::Continue` 下请求失败的行写入的标记
pub const FULFILLMENT_FAILED_MARKER: &str = "Error: Summarization request failed";

/// 生成参数，缺省字段取服务端的默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    /// 不填则由服务端选择默认模型
    pub model: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: Some(32),
            top_p: Some(0.95),
            model: None,
        }
    }
}

/// 摘要服务失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 整批中止，不写回
    #[default]
    Abort,
    /// 当前行写入错误标记，继续处理
    Continue,
}

/// 行范围模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// 从表头下一行开始数 `count` 行
    Auto,
    /// 显式指定起止行
    Fixed,
}

/// 行范围输入（对应界面上的几个输入框）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub mode: RangeMode,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

impl RangeSpec {
    pub fn auto(count: i64) -> Self {
        Self {
            mode: RangeMode::Auto,
            count: Some(count),
            start: None,
            end: None,
        }
    }

    pub fn fixed(start: i64, end: i64) -> Self {
        Self {
            mode: RangeMode::Fixed,
            count: None,
            start: Some(start),
            end: Some(end),
        }
    }
}

/// 一次批处理的全部参数，运行期间不可变
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub header_row: i64,
    pub template: Template,
    /// 摘要格式说明，不填时使用模板原文
    pub format: Option<String>,
    pub output_column: ColumnLetter,
    pub generation: GenerationParams,
    pub range: RowRange,
    pub failure_policy: FailurePolicy,
}

impl BatchConfig {
    /// 发送给服务的 format 字段
    pub fn format_text(&self) -> &str {
        match self.format.as_deref() {
            Some(format) if !format.is_empty() => format,
            _ => self.template.as_str(),
        }
    }
}

/// 写回输出列的单个值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCell {
    /// 服务返回的摘要
    Summary(String),
    /// 服务返回成功但缺少摘要字段
    Degraded,
    /// 模板占位符无法解析
    MissingData,
    /// 请求失败（仅 `FailurePolicy::Continue`）
    FulfillmentFailed,
}

impl OutputCell {
    pub fn as_str(&self) -> &str {
        match self {
            OutputCell::Summary(text) => text,
            OutputCell::Degraded => DEGRADED_MARKER,
            OutputCell::MissingData => MISSING_DATA_MARKER,
            OutputCell::FulfillmentFailed => FULFILLMENT_FAILED_MARKER,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            OutputCell::Summary(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OutputCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(format: Option<&str>) -> BatchConfig {
        BatchConfig {
            header_row: 1,
            template: Template::new("Summarize {{A}}"),
            format: format.map(str::to_string),
            output_column: ColumnLetter::D,
            generation: GenerationParams::default(),
            range: RowRange::new(2, 4),
            failure_policy: FailurePolicy::default(),
        }
    }

    #[test]
    fn test_format_falls_back_to_template() {
        assert_eq!(config(None).format_text(), "Summarize {{A}}");
        assert_eq!(config(Some("")).format_text(), "Summarize {{A}}");
        assert_eq!(config(Some("bullets")).format_text(), "bullets");
    }

    #[test]
    fn test_output_cell_values() {
        assert_eq!(OutputCell::Summary("ok".into()).into_value(), "ok");
        assert_eq!(OutputCell::Degraded.into_value(), "Error");
        assert_eq!(
            OutputCell::MissingData.into_value(),
            "Error: Missing data in one or more columns"
        );
    }

    #[test]
    fn test_default_policy_is_abort() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
    }
}
