//! 模板解析 - 业务能力层
//!
//! 只负责"把一行数据代入模板"，不关心请求和写回

use crate::models::{ColumnLetter, RowRecord, Template};
use regex::Regex;
use std::sync::OnceLock;

/// 无法解析的占位符替换成的值
///
/// 替换后的文本不会发送出去，是否失败只看 `missing`
pub const UNRESOLVED_SENTINEL: &str = "";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("占位符正则无效"))
}

/// 模板代入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// 全部占位符都已替换
    Rendered(String),
    /// 至少一个占位符无法解析
    Unresolved {
        /// 用哨兵值替换后的文本，仅用于日志
        partial: String,
        /// 无法解析的占位符名称（按首次出现的顺序，去重）
        missing: Vec<String>,
    },
}

impl RenderResult {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderResult::Rendered(_))
    }

    /// 完整的提示词，失败时为 None
    pub fn prompt(&self) -> Option<&str> {
        match self {
            RenderResult::Rendered(text) => Some(text),
            RenderResult::Unresolved { .. } => None,
        }
    }
}

/// 把一行数据代入模板
///
/// 从左到右扫描所有 `{{name}}`。`name` 不是 A-Z 单个字母，或对应单元格为空，
/// 都算无法解析：继续扫描并替换为哨兵值，最终结果标记为失败。
/// 没有占位符的模板总是原样成功返回。
pub fn resolve(template: &Template, row: &RowRecord) -> RenderResult {
    let mut missing: Vec<String> = Vec::new();

    let rendered = placeholder_pattern().replace_all(template.as_str(), |caps: &regex::Captures| {
        let name = &caps[1];
        match ColumnLetter::from_name(name).and_then(|column| row.get(column)) {
            Some(value) => value.to_string(),
            None => {
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
                UNRESOLVED_SENTINEL.to_string()
            }
        }
    });

    if missing.is_empty() {
        RenderResult::Rendered(rendered.into_owned())
    } else {
        RenderResult::Unresolved {
            partial: rendered.into_owned(),
            missing,
        }
    }
}

/// 模板引用的全部占位符名称（按出现顺序，包含无效名称）
pub fn placeholders(template: &Template) -> Vec<String> {
    placeholder_pattern()
        .captures_iter(template.as_str())
        .map(|caps| caps[1].to_string())
        .collect()
}
