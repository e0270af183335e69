//! 列字母 A-Z
//!
//! 模板占位符只能引用单个字母的列，超过 Z 的列不可寻址

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 单个字母列名，与下标 0..25 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[rustfmt::skip] // 按字母表排成两行
pub enum ColumnLetter {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
}

impl ColumnLetter {
    /// 列的数量
    pub const COUNT: usize = 26;

    /// 按顺序排列的全部列
    #[rustfmt::skip]
    pub const ALL: [ColumnLetter; 26] = [
        ColumnLetter::A, ColumnLetter::B, ColumnLetter::C, ColumnLetter::D,
        ColumnLetter::E, ColumnLetter::F, ColumnLetter::G, ColumnLetter::H,
        ColumnLetter::I, ColumnLetter::J, ColumnLetter::K, ColumnLetter::L,
        ColumnLetter::M, ColumnLetter::N, ColumnLetter::O, ColumnLetter::P,
        ColumnLetter::Q, ColumnLetter::R, ColumnLetter::S, ColumnLetter::T,
        ColumnLetter::U, ColumnLetter::V, ColumnLetter::W, ColumnLetter::X,
        ColumnLetter::Y, ColumnLetter::Z,
    ];

    /// 第一列
    pub const FIRST: ColumnLetter = ColumnLetter::A;
    /// 最后一列
    pub const LAST: ColumnLetter = ColumnLetter::Z;

    /// 下标（A = 0）
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 只接受大写字母，`a` 不是合法列名
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Self::from_index((c as u8 - b'A') as usize)
        } else {
            None
        }
    }

    /// 按名称精确匹配，例如 "B"；"AA"、"b"、"" 都返回 None
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for ColumnLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ColumnLetter {
    type Err = ConfigError;

    /// 配置输入允许前后空白和小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.trim().to_ascii_uppercase()).ok_or_else(|| ConfigError::InvalidColumn {
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for ColumnLetter {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnLetter> for String {
    fn from(value: ColumnLetter) -> Self {
        value.to_string()
    }
}
