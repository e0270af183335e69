use crate::models::column::ColumnLetter;
use std::fmt;

/// 一行数据（A-Z 共 26 个单元格）
///
/// 每批次从整块读取结果中构造，处理完即丢弃
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRecord {
    cells: Vec<String>,
}

impl RowRecord {
    /// 从读取到的单元格构造，不足 26 列补空，超出部分丢弃
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells
            .into_iter()
            .take(ColumnLetter::COUNT)
            .map(Into::into)
            .collect();
        cells.resize(ColumnLetter::COUNT, String::new());
        Self { cells }
    }

    /// 全空行
    pub fn empty() -> Self {
        Self::from_cells(Vec::<String>::new())
    }

    /// 单元格内容，空单元格返回 None
    pub fn get(&self, column: ColumnLetter) -> Option<&str> {
        self.cells
            .get(column.index())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// 闭区间行范围（1 起始）
///
/// `end < start` 表示空范围，不做任何读写
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: i64,
    pub end: i64,
}

impl RowRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// 行数，空范围为 0
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    /// 按顺序遍历行号
    pub fn rows(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}..{} (空)", self.start, self.end)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}
