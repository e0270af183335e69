//! 表格宿主 - 基础设施层
//!
//! 只暴露"整块读"和"整列写"两种能力，每次调用都是一次完整的请求/响应

use crate::error::SheetError;
use crate::models::{ColumnLetter, RowRange};
use std::fmt;
use std::future::Future;

/// 表格最大行号
pub const MAX_ROWS: i64 = 1_048_576;

/// 矩形单元格区域，例如 `A2:Z4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_column: ColumnLetter,
    pub last_column: ColumnLetter,
    pub rows: RowRange,
}

impl CellRange {
    /// `A{start}:Z{end}`，批处理读取的输入区域
    pub fn input_block(rows: RowRange) -> Self {
        Self {
            first_column: ColumnLetter::FIRST,
            last_column: ColumnLetter::LAST,
            rows,
        }
    }

    /// 单列区域，批处理写回的输出区域
    pub fn column(column: ColumnLetter, rows: RowRange) -> Self {
        Self {
            first_column: column,
            last_column: column,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        if self.last_column < self.first_column {
            0
        } else {
            self.last_column.index() - self.first_column.index() + 1
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_single_column(&self) -> bool {
        self.first_column == self.last_column
    }

    /// 行号必须在 `1..=MAX_ROWS` 内，且不能是空区域
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.rows.is_empty()
            || self.rows.start < 1
            || self.rows.end > MAX_ROWS
            || self.width() == 0
        {
            return Err(SheetError::InvalidRange {
                range: self.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.first_column, self.rows.start, self.last_column, self.rows.end
        )
    }
}

/// 表格宿主能力
pub trait SheetHost {
    /// 读取矩形区域，返回 `height × width` 的字符串数组，空单元格为空字符串
    fn read_range(
        &mut self,
        range: &CellRange,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, SheetError>> + Send;

    /// 把一列值写入单列区域，`values.len()` 必须等于区域行数
    fn write_column(
        &mut self,
        range: &CellRange,
        values: &[String],
    ) -> impl Future<Output = Result<(), SheetError>> + Send;
}

/// 内存中的单元格网格（行列均从 0 开始）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 1 起始的行号 + 列字母
    pub fn cell(&self, row: i64, column: ColumnLetter) -> &str {
        if row < 1 {
            return "";
        }
        self.rows
            .get((row - 1) as usize)
            .and_then(|r| r.get(column.index()))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn read_block(&self, range: &CellRange) -> Result<Vec<Vec<String>>, SheetError> {
        range.validate()?;
        let block = range
            .rows
            .rows()
            .map(|row| {
                (range.first_column.index()..=range.last_column.index())
                    .filter_map(ColumnLetter::from_index)
                    .map(|column| self.cell(row, column).to_string())
                    .collect()
            })
            .collect();
        Ok(block)
    }

    /// 写入单列，网格不够大时自动扩展
    pub fn write_column(&mut self, range: &CellRange, values: &[String]) -> Result<(), SheetError> {
        range.validate()?;
        if !range.is_single_column() {
            return Err(SheetError::InvalidRange {
                range: range.to_string(),
            });
        }
        if values.len() != range.height() {
            return Err(SheetError::ShapeMismatch {
                range: range.to_string(),
                expected: range.height(),
                actual: values.len(),
            });
        }

        let column = range.first_column.index();
        for (row, value) in range.rows.rows().zip(values) {
            let row_index = (row - 1) as usize;
            if self.rows.len() <= row_index {
                self.rows.resize(row_index + 1, Vec::new());
            }
            let cells = &mut self.rows[row_index];
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            cells[column] = value.clone();
        }
        Ok(())
    }

    /// 所有行补齐到相同列数
    pub fn to_rectangular(&self) -> Vec<Vec<String>> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

/// 一次写入请求的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub range: String,
    pub values: Vec<String>,
}

/// 内存表格宿主
///
/// 记录每一次读写请求，便于检查批处理的副作用
#[derive(Debug, Default)]
pub struct MemorySheet {
    grid: Grid,
    reads: Vec<String>,
    writes: Vec<WriteRecord>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从行数据构造，第一个元素是第 1 行
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self {
            grid: Grid::from_rows(rows),
            ..Self::default()
        }
    }

    /// 之后的读取都返回错误
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// 之后的写入都返回错误
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, row: i64, column: ColumnLetter) -> &str {
        self.grid.cell(row, column)
    }

    /// 已发生的读取请求（区域字符串）
    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    /// 已发生的写入请求
    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }
}

impl SheetHost for MemorySheet {
    async fn read_range(&mut self, range: &CellRange) -> Result<Vec<Vec<String>>, SheetError> {
        self.reads.push(range.to_string());
        if self.fail_reads {
            return Err(SheetError::read_failed(
                range,
                std::io::Error::other("内存表格被设置为读取失败"),
            ));
        }
        self.grid.read_block(range)
    }

    async fn write_column(&mut self, range: &CellRange, values: &[String]) -> Result<(), SheetError> {
        if self.fail_writes {
            return Err(SheetError::write_failed(
                range,
                std::io::Error::other("内存表格被设置为写入失败"),
            ));
        }
        self.grid.write_column(range, values)?;
        self.writes.push(WriteRecord {
            range: range.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }
}
