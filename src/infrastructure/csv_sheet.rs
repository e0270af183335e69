//! CSV 文件表格宿主
//!
//! 第 1 行对应 CSV 第一行，A 列对应第一个字段。读取走内存，写入后整表落盘。

use crate::error::SheetError;
use crate::infrastructure::sheet_host::{CellRange, Grid, SheetHost};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CSV 文件表格
#[derive(Debug)]
pub struct CsvSheet {
    path: PathBuf,
    grid: Grid,
}

impl CsvSheet {
    /// 打开 CSV 文件
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SheetError::io(path.display().to_string(), e))?;

        let grid = parse_csv(&content).map_err(|e| SheetError::io(path.display().to_string(), e))?;

        info!(
            "已加载表格 {} ({} 行)",
            path.display(),
            grid.rows().len()
        );

        Ok(Self { path, grid })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    async fn persist(&self, grid: &Grid, range: &CellRange) -> Result<(), SheetError> {
        let bytes = render_csv(grid).map_err(|e| SheetError::write_failed(range, e))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| SheetError::write_failed(range, e))?;
        debug!("表格已保存: {}", self.path.display());
        Ok(())
    }
}

impl SheetHost for CsvSheet {
    async fn read_range(&mut self, range: &CellRange) -> Result<Vec<Vec<String>>, SheetError> {
        self.grid.read_block(range)
    }

    async fn write_column(&mut self, range: &CellRange, values: &[String]) -> Result<(), SheetError> {
        // 落盘成功后才替换内存中的表格
        let mut next = self.grid.clone();
        next.write_column(range, values)?;
        self.persist(&next, range).await?;
        self.grid = next;
        Ok(())
    }
}

fn parse_csv(content: &str) -> Result<Grid, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Grid::from_rows(rows))
}

fn render_csv(grid: &Grid) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in grid.to_rectangular() {
        writer.write_record(&row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
