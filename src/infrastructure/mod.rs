//! 基础设施层
//!
//! 持有外部资源（表格、忙碌指示），只暴露能力

pub mod csv_sheet;
pub mod sheet_host;
pub mod status;

pub use csv_sheet::CsvSheet;
pub use sheet_host::{CellRange, Grid, MemorySheet, SheetHost, WriteRecord};
pub use status::{BusyGuard, BusyIndicator, FlagBusyIndicator, LogBusyIndicator};
