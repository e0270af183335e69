//! # Sheet Summarizer
//!
//! 对表格中的一段行逐行代入提示词模板，调用远程摘要服务，并把结果整列写回
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `SheetHost` - 整块读 / 整列写（`CsvSheet`、`MemorySheet`）
//! - `BusyIndicator` - 忙碌状态，`BusyGuard` 保证释放
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/template_resolver` - 把一行数据代入 `{{A}}`..`{{Z}}` 占位符
//! - `services/range_selector` - 计算 auto / fixed 模式下的行范围
//! - `clients/FulfillmentClient` - 调用远程摘要接口
//!
//! ### ③ 流程层（Workflow）
//! - `RowCtx` - 上下文封装（行号 + 批内序号）
//! - `RowFlow` - 单行流程（代入 → 摘要 → 输出单元格）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 读取 → 逐行处理 → 写回
//! - `orchestrator/formula` - 单元格公式（单行摘要）
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{FulfillmentClient, Summarizer, Summary};
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, FulfillmentError, SheetError};
pub use infrastructure::{BusyIndicator, CsvSheet, MemorySheet, SheetHost};
pub use models::{BatchConfig, ColumnLetter, OutputCell, RowRange, RowRecord, Template};
pub use orchestrator::{summarize_formula, App, BatchOrchestrator, BatchReport, BatchState};
pub use services::{resolve, select_range, RenderResult};
pub use workflow::{RowCtx, RowFlow};
