//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量行处理器
//! - 管理应用生命周期（初始化、运行）
//! - 整块读取输入区域（`A{start}:Z{end}`）
//! - 逐行驱动 `RowFlow`，收集输出单元格
//! - 整列写回输出区域
//! - 维护忙碌状态和批处理状态机
//!
//! ### `formula` - 单元格公式
//! - 对单段文本调用摘要服务
//! - 错误以字符串形式返回给调用方
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<RowRecord>)
//!     ↓
//! workflow::RowFlow (处理单行)
//!     ↓
//! services (能力层：模板代入 / 行范围)  +  clients (摘要服务)
//!     ↓
//! infrastructure (基础设施：SheetHost / BusyIndicator)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，RowFlow 管单行
//! 2. **资源隔离**：只有编排层持有表格宿主和忙碌指示器
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod batch_processor;
pub mod formula;

// 重新导出主要类型
pub use batch_processor::{App, BatchOrchestrator, BatchReport, BatchState};
pub use formula::summarize_formula;
