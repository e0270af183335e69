//! 批量行处理器 - 编排层
//!
//! ## 职责
//!
//! 驱动一次批处理：整块读取 → 逐行处理 → 整列写回。
//!
//! ## 状态机
//!
//! ```text
//! Idle → Reading → RowLoop(0..n) → Writing → Idle
//!           ↘          ↘              ↘
//!                    Aborted
//! ```
//!
//! - 行与行严格串行，上一行的结果追加后才开始下一行
//! - 缺数据只影响本行；摘要服务失败默认中止整批，不写回
//! - 空范围直接跳过，不读不写
//! - 忙碌状态在读取前置位，任何退出路径都会释放

use crate::clients::{FulfillmentClient, Summarizer};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{
    BusyGuard, BusyIndicator, CellRange, CsvSheet, LogBusyIndicator, SheetHost,
};
use crate::models::{load_batch_file, BatchConfig, FailurePolicy, OutputCell, RowRange, RowRecord};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_startup, print_final_stats,
};
use crate::workflow::{RowCtx, RowFlow};
use anyhow::{Context, Result};
use std::fmt;
use tracing::{debug, error, info, warn};

/// 批处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Reading,
    /// 正在处理第 i 行（从 0 开始）
    RowLoop(usize),
    Writing,
    Aborted,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Idle => write!(f, "Idle"),
            BatchState::Reading => write!(f, "Reading"),
            BatchState::RowLoop(i) => write!(f, "RowLoop({})", i),
            BatchState::Writing => write!(f, "Writing"),
            BatchState::Aborted => write!(f, "Aborted"),
        }
    }
}

/// 批处理结果统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub range: RowRange,
    /// 处理的行数
    pub rows: usize,
    pub summarized: usize,
    pub missing_data: usize,
    pub degraded: usize,
    /// 请求失败的行（仅 `FailurePolicy::Continue`）
    pub failed: usize,
    /// 写回的单元格数量，空范围为 0
    pub written: usize,
}

impl BatchReport {
    fn new(range: RowRange) -> Self {
        Self {
            range,
            rows: 0,
            summarized: 0,
            missing_data: 0,
            degraded: 0,
            failed: 0,
            written: 0,
        }
    }

    fn record(&mut self, cell: &OutputCell) {
        self.rows += 1;
        match cell {
            OutputCell::Summary(_) => self.summarized += 1,
            OutputCell::Degraded => self.degraded += 1,
            OutputCell::MissingData => self.missing_data += 1,
            OutputCell::FulfillmentFailed => self.failed += 1,
        }
    }

    /// 写入了错误标记的单元格数量
    pub fn error_cells(&self) -> usize {
        self.missing_data + self.degraded + self.failed
    }

    pub fn is_skipped(&self) -> bool {
        self.range.is_empty()
    }
}

/// 批处理编排器
///
/// 持有表格宿主、摘要服务和忙碌指示器，不持有批处理参数
pub struct BatchOrchestrator<H, S, B> {
    host: H,
    summarizer: S,
    busy: B,
    state: BatchState,
    verbose_logging: bool,
}

impl<H, S, B> BatchOrchestrator<H, S, B>
where
    H: SheetHost,
    S: Summarizer,
    B: BusyIndicator,
{
    pub fn new(host: H, summarizer: S, busy: B) -> Self {
        Self {
            host,
            summarizer,
            busy,
            state: BatchState::Idle,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn summarizer(&self) -> &S {
        &self.summarizer
    }

    pub fn busy(&self) -> &B {
        &self.busy
    }

    /// 执行一次批处理
    ///
    /// # 返回
    /// 成功返回统计；读取/写回失败或（`Abort` 策略下）摘要服务失败返回错误，
    /// 此时不会有任何写回
    pub async fn run(&mut self, config: &BatchConfig) -> AppResult<BatchReport> {
        if config.range.is_empty() {
            warn!("⚠️ 行范围 {} 为空，跳过本次处理", config.range);
            transition(&mut self.state, BatchState::Idle);
            return Ok(BatchReport::new(config.range));
        }

        let _busy = BusyGuard::acquire(&self.busy);

        let result = Self::execute(
            &mut self.host,
            &self.summarizer,
            &mut self.state,
            config,
            self.verbose_logging,
        )
        .await;

        match &result {
            Ok(report) => {
                transition(&mut self.state, BatchState::Idle);
                info!("✓ 已写回 {} 个单元格", report.written);
            }
            Err(e) => {
                transition(&mut self.state, BatchState::Aborted);
                error!("❌ 批处理中止: {}", e);
            }
        }

        result
    }

    async fn execute(
        host: &mut H,
        summarizer: &S,
        state: &mut BatchState,
        config: &BatchConfig,
        verbose_logging: bool,
    ) -> AppResult<BatchReport> {
        let mut report = BatchReport::new(config.range);

        // ========== 读取 ==========
        transition(state, BatchState::Reading);
        let input = CellRange::input_block(config.range);
        let output = CellRange::column(config.output_column, config.range);
        // 超出表格行数上限的范围在读取前拒绝
        input.validate()?;
        output.validate()?;
        info!("📥 正在读取 {}", input);
        let block = host.read_range(&input).await?;

        let mut rows: Vec<RowRecord> = block.into_iter().map(RowRecord::from_cells).collect();
        // 宿主少返回的行按空行处理，保证输出与范围一一对应
        rows.resize(config.range.len(), RowRecord::empty());

        // ========== 逐行处理 ==========
        let total = rows.len();
        let flow = RowFlow::new(summarizer, config, verbose_logging);
        let mut outputs: Vec<OutputCell> = Vec::with_capacity(total);

        for (i, (row, row_number)) in rows.iter().zip(config.range.rows()).enumerate() {
            transition(state, BatchState::RowLoop(i));
            let ctx = RowCtx::new(row_number, i + 1, total);

            let cell = match flow.run(row, &ctx).await {
                Ok(cell) => cell,
                Err(e) => match config.failure_policy {
                    FailurePolicy::Abort => {
                        error!("{} ❌ 摘要服务失败，整批中止: {}", ctx, e);
                        return Err(AppError::Fulfillment(e));
                    }
                    FailurePolicy::Continue => {
                        warn!("{} ⚠️ 摘要服务失败，写入错误标记后继续: {}", ctx, e);
                        OutputCell::FulfillmentFailed
                    }
                },
            };

            report.record(&cell);
            outputs.push(cell);
        }

        // ========== 写回 ==========
        transition(state, BatchState::Writing);
        let values: Vec<String> = outputs.into_iter().map(OutputCell::into_value).collect();
        info!("📤 正在写回 {}", output);
        host.write_column(&output, &values).await?;
        report.written = values.len();

        Ok(report)
    }
}

fn transition(state: &mut BatchState, next: BatchState) {
    debug!("状态: {} → {}", state, next);
    *state = next;
}

/// 应用主结构
pub struct App {
    config: Config,
    batch: BatchConfig,
    orchestrator: BatchOrchestrator<CsvSheet, FulfillmentClient, LogBusyIndicator>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let batch = load_batch_file(&config.batch_file).await?;

        let sheet = CsvSheet::open(&config.sheet_path)
            .await
            .with_context(|| format!("无法打开表格: {}", config.sheet_path))?;

        let client = FulfillmentClient::new(&config).context("无法创建摘要客户端")?;

        let orchestrator = BatchOrchestrator::new(sheet, client, LogBusyIndicator)
            .with_verbose_logging(config.verbose_logging);

        Ok(Self {
            config,
            batch,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<BatchReport> {
        log_batch_start(&self.batch);

        let report = self.orchestrator.run(&self.batch).await?;

        if report.is_skipped() {
            warn!("⚠️ 没有需要处理的行，程序结束");
            return Ok(report);
        }

        log_batch_complete(&report);
        print_final_stats(&report, &self.config.output_log_file);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use crate::infrastructure::{FlagBusyIndicator, MemorySheet};
    use crate::models::{ColumnLetter, GenerationParams, RangeSpec, Template, MISSING_DATA_MARKER};
    use crate::utils::test_support::ScriptedSummarizer;

    fn batch(template: &str, range: RowRange, policy: FailurePolicy) -> BatchConfig {
        BatchConfig {
            header_row: 1,
            template: Template::new(template),
            format: None,
            output_column: ColumnLetter::C,
            generation: GenerationParams::default(),
            range,
            failure_policy: policy,
        }
    }

    /// 表头 + 5 行数据，第 3 行 B 列为空
    fn five_rows() -> MemorySheet {
        MemorySheet::from_rows(vec![
            vec!["name", "topic"],
            vec!["r1", "t1"],
            vec!["r2", "t2"],
            vec!["r3", ""],
            vec!["r4", "t4"],
            vec!["r5", "t5"],
        ])
    }

    fn five_complete_rows() -> MemorySheet {
        MemorySheet::from_rows((0..=5).map(|i| vec![format!("r{}", i), format!("t{}", i)]))
    }

    #[tokio::test]
    async fn test_missing_data_is_isolated_to_its_row() {
        let mut orchestrator =
            BatchOrchestrator::new(five_rows(), ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let config = batch("{{A}}/{{B}}", RowRange::new(2, 6), FailurePolicy::Abort);

        let report = orchestrator.run(&config).await.unwrap();

        assert_eq!(report.rows, 5);
        assert_eq!(report.summarized, 4);
        assert_eq!(report.missing_data, 1);
        assert_eq!(report.written, 5);

        let sheet = orchestrator.host();
        assert_eq!(sheet.reads(), &["A2:Z6".to_string()]);
        assert_eq!(sheet.writes().len(), 1);
        assert_eq!(sheet.writes()[0].range, "C2:C6");
        assert_eq!(
            sheet.writes()[0].values,
            vec![
                "summary of r1/t1".to_string(),
                "summary of r2/t2".to_string(),
                MISSING_DATA_MARKER.to_string(),
                "summary of r4/t4".to_string(),
                "summary of r5/t5".to_string(),
            ]
        );
        assert_eq!(sheet.cell(4, ColumnLetter::C), MISSING_DATA_MARKER);

        // 第 3 行没有发请求
        assert_eq!(orchestrator.summarizer().prompts().len(), 4);
        assert_eq!(orchestrator.state(), BatchState::Idle);
        assert_eq!(orchestrator.busy().history(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_remote_failure_aborts_without_write_back() {
        let mut orchestrator = BatchOrchestrator::new(
            five_complete_rows(),
            ScriptedSummarizer::failing_at(1, 500),
            FlagBusyIndicator::new(),
        );
        let config = batch("{{A}}", RowRange::new(2, 6), FailurePolicy::Abort);

        let err = orchestrator.run(&config).await.unwrap_err();

        match err {
            AppError::Fulfillment(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("应该是摘要服务错误: {:?}", other),
        }
        // 第 2 行失败后不再继续
        assert_eq!(orchestrator.summarizer().prompts(), vec!["r1", "r2"]);
        assert!(orchestrator.host().writes().is_empty());
        assert_eq!(orchestrator.host().cell(2, ColumnLetter::C), "");
        assert_eq!(orchestrator.state(), BatchState::Aborted);
        assert!(!orchestrator.busy().is_busy());
        assert_eq!(orchestrator.busy().history(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_continue_policy_marks_failed_row() {
        let mut orchestrator = BatchOrchestrator::new(
            five_complete_rows(),
            ScriptedSummarizer::failing_at(1, 503),
            FlagBusyIndicator::new(),
        );
        let config = batch("{{A}}", RowRange::new(2, 4), FailurePolicy::Continue);

        let report = orchestrator.run(&config).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.summarized, 2);
        assert_eq!(
            orchestrator.host().writes()[0].values,
            vec![
                "summary of r1".to_string(),
                "Error: Summarization request failed".to_string(),
                "summary of r3".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_range_does_no_io() {
        let mut orchestrator =
            BatchOrchestrator::new(five_rows(), ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let range = RangeSpec::fixed(10, 8).resolve(1).unwrap();
        let config = batch("{{A}}", range, FailurePolicy::Abort);

        let report = orchestrator.run(&config).await.unwrap();

        assert!(report.is_skipped());
        assert_eq!(report.written, 0);
        assert!(orchestrator.host().reads().is_empty());
        assert!(orchestrator.host().writes().is_empty());
        assert!(orchestrator.summarizer().prompts().is_empty());
        assert!(orchestrator.busy().history().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_batch_resets_state_after_abort() {
        let mut orchestrator = BatchOrchestrator::new(
            five_complete_rows(),
            ScriptedSummarizer::failing_at(0, 500),
            FlagBusyIndicator::new(),
        );

        orchestrator
            .run(&batch("{{A}}", RowRange::new(2, 3), FailurePolicy::Abort))
            .await
            .unwrap_err();
        assert_eq!(orchestrator.state(), BatchState::Aborted);

        let report = orchestrator
            .run(&batch("{{A}}", RowRange::new(10, 8), FailurePolicy::Abort))
            .await
            .unwrap();
        assert!(report.is_skipped());
        assert_eq!(orchestrator.state(), BatchState::Idle);
    }

    #[tokio::test]
    async fn test_range_over_row_limit_is_rejected_before_read() {
        let mut orchestrator =
            BatchOrchestrator::new(five_rows(), ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let config = batch("{{A}}", RowRange::new(2, 3_000_000_000), FailurePolicy::Abort);

        let err = orchestrator.run(&config).await.unwrap_err();

        assert!(matches!(err, AppError::Sheet(SheetError::InvalidRange { .. })));
        assert!(orchestrator.host().reads().is_empty());
        assert!(orchestrator.host().writes().is_empty());
        assert!(orchestrator.summarizer().prompts().is_empty());
        assert_eq!(orchestrator.state(), BatchState::Aborted);
        assert!(!orchestrator.busy().is_busy());
    }

    #[tokio::test]
    async fn test_auto_range_reads_rows_after_header() {
        let mut orchestrator = BatchOrchestrator::new(
            five_complete_rows(),
            ScriptedSummarizer::echo(),
            FlagBusyIndicator::new(),
        );
        let range = RangeSpec::auto(3).resolve(1).unwrap();
        let config = batch("{{A}}", range, FailurePolicy::Abort);

        let report = orchestrator.run(&config).await.unwrap();

        assert_eq!(report.written, 3);
        assert_eq!(orchestrator.host().reads(), &["A2:Z4".to_string()]);
        assert_eq!(orchestrator.host().writes()[0].range, "C2:C4");
    }

    #[tokio::test]
    async fn test_rows_beyond_sheet_are_missing_data() {
        let sheet = MemorySheet::from_rows(vec![vec!["h"], vec!["only"]]);
        let mut orchestrator =
            BatchOrchestrator::new(sheet, ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let config = batch("{{A}}", RowRange::new(2, 4), FailurePolicy::Abort);

        let report = orchestrator.run(&config).await.unwrap();

        assert_eq!(report.summarized, 1);
        assert_eq!(report.missing_data, 2);
        assert_eq!(orchestrator.host().writes()[0].values.len(), 3);
    }

    #[tokio::test]
    async fn test_read_failure_aborts_and_releases_busy() {
        let sheet = five_rows().fail_reads();
        let mut orchestrator =
            BatchOrchestrator::new(sheet, ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let config = batch("{{A}}", RowRange::new(2, 3), FailurePolicy::Abort);

        let err = orchestrator.run(&config).await.unwrap_err();

        assert!(matches!(err, AppError::Sheet(SheetError::ReadFailed { .. })));
        assert_eq!(orchestrator.state(), BatchState::Aborted);
        assert!(orchestrator.summarizer().prompts().is_empty());
        assert!(!orchestrator.busy().is_busy());
    }

    #[tokio::test]
    async fn test_write_failure_aborts_and_releases_busy() {
        let sheet = five_rows().fail_writes();
        let mut orchestrator =
            BatchOrchestrator::new(sheet, ScriptedSummarizer::echo(), FlagBusyIndicator::new());
        let config = batch("{{A}}", RowRange::new(2, 3), FailurePolicy::Abort);

        let err = orchestrator.run(&config).await.unwrap_err();

        assert!(matches!(err, AppError::Sheet(SheetError::WriteFailed { .. })));
        assert_eq!(orchestrator.summarizer().prompts().len(), 2);
        assert_eq!(orchestrator.state(), BatchState::Aborted);
        assert_eq!(orchestrator.busy().history(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_orchestrator_is_reusable_across_batches() {
        let mut orchestrator = BatchOrchestrator::new(
            five_complete_rows(),
            ScriptedSummarizer::echo(),
            FlagBusyIndicator::new(),
        );

        orchestrator
            .run(&batch("{{A}}", RowRange::new(2, 3), FailurePolicy::Abort))
            .await
            .unwrap();
        orchestrator
            .run(&batch("{{B}}", RowRange::new(4, 4), FailurePolicy::Abort))
            .await
            .unwrap();

        assert_eq!(orchestrator.host().reads().len(), 2);
        assert_eq!(orchestrator.host().writes().len(), 2);
        assert_eq!(orchestrator.host().cell(4, ColumnLetter::C), "summary of t3");
        assert_eq!(orchestrator.busy().history(), vec![true, false, true, false]);
    }
}
