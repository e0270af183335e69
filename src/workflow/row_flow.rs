//! 单行处理流程 - 流程层
//!
//! 核心职责：定义"一行"的完整处理流程
//!
//! 流程顺序：
//! 1. 模板代入 → 缺数据则写入错误标记，结束
//! 2. 调用摘要服务 → 返回摘要（或降级标记）

use tracing::{debug, info, warn};

use crate::clients::{Summarizer, Summary};
use crate::error::FulfillmentError;
use crate::models::{BatchConfig, OutputCell, RowRecord};
use crate::services::template_resolver::{self, RenderResult};
use crate::utils::logging::truncate_text;
use crate::workflow::row_ctx::RowCtx;

/// 单行处理流程
///
/// - 只处理一行，不关心批次和写回
/// - 缺数据在本行内消化，不向上返回错误
/// - 摘要服务失败原样返回，由编排层决定是否中止
pub struct RowFlow<'a, S: Summarizer> {
    summarizer: &'a S,
    config: &'a BatchConfig,
    verbose_logging: bool,
}

impl<'a, S: Summarizer> RowFlow<'a, S> {
    /// 创建新的行处理流程
    pub fn new(summarizer: &'a S, config: &'a BatchConfig, verbose_logging: bool) -> Self {
        Self {
            summarizer,
            config,
            verbose_logging,
        }
    }

    pub async fn run(&self, row: &RowRecord, ctx: &RowCtx) -> Result<OutputCell, FulfillmentError> {
        let prompt = match template_resolver::resolve(&self.config.template, row) {
            RenderResult::Rendered(prompt) => prompt,
            RenderResult::Unresolved { missing, .. } => {
                warn!("{} ⚠️ 缺少数据: {:?}，跳过请求", ctx, missing);
                return Ok(OutputCell::MissingData);
            }
        };

        if self.verbose_logging {
            debug!("{} 提示词: {}", ctx, prompt);
        }

        info!("{} 📤 正在请求摘要...", ctx);

        let summary = self
            .summarizer
            .summarize(&prompt, self.config.format_text(), &self.config.generation)
            .await?;

        let cell = match summary {
            Summary::Text(text) => {
                info!("{} ✓ 摘要: {}", ctx, truncate_text(&text, 60));
                OutputCell::Summary(text)
            }
            Summary::Degraded => {
                warn!("{} ⚠️ 服务未返回摘要字段，写入 \"Error\"", ctx);
                OutputCell::Degraded
            }
        };

        Ok(cell)
    }
}
