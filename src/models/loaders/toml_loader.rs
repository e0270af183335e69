use crate::error::ConfigError;
use crate::models::batch::{BatchConfig, FailurePolicy, GenerationParams, RangeSpec};
use crate::models::column::ColumnLetter;
use crate::models::template::Template;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 批处理参数文件的原始结构
#[derive(Debug, Clone, Deserialize)]
pub struct BatchFile {
    pub header_row: i64,
    pub template: String,
    #[serde(default)]
    pub format: Option<String>,
    pub output_column: ColumnLetter,
    #[serde(default)]
    pub generation: GenerationParams,
    pub range: RangeSpec,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl BatchFile {
    /// 校验并计算行范围
    pub fn into_config(self) -> Result<BatchConfig, ConfigError> {
        if self.header_row < 1 {
            return Err(ConfigError::InvalidHeaderRow {
                value: self.header_row,
            });
        }

        let range = self.range.resolve(self.header_row)?;

        Ok(BatchConfig {
            header_row: self.header_row,
            template: Template::new(self.template),
            format: self.format,
            output_column: self.output_column,
            generation: self.generation,
            range,
            failure_policy: self.failure_policy,
        })
    }
}

/// 从 TOML 文本解析批处理参数
pub fn parse_batch_config(content: &str) -> Result<BatchConfig> {
    let file: BatchFile = toml::from_str(content).context("无法解析批处理参数")?;
    Ok(file.into_config()?)
}

/// 从 TOML 文件加载批处理参数
pub async fn load_batch_file(path: impl AsRef<Path>) -> Result<BatchConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取批处理参数文件: {}", path.display()))?;

    let config = parse_batch_config(&content)
        .with_context(|| format!("批处理参数文件无效: {}", path.display()))?;

    tracing::info!(
        "已加载批处理参数: 行 {}，输出列 {}",
        config.range,
        config.output_column
    );

    Ok(config)
}
