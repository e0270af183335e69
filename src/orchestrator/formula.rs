//! 单元格公式 - 单行摘要
//!
//! 与批处理使用同一个摘要服务，只处理一段文本，失败时把错误写在返回值里

use crate::clients::{Summarizer, Summary};
use crate::models::{GenerationParams, DEGRADED_MARKER};
use tracing::warn;

/// 对一段文本求摘要
///
/// # 参数
/// - `text`: 原文
/// - `format`: 摘要格式说明
/// - `temperature`: 生成温度
/// - `model`: 模型名称，不填使用服务端默认
///
/// # 返回
/// 摘要文本；失败时返回 `"Error: <原因>"`，不会返回 `Err`
pub async fn summarize_formula<S: Summarizer>(
    summarizer: &S,
    text: &str,
    format: &str,
    temperature: f64,
    model: Option<&str>,
) -> String {
    let params = GenerationParams {
        temperature,
        top_k: None,
        top_p: None,
        model: model.filter(|m| !m.is_empty()).map(str::to_string),
    };

    match summarizer.summarize(text, format, &params).await {
        Ok(Summary::Text(summary)) => summary,
        Ok(Summary::Degraded) => DEGRADED_MARKER.to_string(),
        Err(e) => {
            warn!("公式摘要失败: {}", e);
            format!("Error: {}", e)
        }
    }
}
