use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

use crate::config::Config;
use crate::models::BatchConfig;
use crate::orchestrator::BatchReport;
use crate::services::template_resolver::placeholders;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n表格摘要日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 表格批量摘要");
    info!("🌐 摘要服务: {}", config.endpoint_url);
    info!("📄 表格文件: {}", config.sheet_path);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
pub fn log_batch_start(batch: &BatchConfig) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {} 行，共 {} 行", batch.range, batch.range.len());
    info!("📝 模板: {}", truncate_text(batch.template.as_str(), 80));
    info!("🔤 引用列: {}", placeholders(&batch.template).join(", "));
    info!("📤 输出列: {}", batch.output_column);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(report: &BatchReport) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 摘要 {}/{}，缺数据 {}，降级 {}，请求失败 {}",
        report.summarized, report.rows, report.missing_data, report.degraded, report.failed
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `report`: 批次结果
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(report: &BatchReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.summarized, report.rows);
    info!("❌ 错误标记: {}", report.error_cells());
    info!("✍️ 写回单元格: {}", report.written);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
