//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`；否则默认 `info`，`verbose` 为真时本 crate 输出 debug 级别
pub fn init_with_verbose(verbose: bool) {
    let default_directive = if verbose {
        "info,sheet_summarizer=debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 测试里可能被重复调用
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
