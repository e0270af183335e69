use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 摘要服务错误
    #[error("摘要服务错误: {0}")]
    Fulfillment(#[from] FulfillmentError),
    /// 表格读写错误
    #[error("表格错误: {0}")]
    Sheet(#[from] SheetError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 摘要服务错误
///
/// 任何一种都会让整批任务中止（`FailurePolicy::Continue` 除外）
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// 服务返回非 2xx 状态码
    #[error("摘要服务返回错误状态 {status}: {}", .message.as_deref().unwrap_or("<无错误信息>"))]
    Status { status: u16, message: Option<String> },
    /// 请求参数不合法，未发送
    #[error("请求被拒绝: {reason}")]
    Rejected { reason: String },
    /// 请求超时
    #[error("摘要服务请求超时 ({endpoint})")]
    Timeout { endpoint: String },
    /// 网络请求失败
    #[error("摘要服务请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 返回内容无法解析
    #[error("摘要服务返回内容无法解析: {source}")]
    MalformedPayload {
        #[source]
        source: serde_json::Error,
    },
}

impl FulfillmentError {
    /// 状态码（仅 `Status` 有）
    pub fn status(&self) -> Option<u16> {
        match self {
            FulfillmentError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 表格读写错误
#[derive(Debug, Error)]
pub enum SheetError {
    /// 读取表格失败
    #[error("读取区域 {range} 失败: {source}")]
    ReadFailed {
        range: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入表格失败
    #[error("写入区域 {range} 失败: {source}")]
    WriteFailed {
        range: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入数据行数与区域不一致
    #[error("区域 {range} 需要 {expected} 个值，实际 {actual} 个")]
    ShapeMismatch {
        range: String,
        expected: usize,
        actual: usize,
    },
    /// 区域不合法（例如行号为 0）
    #[error("区域不合法: {range}")]
    InvalidRange { range: String },
    /// 表格文件读写失败
    #[error("表格文件 {path} 读写失败: {source}")]
    Io {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 列名不是 A-Z 的单个字母
    #[error("无效的列名 '{value}'，只支持 A-Z 单个字母")]
    InvalidColumn { value: String },
    /// 表头行必须从 1 开始
    #[error("表头行必须 >= 1，实际为 {value}")]
    InvalidHeaderRow { value: i64 },
    /// 配置文件缺少字段
    #[error("区域模式 '{mode}' 缺少字段 '{field}'")]
    MissingRangeField { mode: String, field: String },
}

// ========== 便捷构造函数 ==========

impl SheetError {
    /// 创建文件读写错误
    pub fn io(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        SheetError::Io {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建读取失败错误
    pub fn read_failed(
        range: impl ToString,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SheetError::ReadFailed {
            range: range.to_string(),
            source: Box::new(source),
        }
    }

    /// 创建写入失败错误
    pub fn write_failed(
        range: impl ToString,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SheetError::WriteFailed {
            range: range.to_string(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
