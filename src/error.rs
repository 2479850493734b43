use thiserror::Error;

/// 应用程序错误类型
///
/// 管道内部大多使用 `anyhow::Result` 传递错误，
/// 只有调用方需要区分的情况才落到这里（通过 `downcast_ref` 识别）。
#[derive(Debug, Error)]
pub enum AppError {
    /// 页面上找不到期望的元素
    #[error("页面元素不存在: {selector}")]
    ElementNotFound { selector: String },

    /// CSV 记录缺少必需的列
    #[error("订单记录缺少字段 '{field}' (第 {row} 行)")]
    MissingField { field: String, row: usize },

    /// 回执区域的结构与预期不符
    #[error("回执结构不匹配: 期望以 '{expected}' 开头，实际为 '{actual}'")]
    ReceiptLayout { expected: String, actual: String },

    /// 配置的回执字体文件不存在
    #[error("找不到字体文件: {path}")]
    FontNotFound { path: String },

    /// 下载订单文件失败
    #[error("下载失败 ({url}): {reason}")]
    DownloadFailed { url: String, reason: String },
}

impl AppError {
    /// 创建元素不存在错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::ElementNotFound {
            selector: selector.into(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = std::result::Result<T, AppError>;

/// 管道内部使用的通用结果类型
pub type Result<T> = anyhow::Result<T>;
