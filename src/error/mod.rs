//! 错误处理模块

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 初始化错误
    #[error("初始化失败: {0}")]
    Initialization(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 缺少凭证（启动时致命）
    #[error("缺少凭证: 环境变量 {0} 未设置")]
    MissingCredential(&'static str),

    /// MCP 协议错误
    #[error("MCP 协议错误: {0}")]
    Mcp(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// URL 解析错误
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),

    /// Reqwest 错误
    #[error("HTTP 客户端错误: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 其他错误
    #[error("未知错误: {0}")]
    Other(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Error taxonomy for a single tool invocation.
///
/// Every variant is returned as a value from `ToolRegistry::invoke`; nothing
/// here is ever raised as a panic, and the transport layer renders these to
/// the caller verbatim. A decode or validation failure is never conflated
/// with a successful empty result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Caller argument missing, of the wrong type, or outside an allowed
    /// enumeration. Never reaches the network.
    #[error("invalid argument `{parameter}`: {reason}")]
    Validation {
        /// 参数名
        parameter: String,
        /// 拒绝原因
        reason: String,
    },

    /// Provider did not answer within the per-tool deadline.
    #[error("provider timed out: {0}")]
    Timeout(String),

    /// No connection could be established or the transfer broke off.
    #[error("provider connection failed: {0}")]
    ConnectionFailed(String),

    /// Provider responded but reported failure through its envelope.
    #[error("provider error {code}: {message}")]
    Provider {
        /// 提供方自己的状态码
        code: i64,
        /// 映射后的可读消息
        message: String,
    },

    /// Response body could not be parsed as expected.
    #[error("failed to decode provider response: {0}")]
    Decode(String),

    /// Invoked tool name is not registered.
    #[error("unknown tool: {0}")]
    NotFound(String),
}

impl ToolError {
    /// 校验错误的便捷构造
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::Validation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}
