//! # 错误类型模块
//!
//! 编解码核心返回的所有可恢复错误。

use thiserror::Error;

/// 编解码核心统一使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 位序列超出了图像通道最低有效位的容量。
    #[error("Not enough capacity: {required} bits required, image holds {available} bits")]
    InsufficientCapacity { required: usize, available: usize },

    /// 载荷帧加上长度前缀后无法放入封面图像。
    #[error("Payload too large: {required} bits required, image holds {available} bits")]
    PayloadTooLarge { required: usize, available: usize },

    #[error("The payload is empty")]
    EmptyPayload,

    /// 无法被无歧义地分帧的文件名。
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    /// 带有文件标记但无法拆分出文件名与内容的帧。
    #[error("Malformed frame: {0}")]
    Decode(String),
}
