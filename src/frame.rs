//! # 载荷分帧模块
//!
//! 定义隐写载荷的字节布局：
//!
//! * 文本：原样的 UTF-8 字节，不带任何标记。
//! * 文件：`"__FILE__" || 文件名 || "#####" || 文件内容`。
//!
//! 长度前缀不属于帧本身，由 [`crate::codec`] 在写入图像时添加。

use crate::constants::{FILE_MARKER, NAME_SEPARATOR};
use crate::error::{Result, StegoError};
use log::trace;

/// 调用方要隐藏的逻辑载荷。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    File { name: String, content: Vec<u8> },
}

impl Payload {
    /// 将载荷序列化为帧字节。
    pub fn to_frame(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Text(text) => serialize_text(text),
            Payload::File { name, content } => serialize_file(name, content),
        }
    }
}

/// 从帧字节中解析出的结构。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadFrame {
    Text(String),
    File { name: String, content: Vec<u8> },
    /// 既没有文件标记，也不是合法 UTF-8 的字节。
    Binary(Vec<u8>),
}

/// 文本帧就是文本本身的 UTF-8 编码。
///
/// # Errors
///
/// 空文本返回 [`StegoError::EmptyPayload`]。
pub fn serialize_text(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    Ok(text.as_bytes().to_vec())
}

/// 构造文件帧：标记、文件名、分隔符、内容。
///
/// # Errors
///
/// 文件名为空或包含分隔符 `#####` 时返回 [`StegoError::InvalidName`]，
/// 因为这样的帧无法被唯一地拆分。
pub fn serialize_file(name: &str, content: &[u8]) -> Result<Vec<u8>> {
    if name.is_empty() || find(name.as_bytes(), NAME_SEPARATOR).is_some() {
        return Err(StegoError::InvalidName(name.to_owned()));
    }

    let mut frame =
        Vec::with_capacity(FILE_MARKER.len() + name.len() + NAME_SEPARATOR.len() + content.len());
    frame.extend_from_slice(FILE_MARKER);
    frame.extend_from_slice(name.as_bytes());
    frame.extend_from_slice(NAME_SEPARATOR);
    frame.extend_from_slice(content);
    Ok(frame)
}

/// 解析帧字节。
///
/// 以 `__FILE__` 开头的帧在标记之后第一次出现的 `#####` 处拆分为文件名和内容；
/// 其他帧按 UTF-8 解码为文本，解码失败则返回 [`PayloadFrame::Binary`]。
///
/// # Errors
///
/// 带标记但缺少分隔符，或文件名不是合法 UTF-8 时返回 [`StegoError::Decode`]。
pub fn deserialize(bytes: &[u8]) -> Result<PayloadFrame> {
    let Some(rest) = bytes.strip_prefix(FILE_MARKER) else {
        return Ok(match String::from_utf8(bytes.to_vec()) {
            Ok(text) => PayloadFrame::Text(text),
            Err(err) => PayloadFrame::Binary(err.into_bytes()),
        });
    };

    let split = find(rest, NAME_SEPARATOR)
        .ok_or_else(|| StegoError::Decode("file marker without name separator".into()))?;
    let name = std::str::from_utf8(&rest[..split])
        .map_err(|err| StegoError::Decode(format!("file name is not UTF-8: {err}")))?;
    let content = rest[split + NAME_SEPARATOR.len()..].to_vec();

    trace!("file frame: name={name:?}, {} content bytes", content.len());

    Ok(PayloadFrame::File {
        name: name.to_owned(),
        content,
    })
}

/// 返回 `needle` 在 `haystack` 中第一次出现的位置。
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
