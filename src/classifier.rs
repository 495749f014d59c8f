//! # 扫描分类模块
//!
//! 批量扫描时并不知道哪些图像真的带有载荷。从未隐写过的图像读出的是近似随机的字节，
//! 这里用文件标记和“前若干字符是否可打印”两条规则来判断是否找到了数据。
//! 可打印前缀只是一个廉价的误报过滤器，并不能保证判断正确。

use crate::constants::{FILE_MARKER, TEXT_PROBE_CHARS};
use crate::frame::{self, PayloadFrame};
use log::trace;

/// 扫描一张图像后得出的结论。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    File { name: String, content: Vec<u8> },
    Text(String),
    /// 没有可用的载荷，即使读出了一些位。
    NoPayload,
}

impl Classification {
    pub fn is_found(&self) -> bool {
        !matches!(self, Classification::NoPayload)
    }
}

/// 对 [`crate::codec::extract`] 返回的原始字节进行分类。
///
/// 规则依次为：
/// 1. 以 `__FILE__` 开头：能拆分出文件名与内容时为文件，否则视为损坏的帧，无载荷。
/// 2. 整体是合法 UTF-8 且前 10 个字符都在 ASCII `[32, 126]` 范围内：文本。
/// 3. 其余情况：无载荷。
pub fn classify(bytes: &[u8]) -> Classification {
    if bytes.starts_with(FILE_MARKER) {
        return match frame::deserialize(bytes) {
            Ok(PayloadFrame::File { name, content }) => Classification::File { name, content },
            other => {
                trace!("marked frame rejected: {other:?}");
                Classification::NoPayload
            }
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(text) if looks_printable(text) => Classification::Text(text.to_owned()),
        _ => Classification::NoPayload,
    }
}

fn looks_printable(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .take(TEXT_PROBE_CHARS)
            .all(|c| (' '..='~').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use image::{Rgb, RgbImage};
    use rand::RngCore;

    #[test]
    fn file_frame_is_classified_as_file() {
        let bytes = frame::serialize_file("secret.txt", b"topsecret").unwrap();
        assert_eq!(
            classify(&bytes),
            Classification::File {
                name: "secret.txt".into(),
                content: b"topsecret".to_vec(),
            }
        );
    }

    #[test]
    fn printable_text_is_classified_as_text() {
        assert_eq!(classify(b"hello"), Classification::Text("hello".into()));
        // 只检查前 10 个字符
        let text = "0123456789\n第二行";
        assert_eq!(
            classify(text.as_bytes()),
            Classification::Text(text.into())
        );
    }

    #[test]
    fn non_printable_prefix_is_rejected() {
        assert_eq!(classify(b"\x01hello"), Classification::NoPayload);
        assert_eq!(classify("你好".as_bytes()), Classification::NoPayload);
        assert_eq!(classify(b""), Classification::NoPayload);
    }

    #[test]
    fn invalid_utf8_is_no_payload() {
        assert_eq!(classify(&[0xC3, 0x28, 0x41]), Classification::NoPayload);
    }

    #[test]
    fn marker_without_separator_is_no_payload() {
        assert_eq!(classify(b"__FILE__dangling"), Classification::NoPayload);

        let mut img = RgbImage::from_pixel(50, 50, Rgb([90, 60, 30]));
        codec::embed(&mut img, b"__FILE__dangling").unwrap();
        let bytes = codec::extract(&img).unwrap();
        assert!(frame::deserialize(&bytes).is_err());
        assert!(!classify(&bytes).is_found());
    }

    #[test]
    fn file_frame_with_non_utf8_name_is_no_payload() {
        assert_eq!(
            classify(b"__FILE__\xFF#####data"),
            Classification::NoPayload
        );
    }

    #[test]
    fn random_covers_classify_as_no_payload() {
        let mut rng = rand::rng();
        let mut raw_pixels = vec![0u8; 64 * 64 * 3];
        let mut false_positives = 0;

        for _ in 0..200 {
            rng.fill_bytes(&mut raw_pixels);
            let img = RgbImage::from_raw(64, 64, raw_pixels.clone()).unwrap();
            let found = codec::extract(&img)
                .map(|bytes| classify(&bytes))
                .unwrap_or(Classification::NoPayload);
            if found.is_found() {
                false_positives += 1;
            }
        }

        // 启发式过滤不是保证，只要求绝大多数随机图像判为无载荷
        assert!(false_positives <= 2, "{false_positives} false positives");
    }
}
