//! # 隐写编解码模块
//!
//! 图像中的比特布局：
//!
//! ```text
//! [32 位大端序长度前缀][帧字节]
//! ```
//!
//! 每个字节按 MSB 优先写入，依次占用光栅顺序中下一个 R/G/B 通道的最低有效位。

use crate::constants::LENGTH_PREFIX_BITS;
use crate::error::{Result, StegoError};
use crate::steganography::{Bits, capacity, pack_bits, read_bits, write_bits};
use image::{ImageBuffer, Pixel};
use log::debug;

/// 把帧字节连同长度前缀写入图像。
///
/// 写入任何位之前先检查容量，失败时图像保持原样。
///
/// # Errors
///
/// * 帧为空：[`StegoError::EmptyPayload`]。
/// * 前缀与帧的总位数超过图像容量，或帧长度超出 `u32`：[`StegoError::PayloadTooLarge`]。
pub fn embed<P>(image: &mut ImageBuffer<P, Vec<u8>>, frame: &[u8]) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
{
    if frame.is_empty() {
        return Err(StegoError::EmptyPayload);
    }

    let available = capacity(image);
    let required = frame
        .len()
        .checked_mul(8)
        .and_then(|bits| bits.checked_add(LENGTH_PREFIX_BITS))
        .unwrap_or(usize::MAX);
    let declared = match u32::try_from(frame.len()) {
        Ok(len) if required <= available => len,
        _ => {
            return Err(StegoError::PayloadTooLarge {
                required,
                available,
            });
        }
    };

    let mut stream = Vec::with_capacity(LENGTH_PREFIX_BITS / 8 + frame.len());
    stream.extend_from_slice(&declared.to_be_bytes());
    stream.extend_from_slice(frame);

    debug!("embedding {} frame bytes ({required} of {available} bits)", frame.len());
    write_bits(image, Bits::new(&stream))
}

/// 读取长度前缀并取回帧字节。
///
/// 声明的长度为 0 或超过图像剩余容量时返回 `None`，表示图像中没有可信的载荷。
/// 这只过滤明显不可能的长度，随机像素仍可能碰巧给出一个合理的值。
pub fn extract<P>(image: &ImageBuffer<P, Vec<u8>>) -> Option<Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let available = capacity(image);
    let prefix = pack_bits(&read_bits(image, LENGTH_PREFIX_BITS).ok()?);
    let declared = u32::from_be_bytes(prefix.try_into().ok()?) as usize;
    let max_len = available.saturating_sub(LENGTH_PREFIX_BITS) / 8;

    if declared == 0 || declared > max_len {
        debug!("implausible declared length {declared} (max {max_len})");
        return None;
    }

    let bits = read_bits(image, LENGTH_PREFIX_BITS + declared * 8).ok()?;
    Some(pack_bits(&bits[LENGTH_PREFIX_BITS..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{self, PayloadFrame};
    use image::{Rgb, RgbImage, RgbaImage};

    fn noisy_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 + y) as u8, (x ^ y) as u8, (x * y + 3) as u8])
        })
    }

    #[test]
    fn text_round_trip_on_600x400() {
        let mut img = noisy_image(600, 400);
        embed(&mut img, &frame::serialize_text("hello").unwrap()).unwrap();

        let bytes = extract(&img).unwrap();
        assert_eq!(
            frame::deserialize(&bytes).unwrap(),
            PayloadFrame::Text("hello".into())
        );
    }

    #[test]
    fn file_round_trip_on_600x400() {
        let mut img = noisy_image(600, 400);
        embed(
            &mut img,
            &frame::serialize_file("secret.txt", b"topsecret").unwrap(),
        )
        .unwrap();

        assert_eq!(
            frame::deserialize(&extract(&img).unwrap()).unwrap(),
            PayloadFrame::File {
                name: "secret.txt".into(),
                content: b"topsecret".to_vec(),
            }
        );
    }

    #[test]
    fn oversized_payload_fails_without_mutation() {
        let mut img = noisy_image(600, 400);
        let before = img.clone();
        let result = embed(&mut img, &vec![b'a'; 90_001]);

        assert_eq!(
            result,
            Err(StegoError::PayloadTooLarge {
                required: 32 + 90_001 * 8,
                available: 720_000,
            })
        );
        assert_eq!(img, before);
    }

    #[test]
    fn exact_capacity_boundary() {
        // 16 x 2 x 3 = 96 位 = 32 位前缀 + 8 字节
        let mut img = noisy_image(16, 2);
        assert!(embed(&mut img, b"12345678").is_ok());
        assert_eq!(extract(&img).unwrap(), b"12345678");

        let mut img = noisy_image(16, 2);
        assert!(matches!(
            embed(&mut img, b"123456789"),
            Err(StegoError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let mut img = noisy_image(10, 10);
        assert_eq!(embed(&mut img, b""), Err(StegoError::EmptyPayload));
    }

    #[test]
    fn alpha_survives_embedding() {
        let mut img = RgbaImage::from_pixel(20, 20, image::Rgba([9, 9, 9, 42]));
        embed(&mut img, b"alpha stays").unwrap();

        assert!(img.pixels().all(|p| p[3] == 42));
        assert_eq!(extract(&img).unwrap(), b"alpha stays");
    }

    #[test]
    fn extract_is_repeatable_and_read_only() {
        let mut img = noisy_image(40, 40);
        embed(&mut img, b"twice").unwrap();
        let snapshot = img.clone();

        assert_eq!(extract(&img), extract(&img));
        assert_eq!(img, snapshot);
    }

    #[test]
    fn implausible_lengths_are_not_present() {
        // 全零图像声明长度为 0
        assert_eq!(extract(&RgbImage::new(50, 50)), None);
        // 全一图像声明长度为 u32::MAX
        assert_eq!(
            extract(&RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]))),
            None
        );
        // 容量不足以容纳前缀
        assert_eq!(extract(&RgbImage::new(3, 3)), None);
        assert_eq!(extract(&RgbImage::new(0, 0)), None);
    }
}
