//! # 位平面读写模块
//!
//! 按光栅顺序 (逐行、逐像素、按 R/G/B 通道) 把位序列写入图像通道的最低有效位，
//! 或从中读回。每个通道只承载一位，Alpha 通道保持不变。

use crate::constants::CHANNELS_USED;
use crate::error::{Result, StegoError};
use image::{ImageBuffer, Pixel};

/// 像素类型中可用于隐写的通道数。少于三个颜色通道的像素 (如灰度) 不可用。
fn usable_channels<P: Pixel>() -> usize {
    if P::CHANNEL_COUNT as usize >= CHANNELS_USED {
        CHANNELS_USED
    } else {
        0
    }
}

/// 图像最多能承载的位数：宽 × 高 × 3。
pub fn capacity<P>(image: &ImageBuffer<P, Vec<u8>>) -> usize
where
    P: Pixel<Subpixel = u8>,
{
    image.width() as usize * image.height() as usize * usable_channels::<P>()
}

/// 将 `bits` 依次写入各通道的最低有效位：`channel = (channel & 0xFE) | bit`。
///
/// # Errors
///
/// 当位数超过 [`capacity`] 时返回 [`StegoError::InsufficientCapacity`]，
/// 此时图像不会被修改。
pub fn write_bits<P, I>(image: &mut ImageBuffer<P, Vec<u8>>, bits: I) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
    I: IntoIterator<Item = bool>,
    I::IntoIter: ExactSizeIterator,
{
    let bits = bits.into_iter();
    let available = capacity(image);
    if bits.len() > available {
        return Err(StegoError::InsufficientCapacity {
            required: bits.len(),
            available,
        });
    }

    let stride = P::CHANNEL_COUNT as usize;
    let channels = usable_channels::<P>();
    let pixel_count = image.width() as usize * image.height() as usize;

    image
        .chunks_exact_mut(stride)
        .take(pixel_count)
        .flat_map(|pixel| pixel.iter_mut().take(channels))
        .zip(bits)
        .for_each(|(channel, bit)| *channel = (*channel & 0xFE) | bit as u8);

    Ok(())
}

/// 按与 [`write_bits`] 相同的顺序读取前 `count` 个通道的最低有效位。
///
/// # Errors
///
/// 当 `count` 超过 [`capacity`] 时返回 [`StegoError::InsufficientCapacity`]。
pub fn read_bits<P>(image: &ImageBuffer<P, Vec<u8>>, count: usize) -> Result<Vec<bool>>
where
    P: Pixel<Subpixel = u8>,
{
    let available = capacity(image);
    if count > available {
        return Err(StegoError::InsufficientCapacity {
            required: count,
            available,
        });
    }

    let stride = P::CHANNEL_COUNT as usize;
    let channels = usable_channels::<P>();

    Ok(image
        .chunks_exact(stride)
        .flat_map(|pixel| pixel.iter().take(channels))
        .take(count)
        .map(|&channel| channel & 1 == 1)
        .collect())
}

/// 按 MSB 优先顺序遍历字节序列中每一位的迭代器。
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Bits<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.bytes.get(self.position / 8)?;
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

/// 把 MSB 优先的位序列重新打包为字节；末尾不足 8 位的部分以 0 补齐。
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            let byte = chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8);
            byte << (8 - chunk.len())
        })
        .collect()
}
