//! # pixel_stego 库
//!
//! 在图像像素的最低有效位中隐藏任意字节载荷 (文本或带文件名的文件)，并在之后将其恢复。
//!
//! 核心入口只有两个：[`codec::embed`] 与 [`codec::extract`]。
//! 载荷的字节布局由 [`frame`] 定义，批量扫描时的判断规则由 [`classifier`] 定义。
//!
//! ```
//! use image::RgbImage;
//! use pixel_stego::{classifier, codec, frame};
//!
//! let mut cover = RgbImage::new(64, 64);
//! codec::embed(&mut cover, &frame::serialize_text("hello")?)?;
//!
//! let bytes = codec::extract(&cover).expect("payload present");
//! assert_eq!(
//!     classifier::classify(&bytes),
//!     classifier::Classification::Text("hello".into())
//! );
//! # Ok::<(), pixel_stego::error::StegoError>(())
//! ```

// 声明库包含的所有模块。

pub mod classifier;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handler;
pub mod steganography;
