//! # 命令处理逻辑模块
//!
//! 包含处理各子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用隐写编解码核心以及向用户报告结果。
//! 批量命令中单张图像的失败只会被记录并跳过，不会中断整个批次。

use crate::classifier::{Classification, classify};
use crate::cli::{EmbedBatchArgs, HideArgs, PayloadArgs, RecoverArgs, ScanArgs};
use crate::codec::{embed, extract};
use crate::constants::{EXTRACTED_PREFIX, STEGO_PREFIX};
use crate::frame::{Payload, PayloadFrame, deserialize};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbaImage};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 批量隐写接受的封面图像扩展名。
const COVER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// 扫描时只检查无损的 PNG 图像。
const SCAN_EXTENSIONS: &[&str] = &["png"];

/// 单张图像的扫描结果。
#[derive(Debug, Clone)]
pub struct ScanFinding {
    pub image: PathBuf,
    pub classification: Classification,
    /// 文件载荷被写出的位置。
    pub saved_as: Option<PathBuf>,
}

/// 整个目录的扫描结果。
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// 被检查的图像数量 (包括读取失败的图像)。
    pub scanned: usize,
    /// 找到数据的图像，按文件名排序。
    pub findings: Vec<ScanFinding>,
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取封面图像和载荷，把载荷隐藏到图像中，并以 PNG 格式保存结果。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取封面图像或载荷文件。
/// * 图像容量不足以容纳载荷。
/// * 无法写入目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_stego_path(&args.image));

    anyhow::ensure!(
        args.force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );

    let payload = load_payload(&args.payload)?;
    let frame = payload.to_frame()?;

    let mut picture = open_rgba(&args.image)?;
    embed(&mut picture, &frame).with_context(|| {
        format!(
            "Unable to hide the payload in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    save_png(&picture, &dest)?;

    info!("hid {} frame bytes in {}", frame.len(), dest.display());
    println!(
        "The payload has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 文本载荷直接打印到标准输出；文件载荷以 `extracted_<文件名>` 保存到输出目录。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取图像文件。
/// * 图像中没有可识别的隐藏数据。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = open_rgba(&args.image)?;

    let bytes = extract(&picture).with_context(|| {
        format!(
            "No hidden data found in {}. \nThe image may not contain a hidden payload or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let frame = deserialize(&bytes).with_context(|| {
        format!(
            "The hidden data in {} is malformed.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    match frame {
        PayloadFrame::Text(text) => {
            info!("recovered {} bytes of text", text.len());
            println!("{text}");
        }
        PayloadFrame::File { name, content } => {
            let out_dir = args
                .out_dir
                .clone()
                .unwrap_or_else(|| parent_dir(&args.image));
            let target = out_dir.join(extracted_name(&name));

            anyhow::ensure!(
                args.force || !target.exists(),
                "Output file already exists: {}. \nUse --force to overwrite it.",
                target.to_string_lossy().red().bold()
            );

            fs::create_dir_all(&out_dir).with_context(|| {
                format!(
                    "Unable to create output directory: {}",
                    out_dir.to_string_lossy().red().bold()
                )
            })?;
            write_file(&target, &content)?;

            println!(
                "The file has been successfully recovered and saved: {}",
                target.to_string_lossy().green().bold()
            );
        }
        PayloadFrame::Binary(bytes) => anyhow::bail!(
            "Found {} bytes in {}, but they are neither text nor a framed file.",
            bytes.len().to_string().red().bold(),
            args.image.to_string_lossy().red().bold()
        ),
    }

    Ok(())
}

/// 处理 'EmbedBatch' 命令的执行逻辑。
pub fn handle_embed_batch(args: EmbedBatchArgs) -> Result<()> {
    let frame = load_payload(&args.payload)?.to_frame()?;
    let written = embed_directory(&args.input, &args.output, &frame)?;

    println!(
        "Batch complete. Saved {} images to folder: {}",
        written.to_string().green().bold(),
        args.output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Scan' 命令的执行逻辑。
pub fn handle_scan(args: ScanArgs) -> Result<()> {
    let report = scan_directory(&args.input, &args.output)?;

    for finding in &report.findings {
        let image = finding.image.to_string_lossy();
        match (&finding.classification, &finding.saved_as) {
            (Classification::Text(text), _) => {
                println!("{} {}: {}", "[TEXT FOUND]".green().bold(), image, text)
            }
            (Classification::File { .. }, Some(path)) => println!(
                "{} {} -> Saved as {}",
                "[FILE FOUND]".green().bold(),
                image,
                path.to_string_lossy()
            ),
            _ => {}
        }
    }

    println!(
        "\nScan finished. Found hidden data in {} of {} images.",
        report.findings.len().to_string().green().bold(),
        report.scanned
    );
    Ok(())
}

/// 把同一帧隐藏到 `input` 中的每张封面图像里，结果保存为 `output/stego_<文件名>.png`。
///
/// 返回成功写出的图像数量。
///
/// # Errors
///
/// 仅当输入目录无法读取或输出目录无法创建时返回错误；单张图像的失败只记录警告。
pub fn embed_directory(input: &Path, output: &Path, frame: &[u8]) -> Result<usize> {
    let covers = list_images(input, COVER_EXTENSIONS)?;
    fs::create_dir_all(output).with_context(|| {
        format!(
            "Unable to create output directory: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    let total = covers.len();
    let mut written = 0;

    for (i, cover) in covers.iter().enumerate() {
        info!("processing {}/{}: {}", i + 1, total, cover.display());
        let dest = output.join(stego_file_name(cover));

        let result = open_rgba(cover).and_then(|mut picture| {
            embed(&mut picture, frame)?;
            save_png(&picture, &dest)
        });

        match result {
            Ok(()) => written += 1,
            Err(err) => warn!("skipping {}: {err:#}", cover.display()),
        }
    }

    Ok(written)
}

/// 扫描 `input` 中的每张 PNG 图像。找到的文件写入 `output/extracted_<文件名>`。
///
/// # Errors
///
/// 仅当输入目录无法读取或输出目录无法创建时返回错误；单张图像的失败只记录警告。
pub fn scan_directory(input: &Path, output: &Path) -> Result<ScanReport> {
    let images = list_images(input, SCAN_EXTENSIONS)?;
    info!("found {} PNG files, scanning", images.len());

    fs::create_dir_all(output).with_context(|| {
        format!(
            "Unable to create output directory: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    let mut report = ScanReport {
        scanned: images.len(),
        findings: Vec::new(),
    };

    for image in images {
        let classification = match open_rgba(&image) {
            Ok(picture) => extract(&picture)
                .map(|bytes| classify(&bytes))
                .unwrap_or(Classification::NoPayload),
            Err(err) => {
                warn!("skipping {}: {err:#}", image.display());
                continue;
            }
        };

        if !classification.is_found() {
            continue;
        }

        let saved_as = match &classification {
            Classification::NoPayload | Classification::Text(_) => None,
            Classification::File { name, content } => {
                let target = output.join(extracted_name(name));
                match write_file(&target, content) {
                    Ok(()) => Some(target),
                    Err(err) => {
                        warn!("skipping {}: {err:#}", image.display());
                        continue;
                    }
                }
            }
        };

        info!("hidden data found in {}", image.display());
        report.findings.push(ScanFinding {
            image,
            classification,
            saved_as,
        });
    }

    Ok(report)
}

/// 根据命令行参数构造载荷。文件载荷使用路径的最后一个组成部分作为文件名。
fn load_payload(args: &PayloadArgs) -> Result<Payload> {
    match (&args.text, &args.file) {
        (Some(text), _) => Ok(Payload::Text(text.clone())),
        (None, Some(path)) => {
            let content = fs::read(path).with_context(|| {
                format!(
                    "Unable to read payload file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .with_context(|| {
                    format!(
                        "Payload path has no file name: {}",
                        path.to_string_lossy().red().bold()
                    )
                })?;
            Ok(Payload::File { name, content })
        }
        (None, None) => anyhow::bail!("Either --text or --file must be provided."),
    }
}

/// 列出目录中扩展名匹配 (不区分大小写) 的文件，按路径排序。
fn list_images(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| {
        format!(
            "Unable to read folder: {}",
            dir.to_string_lossy().red().bold()
        )
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    images.sort();
    Ok(images)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

fn open_rgba(path: &Path) -> Result<RgbaImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(picture.to_rgba8())
}

fn save_png(picture: &RgbaImage, path: &Path) -> Result<()> {
    picture
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                path.to_string_lossy().red().bold()
            )
        })
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `stego_<文件名主干>.png`
fn stego_file_name(cover: &Path) -> String {
    let stem = cover
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{STEGO_PREFIX}{stem}.png")
}

fn default_stego_path(cover: &Path) -> PathBuf {
    parent_dir(cover).join(stego_file_name(cover))
}

/// 图像中记录的文件名来自不可信数据，只保留最后一个路径组成部分，避免写出到输出目录之外。
fn extracted_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|base| base.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payload.bin".to_owned());
    format!("{EXTRACTED_PREFIX}{base}")
}
