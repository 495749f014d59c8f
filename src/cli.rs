//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 批量目录的默认值来自 [`crate::constants`]。

use crate::constants::{DEFAULT_EXTRACT_DIR, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// 基于 LSB (最低有效位) 隐写术的命令行工具，可在无损格式图像中隐藏文本或文件，并批量扫描目录中的隐藏数据。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "基于 LSB (最低有效位) 隐写术的命令行工具，可在无损格式图像 (如 PNG) 中隐藏文本或文件，并批量扫描目录中的隐藏数据。"
)]
pub struct Cli {
    /// 提高日志级别 (-v 为 info，-vv 为 debug)。`RUST_LOG` 优先。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在单张图像中隐藏文本或文件。
    Hide(HideArgs),

    /// 从单张隐写图像中恢复隐藏的文本或文件。
    Recover(RecoverArgs),

    /// 把同一份载荷隐藏到目录中的每一张图像里。
    EmbedBatch(EmbedBatchArgs),

    /// 扫描目录中的 PNG 图像，提取所有能找到的隐藏数据。
    Scan(ScanArgs),
}

/// 要隐藏的内容：文本或文件，二选一。
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// 要隐藏的文本消息。
    #[arg(short, long)]
    pub text: Option<String>,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 封面图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// 输出 PNG 路径。默认在封面图像旁生成 `stego_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 可能含有隐藏数据的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复出的文件的保存目录。默认为图像所在目录。
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'embed-batch' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EmbedBatchArgs {
    /// 封面图像目录 (.png / .jpg / .jpeg)。
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// 隐写图像的输出目录，不存在时自动创建。
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

/// 'scan' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// 要扫描的目录。
    #[arg(short, long)]
    pub input: PathBuf,

    /// 恢复出的文件的保存目录，不存在时自动创建。
    #[arg(short, long, default_value = DEFAULT_EXTRACT_DIR)]
    pub output: PathBuf,
}
