use clap::Parser;

use pixel_stego::{
    cli::{Cli, Commands},
    handler::{handle_embed_batch, handle_hide, handle_recover, handle_scan},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // `RUST_LOG` 未设置时，由 -v 的次数决定默认日志级别
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::EmbedBatch(args) => handle_embed_batch(args),
        Commands::Scan(args) => handle_scan(args),
    }
}
