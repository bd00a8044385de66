// apps/wt_cli/src/main.rs

//! WaveTrans 命令行界面
//!
//! 由挡潮闸外侧的 SWAN 谱生成闸内侧的谱。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**，只负责参数解析、日志与文件编排，
//! 透射计算全部委托给 `wt_physics`。

mod commands;
mod logging;

use clap::{Parser, Subcommand};

/// WaveTrans 挡潮闸波浪透射命令行工具
#[derive(Parser)]
#[command(name = "wt_cli")]
#[command(author = "WaveTrans Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Creates SWAN spectra shoreward of a storm surge barrier", long_about = None)]
struct Cli {
    /// 控制台日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 计算透射并写出闸内侧谱
    Run(commands::run::RunArgs),
    /// 显示配置与闸门信息
    Info(commands::info::InfoArgs),
    /// 验证几何、配置与谱文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志：run 命令额外写入与输入谱同名的日志文件
    let level = logging::parse_level(&cli.log_level);
    let log_file = match &cli.command {
        Commands::Run(args) => Some(wt_io::naming::log_path(&args.spectrum)),
        _ => None,
    };
    logging::init(level, log_file.as_deref())?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
