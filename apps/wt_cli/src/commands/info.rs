// apps/wt_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、生效配置与闸门几何表。

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};
use wt_core::DoorGeometry;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 闸门几何文件（覆盖配置）
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== WaveTrans 信息 ===");

    let config = super::load_config(args.config.as_deref(), args.geometry.as_deref())?;

    println!("=== 系统信息 ===");
    println!("WaveTrans CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);

    println!("\n=== 生效配置 ===");
    println!("{}", serde_json::to_string_pretty(&config)?);

    println!("\n=== 闸门几何 ===");
    match wt_io::load_geometry(&config.geometry_file) {
        Ok(doors) => print_doors(&doors),
        Err(e) => {
            warn!("无法加载闸门几何: {}", e);
            println!("  (无法加载 {}: {})", config.geometry_file.display(), e);
        }
    }

    Ok(())
}

fn print_doors(doors: &[DoorGeometry]) {
    println!(
        "{:>4}  {:<16} {:>12} {:>12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "idx", "name", "x", "y", "rmb.h", "rmb.d", "beam.b", "beam.t", "road.b", "road.t"
    );
    for (i, d) in doors.iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>12.1} {:>12.1} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            i,
            d.name,
            d.x,
            d.y,
            d.rmb.height,
            d.rmb.depth,
            d.beam.bottom,
            d.beam.top,
            d.road.bottom,
            d.road.top
        );
    }
    println!("共 {} 个闸门", doors.len());
}
