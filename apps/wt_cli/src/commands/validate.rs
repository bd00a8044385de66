// apps/wt_cli/src/commands/validate.rs

//! 输入验证命令
//!
//! 检查配置文件、闸门几何与谱/表格文件能否解析并满足不变量，
//! 给定谱文件时还检查其位置与闸门几何能否配对。

use anyhow::{bail, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use wt_config::TransmissionConfig;
use wt_core::{derive_conditions, DoorGeometry};
use wt_io::naming;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 闸门几何文件（覆盖配置）
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,

    /// 堤外 SWAN 谱文件（连同配套表格一起检查）
    #[arg(short, long)]
    pub spectrum: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== WaveTrans 输入验证 ===");

    let mut result = ValidationResult::default();

    let config = match super::load_config(args.config.as_deref(), args.geometry.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            result.add_error(format!("{e:#}"));
            return print_validation_result(&result, args.strict);
        }
    };
    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
    }

    let doors = validate_geometry(&config.geometry_file, &mut result);

    if let Some(spectrum) = &args.spectrum {
        validate_spectrum(spectrum, &config, doors.as_deref(), &mut result);
    }

    print_validation_result(&result, args.strict)
}

fn validate_geometry(path: &Path, result: &mut ValidationResult) -> Option<Vec<DoorGeometry>> {
    println!("\n检查闸门几何: {}", path.display());

    match wt_io::load_geometry(path) {
        Ok(doors) => {
            if doors.iter().all(|d| d.door.is_none()) {
                result.add_warning("几何文件未给出 door.height，无法校验关闭门叶高度");
            }
            println!("  ✓ {} 个闸门", doors.len());
            Some(doors)
        }
        Err(e) => {
            result.add_error(e.to_string());
            None
        }
    }
}

fn validate_spectrum(
    path: &Path,
    config: &TransmissionConfig,
    doors: Option<&[DoorGeometry]>,
    result: &mut ValidationResult,
) {
    println!("\n检查谱文件: {}", path.display());

    match naming::compile_pattern(&config.run_id_pattern)
        .and_then(|re| naming::run_identifier(path, &re))
    {
        Ok(id) => println!("  ✓ 运行标识: {id}"),
        Err(e) => result.add_error(e.to_string()),
    }

    let spectrum = match wt_io::read_spectrum(path) {
        Ok(s) => s,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    println!(
        "  ✓ {} 个位置, {} 个频率, {} 个方向",
        spectrum.n_locations(),
        spectrum.n_frequencies(),
        spectrum.n_directions()
    );

    let table_path = naming::companion_table_path(path, config.table_extension());
    let table = match wt_io::read_table(&table_path) {
        Ok(t) => t,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };

    let hbcs = match derive_conditions(&spectrum, &table) {
        Ok(h) => h,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    println!("  ✓ {} 个位置的水力条件", hbcs.len());

    if let Some(doors) = doors {
        match wt_physics::pair_doors(&hbcs, doors) {
            Ok(pairs) => println!("  ✓ {} 个闸门配对成功", pairs.len()),
            Err(e) => result.add_error(e.to_string()),
        }
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
