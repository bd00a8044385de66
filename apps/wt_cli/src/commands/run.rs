// apps/wt_cli/src/commands/run.rs

//! 透射计算命令
//!
//! 读取堤外谱与配套表格，计算每个闸门的透射系数，
//! 写出每个闸门一个闸内侧谱文件。
//!
//! 全部计算在写文件之前完成；输出先写入临时文件，全部写成后才改名到位，
//! 要么所有选中闸门的谱都写出，要么一个都不写。

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{error, info};
use wt_config::TransmissionConfig;
use wt_core::derive_conditions;
use wt_foundation::WtError;
use wt_io::naming;
use wt_physics::{door_spectra, transmission_through_barrier, DoorTransmission};

/// 透射系数汇总文件名
pub const SUMMARY_FILE: &str = "transmission.json";

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 堤外 SWAN 谱文件
    pub spectrum: PathBuf,

    /// 输出目录
    pub output: PathBuf,

    /// 假定闸门关闭
    #[arg(long)]
    pub closed: bool,

    /// 只计算该索引（谱文件中的位置）的闸门
    #[arg(long, value_name = "INDEX")]
    pub door: Option<usize>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 闸门几何文件（覆盖配置）
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,
}

/// 单个闸门的汇总记录
#[derive(Debug, Serialize)]
struct DoorSummary<'a> {
    #[serde(flatten)]
    transmission: &'a DoorTransmission,
    /// 静水位 [m]
    swl: f64,
    /// 有效波高 [m]
    hs: f64,
    /// 输出谱文件
    output: String,
}

/// 运行汇总
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    spectrum: String,
    run_id: &'a str,
    closed: bool,
    doors: Vec<DoorSummary<'a>>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== WaveTrans 透射计算 ===");
    let start = Instant::now();

    let config = super::load_config(args.config.as_deref(), args.geometry.as_deref())?;
    let outputs = prepare(&args, &config)?;

    write_all(&outputs)?;

    info!(
        "=== 完成: 写出 {} 个文件, 耗时 {:.3} s ===",
        outputs.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// 读取输入并计算，返回待写出的 (路径, 内容)
fn prepare(args: &RunArgs, config: &TransmissionConfig) -> Result<Vec<(PathBuf, String)>> {
    // 输入文件检查
    if !args.spectrum.exists() {
        return Err(WtError::not_found(&args.spectrum).into());
    }
    let table_path = naming::companion_table_path(&args.spectrum, config.table_extension());
    if !table_path.exists() {
        return Err(WtError::not_found(&table_path))
            .context("未找到与谱文件配套的表格文件");
    }

    let pattern = naming::compile_pattern(&config.run_id_pattern)?;
    let run_id = naming::run_identifier(&args.spectrum, &pattern)?;
    info!("运行标识: {}", run_id);

    // 水力条件与几何
    let spectrum = wt_io::read_spectrum(&args.spectrum)?;
    let table = wt_io::read_table(&table_path)?;
    let hbcs = derive_conditions(&spectrum, &table)?;
    let doors = wt_io::load_geometry(&config.geometry_file)
        .with_context(|| format!("加载闸门几何失败: {}", config.geometry_file.display()))?;

    // 透射
    let results = transmission_through_barrier(&hbcs, &doors, args.closed, args.door)?;
    let spectra = door_spectra(&spectrum, &results)?;

    let extension = naming::output_extension(
        &args.spectrum,
        config.output_extension.as_deref(),
        spectrum.is_directional(),
    );

    let mut outputs = Vec::with_capacity(results.len() + 1);
    let mut doors_summary = Vec::with_capacity(results.len());
    for (result, sub) in results.iter().zip(&spectra) {
        let hbc = &hbcs[result.location];
        let path = naming::door_output_path(&args.output, &run_id, &result.name, &extension);
        info!(
            "闸门 {}: swl={:.3} m, Hs={:.3} m, Kt={:.4} -> {}",
            result.name,
            hbc.swl,
            hbc.hs,
            result.kt,
            path.display()
        );

        doors_summary.push(DoorSummary {
            transmission: result,
            swl: hbc.swl,
            hs: hbc.hs,
            output: path.display().to_string(),
        });
        outputs.push((path, wt_io::format_spectrum(sub)));
    }

    if config.write_summary {
        let summary = RunSummary {
            spectrum: args.spectrum.display().to_string(),
            run_id: &run_id,
            closed: args.closed,
            doors: doors_summary,
        };
        let json = serde_json::to_string_pretty(&summary).map_err(WtError::from)?;
        outputs.push((args.output.join(&run_id).join(SUMMARY_FILE), json));
    }

    Ok(outputs)
}

/// 写出全部文件
///
/// 先把每个文件写入目标目录下的临时文件，全部成功后才逐个改名为最终路径；
/// 任一写入失败时临时文件随 drop 删除，已存在的旧输出保持不变。
fn write_all(outputs: &[(PathBuf, String)]) -> Result<()> {
    let mut staged: Vec<(NamedTempFile, &Path)> = Vec::with_capacity(outputs.len());

    for (path, content) in outputs {
        match stage(path, content) {
            Ok(tmp) => staged.push((tmp, path)),
            Err(e) => {
                error!("写出 {} 失败, 放弃 {} 个已暂存文件", path.display(), staged.len());
                return Err(WtError::io_with_source(
                    format!("无法写入 {}", path.display()),
                    e,
                )
                .into());
            }
        }
    }

    for (tmp, path) in staged {
        tmp.persist(path).map_err(|e| {
            WtError::io_with_source(format!("无法写入 {}", path.display()), e.error)
        })?;
    }

    Ok(())
}

/// 在目标目录中创建临时文件并写入内容
fn stage(path: &Path, content: &str) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP1: &str = "\
SWAN   1
LOCATIONS
     2
    0.00   0.00
   40.00   0.00
AFREQ
     2
    0.1000
    0.2000
QUANT
     1
VaDens
m2/Hz
   -0.9900E+02
LOCATION     1
   0.2500E+01
   0.2500E+01
LOCATION     2
   0.1000E+01
   0.1000E+01
";

    const TAB: &str = "\
%       Xp            Yp            Watlev
%       [m]           [m]           [m]
     0.00          0.00          0.0000
    40.00          0.00          0.0000
";

    const GEOMETRY: &str = r#"[
        {"x": 0.0, "y": 0.0, "name": "Door A",
         "rmb": {"height": 1.0, "depth": 2.0},
         "beam": {"bottom": 5.0, "top": 6.0},
         "road": {"bottom": 7.0, "top": 8.0}},
        {"x": 40.0, "y": 0.0, "name": "Door B",
         "rmb": {"height": 1.0, "depth": 2.0},
         "beam": {"bottom": 5.0, "top": 6.0},
         "road": {"bottom": 7.0, "top": 8.0}}
    ]"#;

    fn setup(dir: &Path) -> (PathBuf, TransmissionConfig) {
        let spectrum = dir.join("osk_run007.sp1");
        std::fs::write(&spectrum, SP1).unwrap();
        std::fs::write(dir.join("osk_run007.tab"), TAB).unwrap();
        let geometry = dir.join("dimensions.json");
        std::fs::write(&geometry, GEOMETRY).unwrap();
        (spectrum, TransmissionConfig::default().with_geometry_file(geometry))
    }

    fn args(spectrum: PathBuf, output: PathBuf, door: Option<usize>) -> RunArgs {
        RunArgs {
            spectrum,
            output,
            closed: false,
            door,
            config: None,
            geometry: None,
        }
    }

    #[test]
    fn test_prepare_all_doors() {
        let dir = tempfile::tempdir().unwrap();
        let (spectrum, config) = setup(dir.path());
        let out = dir.path().join("out");

        let outputs = prepare(&args(spectrum, out.clone(), None), &config).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].0, out.join("run007").join("Door_A.sp1"));
        assert_eq!(outputs[1].0, out.join("run007").join("Door_B.sp1"));
        assert_eq!(outputs[2].0, out.join("run007").join(SUMMARY_FILE));

        // 闸门 A: Hs = 2, crest = 1, obstr = 1, Kt = 1 - 1/4 = 0.75
        let back = wt_io::parse_spectrum(&outputs[0].1, Path::new("a.sp1")).unwrap();
        for v in back.location_energy(0).unwrap() {
            assert!((v - 2.5 * 0.75 * 0.75).abs() < 1e-3);
        }
        assert!(outputs[2].1.contains("\"kt\""));
    }

    #[test]
    fn test_prepare_single_door() {
        let dir = tempfile::tempdir().unwrap();
        let (spectrum, config) = setup(dir.path());
        let out = dir.path().join("out");

        let outputs = prepare(&args(spectrum, out.clone(), Some(1)), &config).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0, out.join("run007").join("Door_B.sp1"));
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let (spectrum, config) = setup(dir.path());
        std::fs::remove_file(dir.path().join("osk_run007.tab")).unwrap();

        let err = prepare(&args(spectrum, dir.path().join("out"), None), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WtError>(),
            Some(WtError::NotFound { .. })
        ));
    }

    #[test]
    fn test_run_id_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (_, config) = setup(dir.path());
        let spectrum = dir.path().join("seaward.sp1");
        std::fs::write(&spectrum, SP1).unwrap();
        std::fs::write(dir.path().join("seaward.tab"), TAB).unwrap();

        let err = prepare(&args(spectrum, dir.path().join("out"), None), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WtError>(),
            Some(WtError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_execute_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let (spectrum, config) = setup(dir.path());
        let config_path = dir.path().join("wavetrans.json");
        config.save_to_file(&config_path).unwrap();
        let out = dir.path().join("out");

        let mut run = args(spectrum, out.clone(), None);
        run.config = Some(config_path);
        execute(run).unwrap();

        assert!(out.join("run007").join("Door_A.sp1").exists());
        assert!(out.join("run007").join("Door_B.sp1").exists());
        assert!(out.join("run007").join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_missing_spectrum() {
        let dir = tempfile::tempdir().unwrap();
        let (_, config) = setup(dir.path());
        let spectrum = dir.path().join("osk_run008.sp1");

        let err = prepare(&args(spectrum, dir.path().join("out"), None), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WtError>(),
            Some(WtError::NotFound { .. })
        ));
    }

    #[test]
    fn test_colliding_door_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (spectrum, config) = setup(dir.path());
        let renamed = GEOMETRY.replace("Door A", "Door/1").replace("Door B", "Door 1");
        std::fs::write(&config.geometry_file, renamed).unwrap();

        let err = prepare(&args(spectrum, dir.path().join("out"), None), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WtError>(),
            Some(WtError::Malformed { .. })
        ));
    }

    #[test]
    fn test_write_all_discards_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.sp1");
        // 父路径是普通文件，第二个文件无法写出
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let second = blocker.join("b.sp1");

        let outputs = vec![(first.clone(), "a".to_string()), (second, "b".to_string())];
        assert!(write_all(&outputs).is_err());
        assert!(!first.exists());

        // 目录中只剩 blocker，没有残留临时文件
        let left: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("a.sp1");
        std::fs::write(&previous, "previous run").unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let outputs = vec![
            (previous.clone(), "new run".to_string()),
            (blocker.join("b.sp1"), "b".to_string()),
        ];
        assert!(write_all(&outputs).is_err());
        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "previous run");
    }

    #[test]
    fn test_write_all_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("run007").join("a.sp1");
        std::fs::create_dir_all(previous.parent().unwrap()).unwrap();
        std::fs::write(&previous, "previous run").unwrap();

        let outputs = vec![
            (previous.clone(), "new run".to_string()),
            (dir.path().join("run007").join("b.sp1"), "b".to_string()),
        ];
        write_all(&outputs).unwrap();
        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "new run");
        assert_eq!(std::fs::read_dir(previous.parent().unwrap()).unwrap().count(), 2);
    }
}
