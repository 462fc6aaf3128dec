//! 模拟“加密”引擎
//!
//! 安全约束：引擎从不打开、读取或修改原文件。
//! 它与文件系统的唯一交互是在原文件旁创建新的 `<原路径>.encrypted.sim`。
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{Result, SimError};
use crate::matcher::MARKER_SUFFIX;
use crate::options::SimMode;
use crate::types::{AffectedFile, SimObserver, SimulationRun};

/// 单个文件的处理结果
#[derive(Debug)]
pub enum FileOutcome {
    /// Observe 模式：只记录意图
    Observed { path: PathBuf },
    /// Write 模式：标记文件已写入
    MarkerWritten { path: PathBuf, marker: PathBuf },
    /// Write 模式：写入失败（已记录日志，继续下一个文件）
    Failed { error: SimError },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// 一次模拟的汇总
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub processed: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl SimulationReport {
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed
    }
}

/// 标记文件路径：原路径直接追加后缀
pub fn marker_path(original: &Path) -> PathBuf {
    let mut os: OsString = original.as_os_str().to_owned();
    os.push(MARKER_SUFFIX);
    PathBuf::from(os)
}

/// 标记文件内容（三行，逐字节固定格式）
pub fn marker_payload(original: &Path, key: &str, timestamp: &str) -> String {
    format!(
        "SIMULATION ONLY: This file represents {} encrypted with key {}\nTimestamp: {}\nThis is a simulation for educational purposes only.\n",
        original.display(),
        key,
        timestamp
    )
}

/// 当前本地时间（ISO-8601 / RFC 3339，微秒精度）
pub(crate) fn now_iso8601() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
}

/// 对一组受影响文件执行模拟，返回每个文件的结果与成功计数
pub fn simulate_files(
    files: &[AffectedFile],
    mode: SimMode,
    key: &str,
    observer: &mut dyn SimObserver,
) -> SimulationReport {
    let mut report = SimulationReport::default();
    if files.is_empty() {
        info!("no files to encrypt");
        return report;
    }
    info!(files = files.len(), ?mode, "starting simulated encryption");
    info!(key, "using simulation key");

    let total = files.len();
    for (idx, file) in files.iter().enumerate() {
        observer.on_file_processed(idx, total, file);
        let outcome = simulate_one(file, mode, key);
        match &outcome {
            FileOutcome::Observed { path } => {
                info!(path = %path.display(), "would encrypt");
            }
            FileOutcome::MarkerWritten { path, marker } => {
                info!(path = %path.display(), marker = %marker.display(), "simulated encryption");
            }
            FileOutcome::Failed { error } => {
                error!(path = %error.path().display(), %error, "error processing file");
                observer.on_warning(error);
            }
        }
        if outcome.is_success() {
            report.processed += 1;
        }
        report.outcomes.push(outcome);
    }

    info!(processed = report.processed, failed = report.failed(), "encryption simulation complete");
    report
}

/// 对 `SimulationRun` 执行模拟，并把成功数写回运行对象
pub fn run(sim: &mut SimulationRun, observer: &mut dyn SimObserver) -> SimulationReport {
    let report = simulate_files(sim.affected_files(), sim.mode(), sim.generated_key(), observer);
    sim.set_processed_count(report.processed);
    report
}

fn simulate_one(file: &AffectedFile, mode: SimMode, key: &str) -> FileOutcome {
    let path = file.path();
    match mode {
        SimMode::Observe => FileOutcome::Observed { path: path.to_path_buf() },
        SimMode::Write => match write_marker(path, key) {
            Ok(marker) => FileOutcome::MarkerWritten { path: path.to_path_buf(), marker },
            Err(error) => FileOutcome::Failed { error },
        },
    }
}

/// 写入标记文件
fn write_marker(original: &Path, key: &str) -> Result<PathBuf> {
    let marker = marker_path(original);
    let payload = marker_payload(original, key, &now_iso8601());
    write_artifact(&marker, payload.as_bytes())?;
    Ok(marker)
}

/// 以新 inode 写入模拟产物（标记文件、勒索说明）
/// - 路径上若是符号链接或非普通文件则拒绝，写入不会被重定向
/// - 已有的普通文件先解除链接再 `create_new`，硬链接指向的其他文件保持不变
pub(crate) fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_file() => {
            std::fs::remove_file(path).map_err(|e| SimError::write(path, e))?;
        }
        Ok(_) => {
            return Err(SimError::write(
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path is occupied by a non-regular file"),
            ));
        }
        Err(_) => {}
    }
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| SimError::write(path, e))?;
    f.write_all(contents).map_err(|e| SimError::write(path, e))
}
