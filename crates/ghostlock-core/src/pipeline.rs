//! 端到端流程：Idle → Scanning → Simulating → NoteWritten
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::cleaner::{clean, CleanReport};
use crate::engine::{self, now_iso8601, SimulationReport};
use crate::error::{Result, SimError};
use crate::keygen::{generate_key, generate_simulation_id, key_prefix};
use crate::note::{render_note, write_note, NoteContext};
use crate::options::{SimMode, TargetSpec};
use crate::scan::FileScanner;
use crate::types::{Phase, SimObserver, SimulationRun};

/// 运行汇总（可序列化为 JSON 报告；不包含完整密钥）
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub simulation_id: String,
    pub mode: SimMode,
    pub target: PathBuf,
    pub scanned: usize,
    pub processed: usize,
    pub failed: usize,
    pub key_prefix: String,
    /// Observe 模式或写入失败时为 None
    pub note_path: Option<PathBuf>,
    #[serde(skip)]
    pub note_text: String,
}

/// 执行一次完整模拟
/// - 阶段按顺序推进，不会跳过扫描直接模拟
/// - 单文件失败只计入 `failed`；勒索说明写入失败也不会使运行失败
/// - Observe 模式只渲染说明，不落盘
pub fn simulate<R: Rng + ?Sized>(spec: &TargetSpec, rng: &mut R, observer: &mut dyn SimObserver) -> Result<RunSummary> {
    observer.on_phase(Phase::Idle);
    // 根目录可能在构造规格之后被移除；此时在触碰文件系统前中止
    if !spec.root().is_dir() {
        return Err(SimError::config(spec.root(), "target directory disappeared"));
    }
    let simulation_id = generate_simulation_id(rng);
    let key = generate_key(rng);
    info!(simulation_id = %simulation_id, root = %spec.root().display(), mode = ?spec.mode(), "simulation started");

    observer.on_phase(Phase::Scanning);
    let files = FileScanner::new(spec.root(), spec.extensions()).scan(observer);

    observer.on_phase(Phase::Simulating);
    let mut sim = SimulationRun::new(simulation_id, key, files, spec.mode());
    let report: SimulationReport = engine::run(&mut sim, observer);

    let note_text = render_note(&NoteContext {
        simulation_id: sim.simulation_id(),
        generated_key: sim.generated_key(),
        affected: sim.affected_files().len(),
        processed: sim.processed_count(),
        mode: sim.mode(),
        timestamp: &now_iso8601(),
    });
    let note_path = match sim.mode() {
        SimMode::Observe => None,
        SimMode::Write => write_note(spec.root(), &note_text).ok(),
    };
    observer.on_phase(Phase::NoteWritten);

    Ok(RunSummary {
        simulation_id: sim.simulation_id().to_string(),
        mode: sim.mode(),
        target: spec.root().to_path_buf(),
        scanned: sim.affected_files().len(),
        processed: sim.processed_count(),
        failed: report.failed(),
        key_prefix: key_prefix(sim.generated_key()),
        note_path,
        note_text,
    })
}

/// 清理入口：与模拟相互独立，任何模式下都可安全调用
pub fn cleanup(spec: &TargetSpec, observer: &mut dyn SimObserver) -> CleanReport {
    let report = clean(spec.root(), observer);
    observer.on_phase(Phase::Cleaned);
    report
}
