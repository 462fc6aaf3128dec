//! 公共类型（对外暴露）
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::options::SimMode;

/// 受影响文件：由扫描器创建，引擎只读使用
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AffectedFile {
    path: PathBuf,
}

impl AffectedFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 单次端到端运行的阶段（顺序推进，不可跳过 Scanning）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning,
    Simulating,
    NoteWritten,
    Cleaned,
    Terminal,
}

/// 进度观察者：扫描、模拟、清理过程中的回调，默认全部为空实现
pub trait SimObserver {
    fn on_phase(&mut self, _phase: Phase) {}
    fn on_file_matched(&mut self, _file: &AffectedFile, _matched_so_far: usize) {}
    fn on_file_processed(&mut self, _index: usize, _total: usize, _file: &AffectedFile) {}
    fn on_artifact_removed(&mut self, _path: &Path, _removed_so_far: usize) {}
    fn on_warning(&mut self, _warning: &SimError) {}
}

/// 不做任何事的观察者
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// 一次模拟运行：进程内存活，不持久化（只有它在磁盘上的副作用会保留）
#[derive(Debug, Clone)]
pub struct SimulationRun {
    simulation_id: String,
    generated_key: String,
    affected_files: Vec<AffectedFile>,
    processed_count: usize,
    mode: SimMode,
}

impl SimulationRun {
    pub fn new(simulation_id: String, generated_key: String, affected_files: Vec<AffectedFile>, mode: SimMode) -> Self {
        Self { simulation_id, generated_key, affected_files, processed_count: 0, mode }
    }

    pub fn simulation_id(&self) -> &str { &self.simulation_id }
    /// 仅用于展示的随机串，从不参与任何加密运算
    pub fn generated_key(&self) -> &str { &self.generated_key }
    pub fn affected_files(&self) -> &[AffectedFile] { &self.affected_files }
    pub fn processed_count(&self) -> usize { self.processed_count }
    pub fn mode(&self) -> SimMode { self.mode }

    /// 只由引擎在模拟结束后写入
    pub(crate) fn set_processed_count(&mut self, processed: usize) {
        self.processed_count = processed;
    }
}
