//! GhostLock 勒索软件模拟核心库
//!
//! 设计要点：
//! - 不做任何真实加密，也从不打开原文件；Write 模式只在原文件旁创建 `.encrypted.sim` 标记文件。
//! - 扫描不跟随符号链接目录；单个目录/文件的失败只告警，不中止整个运行。
//! - 标记后缀与说明文件名是清理的依据，必须保持逐字节一致。
//! - 单线程、同步执行；进度通过 `SimObserver` 回调报告，日志使用 tracing。

mod error;
mod options;
mod types;
mod matcher;
mod keygen;
mod profile;
mod scan;
mod engine;
mod cleaner;
mod note;
mod pipeline;

pub use error::{Result, SimError};
pub use options::{normalize_extension, SimMode, TargetSpec, DEFAULT_EXTENSIONS};
pub use types::{AffectedFile, NoopObserver, Phase, SimObserver, SimulationRun};
pub use matcher::{extension_of, is_simulation_artifact, matches, ExtensionMatcher, MARKER_SUFFIX, NOTE_FILE_NAME};
pub use keygen::{generate_key, generate_simulation_id, key_prefix};
pub use profile::{load_profile, Profile};
pub use scan::{scan, FileScanner, ScanIter};
pub use engine::{marker_path, marker_payload, run, simulate_files, FileOutcome, SimulationReport};
pub use cleaner::{clean, CleanFailure, CleanReport};
pub use note::{render_note, write_note, NoteContext};
pub use pipeline::{cleanup, simulate, RunSummary};
