//! 模拟产物清理
//!
//! 递归删除 `*.encrypted.sim` 与 `SIMULATION_RANSOM_NOTE.txt`。
//! 单个文件删除失败只记录并跳过；重复执行是幂等的（第二次删除数为 0）。
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::error::SimError;
use crate::matcher::is_simulation_artifact;
use crate::types::SimObserver;

/// 删除失败记录
#[derive(Debug)]
pub struct CleanFailure {
    pub path: PathBuf,
    pub error: SimError,
}

/// 清理结果
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: usize,
    pub failures: Vec<CleanFailure>,
}

/// 清理根目录下的所有模拟产物，返回删除数量与失败列表
pub fn clean(root: &Path, observer: &mut dyn SimObserver) -> CleanReport {
    let mut report = CleanReport::default();
    info!(root = %root.display(), "cleaning up simulation artifacts");

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let err = SimError::from(err);
                warn!(path = %err.path().display(), error = %err, "skipping unreadable entry");
                observer.on_warning(&err);
                continue;
            }
        };
        // 目录即使名字匹配也不删除；符号链接只删除链接本身
        if entry.file_type().is_dir() {
            continue;
        }
        if !is_simulation_artifact(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let path = entry.into_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                report.removed += 1;
                observer.on_artifact_removed(&path, report.removed);
            }
            Err(source) => {
                let err = SimError::IoDelete { path: path.clone(), source };
                error!(path = %path.display(), error = %err, "error removing artifact");
                observer.on_warning(&err);
                report.failures.push(CleanFailure { path, error: err });
            }
        }
    }

    info!(removed = report.removed, failed = report.failures.len(), "cleanup complete");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::NOTE_FILE_NAME;
    use crate::types::NoopObserver;
    use std::fs;

    #[test]
    fn removes_markers_and_note_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("a.txt.encrypted.sim"), b"m").unwrap();
        fs::write(dir.path().join("sub/b.pdf.encrypted.sim"), b"m").unwrap();
        fs::write(dir.path().join(NOTE_FILE_NAME), b"n").unwrap();
        fs::write(dir.path().join("notes.sim"), b"keep").unwrap();

        let report = clean(dir.path(), &mut NoopObserver);
        assert_eq!(report.removed, 3);
        assert!(report.failures.is_empty());
        assert!(dir.path().join("a.txt").exists());
        assert!(dir.path().join("notes.sim").exists());
        assert!(!dir.path().join("sub/b.pdf.encrypted.sim").exists());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.png.encrypted.sim"), b"m").unwrap();
        assert_eq!(clean(dir.path(), &mut NoopObserver).removed, 1);
        let again = clean(dir.path(), &mut NoopObserver);
        assert_eq!(again.removed, 0);
        assert!(again.failures.is_empty());
    }

    #[test]
    fn directories_named_like_artifacts_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().join("weird.encrypted.sim");
        fs::create_dir(&d).unwrap();
        fs::write(d.join("inner.txt"), b"i").unwrap();
        assert_eq!(clean(dir.path(), &mut NoopObserver).removed, 0);
        assert!(d.join("inner.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_removal_is_recorded_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let stuck = locked.join("a.txt.encrypted.sim");
        fs::write(&stuck, b"m").unwrap();
        fs::write(dir.path().join("b.txt.encrypted.sim"), b"m").unwrap();
        fs::write(dir.path().join(NOTE_FILE_NAME), b"n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // root 用户无视权限位，此时删除仍会成功
        let canary = locked.join("canary");
        let writable = fs::write(&canary, b"c").is_ok();
        if writable {
            fs::remove_file(&canary).unwrap();
        }

        let report = clean(dir.path(), &mut NoopObserver);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if writable {
            assert_eq!(report.removed, 3);
            assert!(report.failures.is_empty());
        } else {
            assert_eq!(report.removed, 2);
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].path, stuck);
            assert!(matches!(report.failures[0].error, SimError::IoDelete { .. }));
            assert!(stuck.exists());
            assert!(!dir.path().join(NOTE_FILE_NAME).exists());
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_artifact_removes_link_not_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.txt");
        fs::write(&target, b"r").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("real.txt.encrypted.sim")).unwrap();
        assert_eq!(clean(dir.path(), &mut NoopObserver).removed, 1);
        assert_eq!(fs::read(&target).unwrap(), b"r");
    }
}
