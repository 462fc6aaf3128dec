//! 目录扫描：递归遍历根目录，按扩展名筛选受影响文件
//!
//! 遍历基于 walkdir，不跟随符号链接目录（避免链接环导致死循环）。
//! 不可读的目录只产生警告并跳过，不会中止整个扫描。
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::SimError;
use crate::matcher::{is_simulation_artifact, ExtensionMatcher};
use crate::types::{AffectedFile, SimObserver};

/// 文件扫描器
pub struct FileScanner<'a> {
    root: &'a Path,
    matcher: ExtensionMatcher<'a>,
}

impl<'a> FileScanner<'a> {
    pub fn new(root: &'a Path, extensions: &'a BTreeSet<String>) -> Self {
        Self { root, matcher: ExtensionMatcher::new(extensions) }
    }

    /// 惰性产出匹配文件（深度优先，目录先于其中的文件；同级顺序不保证）
    pub fn iter<'o>(&self, observer: &'o mut dyn SimObserver) -> ScanIter<'a, 'o> {
        ScanIter {
            walker: WalkDir::new(self.root).follow_links(false).into_iter(),
            matcher: self.matcher.clone(),
            observer,
            matched: 0,
        }
    }

    /// 物化为完整列表（默认行为）
    pub fn scan(&self, observer: &mut dyn SimObserver) -> Vec<AffectedFile> {
        info!(root = %self.root.display(), "scanning for files");
        let files: Vec<AffectedFile> = self.iter(observer).collect();
        info!(found = files.len(), "scan complete");
        files
    }
}

/// `scan(root, extensions)` 的便捷形式
pub fn scan(root: &Path, extensions: &BTreeSet<String>, observer: &mut dyn SimObserver) -> Vec<AffectedFile> {
    FileScanner::new(root, extensions).scan(observer)
}

/// 扫描迭代器（流式产出，可随时提前终止）
pub struct ScanIter<'a, 'o> {
    walker: walkdir::IntoIter,
    matcher: ExtensionMatcher<'a>,
    observer: &'o mut dyn SimObserver,
    matched: usize,
}

impl Iterator for ScanIter<'_, '_> {
    type Item = AffectedFile;

    fn next(&mut self) -> Option<AffectedFile> {
        loop {
            let entry = match self.walker.next()? {
                Ok(e) => e,
                Err(err) => {
                    let err = SimError::from(err);
                    warn!(path = %err.path().display(), error = %err, "skipping unreadable entry");
                    self.observer.on_warning(&err);
                    continue;
                }
            };
            if !is_candidate_file(&entry) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if is_simulation_artifact(&name) {
                debug!(path = %entry.path().display(), "ignoring simulation artifact");
                continue;
            }
            if !self.matcher.matches(&name) {
                continue;
            }
            let file = AffectedFile::new(entry.into_path());
            self.matched += 1;
            self.observer.on_file_matched(&file, self.matched);
            return Some(file);
        }
    }
}

/// 普通文件，或指向普通文件的符号链接（链接本身不被跟随进入目录）
fn is_candidate_file(entry: &DirEntry) -> bool {
    let ft = entry.file_type();
    if ft.is_file() {
        return true;
    }
    ft.is_symlink() && std::fs::metadata(entry.path()).map(|md| md.is_file()).unwrap_or(false)
}
