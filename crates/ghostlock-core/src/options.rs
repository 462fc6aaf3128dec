//! 模拟选项：运行模式与目标规格（模块）
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SimError};

/// 默认目标扩展名
pub const DEFAULT_EXTENSIONS: &[&str] = &[".txt", ".docx", ".xlsx", ".pdf", ".jpg", ".png"];

/// 运行模式
/// - Observe：只记录“将要加密”的意图，不写任何文件（安全模式，默认）
/// - Write：在原文件旁边创建无害的 `.encrypted.sim` 标记文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimMode {
    #[default]
    Observe,
    Write,
}

impl SimMode {
    /// 解析 "observe" / "write"（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observe" => Some(Self::Observe),
            "write" => Some(Self::Write),
            _ => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Observe => "Safe mode (logging only)",
            Self::Write => "Simulation mode (creates marker files)",
        }
    }
}

/// 归一化单个扩展名：去空白、转小写、补前导点；显式的空串保留（匹配无扩展名文件）
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') { ext } else { format!(".{ext}") }
}

/// 目标规格：构造后不可变
#[derive(Debug, Clone)]
pub struct TargetSpec {
    root: PathBuf,
    extensions: BTreeSet<String>,
    mode: SimMode,
}

impl TargetSpec {
    /// 校验根目录存在且为目录，否则立即失败（在任何扫描之前）
    pub fn new<I, S>(root: &Path, extensions: I, mode: SimMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = std::path::absolute(root).map_err(|e| SimError::config(root, e.to_string()))?;
        match std::fs::metadata(&root) {
            Ok(md) if md.is_dir() => {}
            Ok(_) => return Err(SimError::config(&root, "not a directory")),
            Err(e) => return Err(SimError::config(&root, format!("target directory unavailable: {e}"))),
        }
        let extensions = extensions.into_iter().map(|e| normalize_extension(e.as_ref())).collect();
        Ok(Self { root, extensions, mode })
    }

    /// 使用默认扩展名集合
    pub fn with_defaults(root: &Path, mode: SimMode) -> Result<Self> {
        Self::new(root, DEFAULT_EXTENSIONS.iter().copied(), mode)
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn extensions(&self) -> &BTreeSet<String> { &self.extensions }
    pub fn mode(&self) -> SimMode { self.mode }
}
