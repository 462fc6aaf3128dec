//! 错误类型（模块）
//!
//! 只有 `Configuration` 是致命错误：它发生在任何扫描之前。
//! 其余三类都以单个文件为粒度被捕获、记录并跳过。
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 核心库统一的 Result 别名
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// 目标目录缺失、不是目录，或配置文件无效
    #[error("configuration error for {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    /// 扫描过程中目录不可读
    #[error("cannot read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 标记文件、勒索说明或报告写入失败
    #[error("cannot write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 清理时删除单个产物失败
    #[error("cannot remove {path}: {source}")]
    IoDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SimError {
    pub(crate) fn config(path: &Path, reason: impl Into<String>) -> Self {
        Self::Configuration { path: path.to_path_buf(), reason: reason.into() }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::IoWrite { path: path.to_path_buf(), source }
    }

    /// 是否应中止整个运行
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// 出错的路径（用于日志字段）
    pub fn path(&self) -> &Path {
        match self {
            Self::Configuration { path, .. }
            | Self::IoRead { path, .. }
            | Self::IoWrite { path, .. }
            | Self::IoDelete { path, .. } => path,
        }
    }
}

/// walkdir 的错误转换为 IoRead；没有底层 io::Error 的情况（如符号链接环）也归为读取失败
impl From<walkdir::Error> for SimError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let source = match err.into_io_error() {
            Some(io) => io,
            None => std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"),
        };
        Self::IoRead { path, source }
    }
}
