//! 模拟配置文件加载（TOML）
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SimError};
use crate::options::SimMode;

/// 配置文件结构；所有字段可选，命令行参数优先
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(default)]
    pub mode: Option<SimMode>,
    /// 目标扩展名，兼容 `extensions` 或 `ext` 字段名
    #[serde(default, alias = "ext")]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// 从 TOML 文件加载配置；读取或解析失败均视为配置错误
pub fn load_profile(path: &Path) -> Result<Profile> {
    let txt = std::fs::read_to_string(path).map_err(|e| SimError::config(path, e.to_string()))?;
    parse_profile(path, &txt)
}

pub(crate) fn parse_profile(path: &Path, txt: &str) -> Result<Profile> {
    toml::from_str(txt).map_err(|e| SimError::config(path, e.to_string()))
}
