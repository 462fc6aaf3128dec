//! 扩展名匹配与模拟产物识别（纯函数）

/// 标记文件后缀（清理依赖此常量，必须逐字节一致）
pub const MARKER_SUFFIX: &str = ".encrypted.sim";
/// 勒索说明文件名（同上）
pub const NOTE_FILE_NAME: &str = "SIMULATION_RANSOM_NOTE.txt";

/// 提取扩展名（含点）；无扩展名返回空串
/// 前导点属于文件名本身：`.bashrc` 无扩展名，`file.` 的扩展名为 `.`
pub fn extension_of(file_name: &str) -> &str {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[stem_start..].rfind('.') {
        Some(i) => &file_name[stem_start + i..],
        None => "",
    }
}

/// 大小写不敏感的扩展名匹配器
#[derive(Debug, Clone)]
pub struct ExtensionMatcher<'a> {
    extensions: &'a std::collections::BTreeSet<String>,
}

impl<'a> ExtensionMatcher<'a> {
    /// `extensions` 需已归一化为小写（见 `normalize_extension`）
    pub fn new(extensions: &'a std::collections::BTreeSet<String>) -> Self {
        Self { extensions }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        matches(file_name, self.extensions)
    }
}

/// 判断文件名的扩展名（转小写后）是否在集合中
pub fn matches(file_name: &str, extensions: &std::collections::BTreeSet<String>) -> bool {
    extensions.contains(&extension_of(file_name).to_lowercase())
}

/// 清理用的固定后缀匹配：标记文件或勒索说明
pub fn is_simulation_artifact(file_name: &str) -> bool {
    file_name.ends_with(MARKER_SUFFIX) || file_name == NOTE_FILE_NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(extension_of("report.PDF"), ".PDF");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("..hidden.txt"), ".txt");
        assert_eq!(extension_of("file."), ".");
    }

    #[test]
    fn case_insensitive_membership() {
        let exts = set(&[".txt"]);
        let m = ExtensionMatcher::new(&exts);
        assert!(m.matches("a.txt"));
        assert!(m.matches("c.TXT"));
        assert!(!m.matches("b.bin"));
        assert!(!m.matches("txt"));
    }

    #[test]
    fn no_extension_only_with_explicit_empty_entry() {
        let without = set(&[".txt"]);
        assert!(!ExtensionMatcher::new(&without).matches("README"));
        let with = set(&[".txt", ""]);
        assert!(ExtensionMatcher::new(&with).matches("README"));
    }

    #[test]
    fn artifact_names() {
        assert!(is_simulation_artifact("a.txt.encrypted.sim"));
        assert!(is_simulation_artifact(NOTE_FILE_NAME));
        assert!(!is_simulation_artifact("simulation_ransom_note.txt"));
        assert!(!is_simulation_artifact("a.encrypted.sim.bak"));
    }

    proptest! {
        #[test]
        fn matching_ignores_case(stem in "[a-zA-Z0-9_]{1,12}", ext in "[a-zA-Z]{1,5}") {
            let exts = set(&[format!(".{}", ext.to_lowercase()).as_str()]);
            let m = ExtensionMatcher::new(&exts);
            let upper = format!("{stem}.{}", ext.to_uppercase());
            let lower = format!("{stem}.{}", ext.to_lowercase());
            prop_assert!(m.matches(&upper));
            prop_assert!(m.matches(&lower));
        }

        #[test]
        fn other_extensions_never_match(stem in "[a-z]{1,8}", ext in "[a-z]{1,4}") {
            prop_assume!(ext != "txt");
            let exts = set(&[".txt"]);
            let name = format!("{stem}.{ext}");
            prop_assert!(!ExtensionMatcher::new(&exts).matches(&name));
        }
    }
}
