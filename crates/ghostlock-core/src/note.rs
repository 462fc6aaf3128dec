//! 勒索说明（模拟）生成与写入
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::engine::write_artifact;
use crate::error::Result;
use crate::keygen::key_prefix;
use crate::matcher::NOTE_FILE_NAME;
use crate::options::SimMode;

const RULE_WIDTH: usize = 80;

const GHOSTS: &str = r"   .-.         .-.         .-.
  ( o o)      ( o o)      ( o o)
  |   O        |   O       |   O
  '~~~'        '~~~'       '~~~'";

/// 渲染说明所需的上下文
#[derive(Debug, Clone)]
pub struct NoteContext<'a> {
    pub simulation_id: &'a str,
    pub generated_key: &'a str,
    pub affected: usize,
    pub processed: usize,
    pub mode: SimMode,
    pub timestamp: &'a str,
}

/// 渲染说明文本；密钥只显示前 8 位
pub fn render_note(ctx: &NoteContext<'_>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mode_line = match ctx.mode {
        SimMode::Observe => format!("- {} files were only logged (safe mode, nothing written)", ctx.processed),
        SimMode::Write => format!("- {} harmless marker files were written next to the originals", ctx.processed),
    };
    format!(
        "\n{rule}\n{title:^width$}\n{rule}\n\n{GHOSTS}\n\n\
         THIS IS A SIMULATION - NO ACTUAL FILES HAVE BEEN ENCRYPTED\n\n\
         In a real ransomware attack:\n\
         - {affected} files would have been encrypted\n\
         - The encryption key would be: {key}\n\
         - A payment in cryptocurrency would be demanded\n\n\
         What this simulation did:\n\
         {mode_line}\n\n\
         This simulation has been run for educational and testing purposes only.\n\n\
         Timestamp: {ts}\n\
         GhostLock Simulation ID: {id}\n\n\
         {rule}\n",
        title = "GHOSTLOCK RANSOMWARE SIMULATION",
        width = RULE_WIDTH,
        affected = ctx.affected,
        key = key_prefix(ctx.generated_key),
        ts = ctx.timestamp,
        id = ctx.simulation_id,
    )
}

/// 写入 `<root>/SIMULATION_RANSOM_NOTE.txt`（替换旧文件；不跟随链接）
pub fn write_note(root: &Path, text: &str) -> Result<PathBuf> {
    let path = root.join(NOTE_FILE_NAME);
    match write_artifact(&path, text.as_bytes()) {
        Ok(()) => {
            info!(path = %path.display(), "ransom note saved");
            Ok(path)
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "error saving ransom note");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "Zx9QwErTyUiOpAsDfGhJkLzXcVbNm123";

    fn ctx(mode: SimMode) -> NoteContext<'static> {
        NoteContext {
            simulation_id: "GHOST-20240102030405-ABCD1234",
            generated_key: KEY,
            affected: 3,
            processed: 3,
            mode,
            timestamp: "2024-01-02T03:04:05.000000+00:00",
        }
    }

    #[test]
    fn note_shows_only_key_prefix() {
        let text = render_note(&ctx(SimMode::Write));
        assert!(text.contains("Zx9QwErT..."));
        assert!(!text.contains(KEY));
        assert!(text.contains("- 3 files would have been encrypted"));
        assert!(text.contains("NO ACTUAL FILES HAVE BEEN ENCRYPTED"));
        assert!(text.contains("GhostLock Simulation ID: GHOST-20240102030405-ABCD1234"));
        assert!(text.contains("Timestamp: 2024-01-02T03:04:05.000000+00:00"));
        assert!(text.contains("GHOSTLOCK RANSOMWARE SIMULATION"));
    }

    #[test]
    fn note_mentions_mode() {
        assert!(render_note(&ctx(SimMode::Observe)).contains("safe mode"));
        assert!(render_note(&ctx(SimMode::Write)).contains("marker files"));
    }

    #[test]
    fn write_overwrites_existing_note() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(NOTE_FILE_NAME), "old").unwrap();
        let path = write_note(dir.path(), "new").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_note_path_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let precious = dir.path().join("precious.docx");
        std::fs::write(&precious, "PRECIOUS").unwrap();
        std::os::unix::fs::symlink(&precious, dir.path().join(NOTE_FILE_NAME)).unwrap();

        assert!(write_note(dir.path(), "note").is_err());
        assert_eq!(std::fs::read_to_string(&precious).unwrap(), "PRECIOUS");
    }

    #[test]
    fn hard_linked_note_is_replaced_not_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let precious = dir.path().join("precious.docx");
        std::fs::write(&precious, "PRECIOUS").unwrap();
        std::fs::hard_link(&precious, dir.path().join(NOTE_FILE_NAME)).unwrap();

        let path = write_note(dir.path(), "note").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "note");
        assert_eq!(std::fs::read_to_string(&precious).unwrap(), "PRECIOUS");
    }

    #[test]
    fn write_into_missing_root_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_note(&dir.path().join("absent"), "x").unwrap_err();
        assert!(!err.is_fatal());
    }
}
