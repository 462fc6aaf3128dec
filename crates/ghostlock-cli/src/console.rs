//! 终端展示：横幅、单行进度动画、确认提示
use ghostlock_core::{AffectedFile, Phase, SimError, SimObserver};
use std::io::{self, BufRead, Write};
use std::path::Path;

const SCAN_FRAMES: [&str; 4] = ["(>_>)", "(<_<)", "(^_^)", "(v_v)"];
const ENCRYPT_FRAMES: [&str; 4] = ["(>_<)", "(x_x)", "(o_o)", "(0_0)"];
const CLEAR_WIDTH: usize = 50;

const BANNER: &str = r"
   .-.      ____ _               _   _               _
  ( o o)   / ___| |__   ___  ___| |_| |    ___   ___| | __
  |   O   | |  _| '_ \ / _ \/ __| __| |   / _ \ / __| |/ /
  '~~~'   | |_| | | | | (_) \__ \ |_| |__| (_) | (__|   <
           \____|_| |_|\___/|___/\__|_____\___/ \___|_|\_\

    [*] Ransomware Simulator For Security Awareness
    [*] Educational Purposes Only - No Real Encryption Performed
";

pub fn print_banner() {
    println!("{BANNER}");
}

/// 进度行：每 3 个匹配（扫描）或每 5 个文件（模拟）刷新一帧
pub fn scan_frame(matched: usize) -> Option<String> {
    (matched % 3 == 0).then(|| format!("{} Scanning... {matched} files found", SCAN_FRAMES[(matched / 3) % SCAN_FRAMES.len()]))
}

pub fn encrypt_frame(index: usize, total: usize) -> Option<String> {
    (index % 5 == 0).then(|| format!("{} Encrypting files... {index}/{total}", ENCRYPT_FRAMES[index % ENCRYPT_FRAMES.len()]))
}

/// 写到 stderr 的进度观察者；stdout 留给勒索说明
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    pub warnings: usize,
    pub removed: usize,
    dirty: bool,
}

impl ConsoleProgress {
    fn draw(&mut self, line: &str) {
        let mut err = io::stderr().lock();
        let _ = write!(err, "\r{line:<CLEAR_WIDTH$}");
        let _ = err.flush();
        self.dirty = true;
    }

    fn clear(&mut self) {
        if self.dirty {
            let mut err = io::stderr().lock();
            let _ = write!(err, "\r{}\r", " ".repeat(CLEAR_WIDTH));
            let _ = err.flush();
            self.dirty = false;
        }
    }
}

impl SimObserver for ConsoleProgress {
    fn on_phase(&mut self, phase: Phase) {
        self.clear();
        match phase {
            Phase::Scanning => eprintln!("\nGhostLock scanning for files...\n"),
            Phase::Simulating => eprintln!("\nGhostLock encryption in progress...\n"),
            Phase::NoteWritten => eprintln!("\nSimulation complete.\n"),
            Phase::Cleaned => eprintln!("Cleanup finished: {} artifacts removed.", self.removed),
            Phase::Idle | Phase::Terminal => {}
        }
    }

    fn on_file_matched(&mut self, _file: &AffectedFile, matched_so_far: usize) {
        if let Some(line) = scan_frame(matched_so_far) {
            self.draw(&line);
        }
    }

    fn on_file_processed(&mut self, index: usize, total: usize, _file: &AffectedFile) {
        if let Some(line) = encrypt_frame(index, total) {
            self.draw(&line);
        }
    }

    fn on_artifact_removed(&mut self, _path: &Path, removed_so_far: usize) {
        self.removed = removed_so_far;
    }

    fn on_warning(&mut self, _warning: &SimError) {
        self.warnings += 1;
    }
}

/// 只有 yes / y（大小写不敏感）视为同意
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

/// 读取一行回答；stdin 关闭或出错视为拒绝
pub fn confirm(question: &str) -> bool {
    print!("{question} (yes/no): ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}
