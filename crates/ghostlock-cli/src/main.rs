use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghostlock_core::{cleanup, load_profile, simulate, Phase, Profile, SimMode, SimObserver, TargetSpec, DEFAULT_EXTENSIONS};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

mod console;

use console::{confirm, print_banner, ConsoleProgress};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "ghostlock", version, about = "GhostLock ransomware simulator for security-awareness demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描目标目录并执行模拟加密
    Run {
        /// 目标目录（必须存在）
        #[arg(long)]
        target_dir: PathBuf,

        /// 运行模式：observe（仅记录，默认）或 write（创建 .encrypted.sim 标记文件）
        #[arg(long, value_parser = ["observe", "write"])]
        mode: Option<String>,

        /// 覆盖目标扩展名集合，例如 --extensions .txt .docx
        #[arg(long, num_args = 1..)]
        extensions: Option<Vec<String>>,

        /// 配置文件（TOML）
        #[arg(long)]
        profile: Option<PathBuf>,

        /// 额外写入的日志文件
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// 将运行汇总写为 JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// 跳过所有确认提示
        #[arg(long)]
        yes: bool,

        /// write 模式结束后直接清理产物
        #[arg(long)]
        clean_after: bool,

        /// 不显示横幅
        #[arg(long)]
        no_banner: bool,
    },
    /// 删除之前运行留下的模拟产物
    Clean {
        /// 目标目录（必须存在）
        #[arg(long)]
        target_dir: PathBuf,

        /// 额外写入的日志文件
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// 跳过确认提示
        #[arg(long)]
        yes: bool,

        /// 不显示横幅
        #[arg(long)]
        no_banner: bool,
    },
}

/// 合并命令行与配置文件后的运行参数（命令行优先，其次配置文件，最后默认值）
#[derive(Debug, PartialEq)]
struct RunSettings {
    mode: SimMode,
    extensions: Vec<String>,
    log_file: Option<PathBuf>,
}

fn resolve_settings(
    mode: Option<&str>,
    extensions: Option<Vec<String>>,
    log_file: Option<PathBuf>,
    profile: Profile,
) -> RunSettings {
    RunSettings {
        mode: mode.and_then(SimMode::parse).or(profile.mode).unwrap_or_default(),
        extensions: extensions
            .or(profile.extensions)
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()),
        log_file: log_file.or(profile.log_file),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { target_dir, mode, extensions, profile, log_file, report, yes, clean_after, no_banner } => {
            let profile = match &profile {
                Some(p) => load_profile(p).context("load profile")?,
                None => Profile::default(),
            };
            let settings = resolve_settings(mode.as_deref(), extensions, log_file, profile);
            let subscriber = build_subscriber(settings.log_file.as_deref())?;
            // 日志 sink 只在本次调用内生效
            tracing::subscriber::with_default(subscriber, || {
                if !no_banner {
                    print_banner();
                }
                let spec = TargetSpec::new(&target_dir, &settings.extensions, settings.mode).context("invalid target")?;
                run_simulation(&spec, report.as_deref(), yes, clean_after)
            })
        }
        Commands::Clean { target_dir, log_file, yes, no_banner } => {
            let subscriber = build_subscriber(log_file.as_deref())?;
            tracing::subscriber::with_default(subscriber, || {
                if !no_banner {
                    print_banner();
                }
                let spec = TargetSpec::with_defaults(&target_dir, SimMode::default()).context("invalid target")?;
                run_cleanup(&spec, yes)
            })
        }
    }
}

fn run_simulation(spec: &TargetSpec, report: Option<&Path>, yes: bool, clean_after: bool) -> Result<()> {
    println!("\n[!] IMPORTANT NOTICE:");
    println!("    This is a simulation tool. No actual files will be permanently modified.");
    println!("    Target directory: {}", spec.root().display());
    println!("    Mode: {}", spec.mode().describe());
    println!();
    if !yes && !confirm("[?] Do you understand this is a simulation and wish to proceed?") {
        println!("Simulation aborted.");
        return Ok(());
    }

    let mut progress = ConsoleProgress::default();
    let summary = simulate(spec, &mut rand::rng(), &mut progress).context("simulation failed")?;
    println!("{}", summary.note_text);

    if let Some(path) = report {
        match write_report(path, &summary) {
            Ok(()) => info!(path = %path.display(), "report written"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write report"),
        }
    }

    let mut removed = 0;
    if spec.mode() == SimMode::Write
        && (clean_after || (!yes && confirm("\nDo you want to clean up simulation artifacts?")))
    {
        removed = cleanup(spec, &mut progress).removed;
    }

    progress.on_phase(Phase::Terminal);
    info!(
        scanned = summary.scanned,
        processed = summary.processed,
        failed = summary.failed,
        removed,
        warnings = progress.warnings,
        "run finished"
    );
    println!(
        "Summary: scanned={} processed={} failed={} removed={}",
        summary.scanned, summary.processed, summary.failed, removed
    );
    Ok(())
}

fn run_cleanup(spec: &TargetSpec, yes: bool) -> Result<()> {
    println!("\n[!] Cleaning up simulation artifacts in {}", spec.root().display());
    if !yes && !confirm("[?] Remove all .encrypted.sim files and the ransom note?") {
        println!("Cleanup aborted.");
        return Ok(());
    }
    let mut progress = ConsoleProgress::default();
    let report = cleanup(spec, &mut progress);
    progress.on_phase(Phase::Terminal);
    println!("Summary: removed={} failed={}", report.removed, report.failures.len());
    Ok(())
}

/// 以缓冲方式写 JSON 汇总
fn write_report(path: &Path, summary: &ghostlock_core::RunSummary) -> Result<()> {
    let mut out = BufWriter::new(File::create(path).context("create report file")?);
    serde_json::to_writer_pretty(&mut out, summary).context("serialize report")?;
    out.flush().context("flush report")?;
    Ok(())
}

/// 构建本次调用的日志 sink：控制台（stderr）+ 可选日志文件（无 ANSI 颜色，追加写）
/// 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
fn build_subscriber(log_file: Option<&Path>) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{fmt, EnvFilter, Registry};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    Ok(Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer))
}
