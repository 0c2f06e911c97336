// main.rs
// 功能：
// 1. 读取 gitstamp.toml（时区 + 源目录 + 模式）
// 2. 收集命令行给出的文档（目录递归）
// 3. 逐篇合并 front matter / git 历史 / 文件时间，输出 date 与 updated

use env_logger::Env;
use log::{error, info};

use std::path::PathBuf;
use clap::{Parser, ValueEnum};

use gitstamp::config;
use gitstamp::pipeline::{DocumentReport, Pipeline};
use gitstamp::{GitOracle, LogReporter, ResolveMode};

#[derive(Parser)]
#[command(name = "gitstamp", version, about)]
struct Args {
    /// gitstamp.toml 路径
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的时区
    #[arg(long)]
    timezone: Option<String>,

    /// 覆盖配置中的模式
    #[arg(long, value_enum)]
    mode: Option<ResolveMode>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// 文档或目录
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    // 1️⃣ 初始化
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (config_path, explicit) = match &args.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(config::DEFAULT_CONFIG), false),
    };
    let mut cfg = config::load(&config_path, explicit)?;
    if let Some(tz) = args.timezone {
        cfg.timezone = tz;
    }
    if let Some(mode) = args.mode {
        cfg.mode = mode;
    }
    cfg.finalize()?;

    // 2️⃣ 收集文档
    let oracle = GitOracle::new(cfg.git.clone());
    let reporter = LogReporter;
    let pipeline = Pipeline::new(&cfg, &oracle, &reporter);
    let docs = pipeline.collect_documents(&args.paths);
    info!("Resolving {} documents (timezone {})", docs.len(), cfg.timezone);

    // 3️⃣ 逐篇处理，单篇失败不影响其他文档
    let mut failed = 0usize;
    for doc in &docs {
        match pipeline.process(doc) {
            Ok(report) => print_report(&report, args.format)?,
            Err(e) => {
                error!("{} ({:?})", e, e.class());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, docs.len());
    }
    Ok(())
}

fn print_report(report: &DocumentReport, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => println!("{}\t{}\t{}", report.path.display(), report.date, report.updated),
        Format::Json => println!("{}", serde_json::to_string(report)?),
    }
    Ok(())
}
