//! 程序入口：初始化日志、解析命令行，执行翻译 / 扁平化 / 基准测试

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use samadhan_fanyi::model::flatten::preview_of;
use samadhan_fanyi::model::performance::run_performance_suite;
use samadhan_fanyi::utils::fs::write_json_file;
use samadhan_fanyi::{BhashiniClient, Config, Document, TextFilter, Translator};

#[derive(Debug, Parser)]
#[command(name = "samadhan_fanyi", version, about = "结构保持的 JSON 内容翻译工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 通过 Bhashini 翻译 JSON 文件中的全部字符串
    Translate {
        input: PathBuf,
        /// 目标语言代码，如 hi / ta / gu
        #[arg(short, long)]
        lang: String,
        /// 源语言代码（默认取 TRANSLATE_SOURCE_LANG 或 en）
        #[arg(short, long)]
        source: Option<String>,
        /// 仅翻译 JSONPath 命中的节点
        #[arg(long)]
        scope: Option<String>,
        /// 输出文件；缺省时打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 保存服务端原始响应
        #[arg(long)]
        raw_response: Option<PathBuf>,
        /// 关闭跳过规则，所有字符串都送翻
        #[arg(long)]
        no_skip_filter: bool,
        /// 请求超时（秒）
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
    /// 列出所有字符串叶子及其路径
    Flatten { input: PathBuf },
    /// 打印 JSONPath 命中的第一个节点（可用于预览 --scope 的范围）
    Extract { input: PathBuf, path: String },
    /// 运行扁平化/回写性能测试
    Bench {
        #[arg(long, default_value_t = 4)]
        depth: usize,
        #[arg(long, default_value_t = 20)]
        width: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("samadhan_fanyi=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Translate {
            input,
            lang,
            source,
            scope,
            output,
            raw_response,
            no_skip_filter,
            timeout,
        } => {
            let mut config = Config::from_env().context("加载配置失败")?;
            if let Some(source) = source {
                config.source_lang = source;
            }
            if no_skip_filter {
                config.skip_filter = false;
            }
            if let Some(secs) = timeout {
                config.timeout = Duration::from_secs(secs);
            }

            let mut doc = Document::default();
            doc.load_file(&input).with_context(|| format!("读取 {} 失败", input.display()))?;
            let dom = doc.dom()?;
            let client = BhashiniClient::from_config(&config)?;
            let translator = Translator::from_config(client, &config);

            let start = Instant::now();
            let outcome = match scope.as_deref() {
                Some(scope) => translator.translate_scoped(dom, scope, &lang).await,
                None => translator.translate_json_with_raw_response(dom, &lang).await,
            }
            .inspect_err(|e| tracing::error!("翻译失败: {}", e))?;
            tracing::info!(
                "翻译 {} 完成，耗时: {:.1}s，统计: {:?}",
                input.display(),
                start.elapsed().as_secs_f32(),
                outcome.stats
            );

            if let Some(raw_path) = raw_response {
                write_json_file(&raw_path, &outcome.raw_response)?;
            }
            doc.replace_dom(outcome.translated);
            match output {
                Some(out) => {
                    doc.save_to_file(&out)?;
                    tracing::info!("译文已写入 {}", out.display());
                }
                None => println!("{}", serde_json::to_string_pretty(doc.dom()?)?),
            }
        }
        Command::Flatten { input } => {
            let mut doc = Document::default();
            doc.load_file(&input).with_context(|| format!("读取 {} 失败", input.display()))?;
            let filter = TextFilter::default();
            for entry in &doc.entries {
                let mark = if filter.should_translate(&entry.text) { "" } else { "\t(skip)" };
                println!("{}\t{}{}", entry.path, preview_of(&entry.text), mark);
            }
        }
        Command::Extract { input, path } => {
            let mut doc = Document::default();
            doc.load_file(&input).with_context(|| format!("读取 {} 失败", input.display()))?;
            println!("{}", doc.extract_subtree_pretty(&path)?);
        }
        Command::Bench { depth, width } => {
            for r in run_performance_suite(&[(depth, width)]) {
                let status = if r.success { "ok" } else { "FAILED" };
                println!("{:<24} {:>6}ms  {:<6} {}", r.operation, r.duration_ms, status, r.details);
            }
        }
    }

    Ok(())
}
