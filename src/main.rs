// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use refscrape::config::settings::Settings;
use refscrape::engines::http_engine::HttpEngine;
use refscrape::pipeline::clean::CleanPass;
use refscrape::pipeline::link_scrape::LinkScrapePipeline;
use refscrape::pipeline::pdf_scrape::PdfScrapePipeline;
use refscrape::pipeline::{audit, clean, verify};
use refscrape::utils::telemetry;

/// 数据集外部引用抓取工具链
#[derive(Parser)]
#[command(name = "refscrape", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 从数据集CSV抓取PDF引用并生成文本产物
    Pdfs {
        /// 数据集CSV路径
        #[arg(long)]
        csv: Option<PathBuf>,
        /// 产物输出目录
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// 抓取附加链接列表（每行一个URL，`#` 为注释）
    Links {
        /// 链接列表文件
        #[arg(long, default_value = "links.txt")]
        list: PathBuf,
        /// 产物输出目录
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// 交叉核对数据集链接与磁盘产物并生成验证报告
    Verify {
        /// 数据集CSV路径
        #[arg(long)]
        csv: Option<PathBuf>,
        /// 抓取产物目录
        #[arg(long)]
        scraped: Option<PathBuf>,
    },
    /// 检查网页产物质量，可选修复GitHub界面外壳
    Audit {
        /// 链接产物目录
        #[arg(long)]
        dir: Option<PathBuf>,
        /// 把GitHub界面外壳替换为raw原始文件内容
        #[arg(long)]
        fix_github: bool,
    },
    /// 对网页产物应用结构化清理
    Clean {
        /// 链接产物目录
        #[arg(long)]
        dir: Option<PathBuf>,
        /// 备份目录
        #[arg(long)]
        backup: Option<PathBuf>,
        /// 清理阶段: html, github, nav, polish, substance, all
        #[arg(long, default_value = "all")]
        pass: CleanPass,
    },
}

/// 主函数
///
/// 应用程序入口点，负责初始化配置与日志并分发子命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting refscrape...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    let engine = HttpEngine;

    match cli.command {
        Command::Pdfs { csv, out } => {
            let csv = csv.unwrap_or_else(|| settings.paths.csv_path.clone());
            let out = out.unwrap_or_else(|| settings.paths.output_dir.clone());
            let summary = PdfScrapePipeline::new(&engine, &settings)
                .run(&csv, &out)
                .await?;
            info!(
                "PDF scrape finished: {} ok, {} failed",
                summary.successful, summary.failed
            );
        }
        Command::Links { list, out } => {
            let out = out.unwrap_or_else(|| settings.links_dir());
            let summary = LinkScrapePipeline::new(&engine, &settings)
                .run(&list, &out)
                .await?;
            info!(
                "Link scrape finished: {} ok, {} failed, {} skipped",
                summary.successful, summary.failed, summary.skipped
            );
        }
        Command::Verify { csv, scraped } => {
            let csv = csv.unwrap_or_else(|| settings.paths.csv_path.clone());
            let scraped = scraped.unwrap_or_else(|| settings.paths.output_dir.clone());
            let summary = verify::run(&csv, &scraped)?;
            info!(
                "Verification finished: {} links, {} artifacts",
                summary.total_links, summary.scraped_files
            );
        }
        Command::Audit { dir, fix_github } => {
            let dir = dir.unwrap_or_else(|| settings.links_dir());
            let summary = audit::AuditPipeline::new(&engine, &settings)
                .run(&dir, fix_github)
                .await?;
            info!(
                "Audit finished: {} files, {} fixed",
                summary.total(),
                summary.fixed
            );
        }
        Command::Clean { dir, backup, pass } => {
            let dir = dir.unwrap_or_else(|| settings.links_dir());
            let backup = backup.unwrap_or_else(|| settings.backup_dir());
            let summary = clean::run(&dir, &backup, pass)?;
            info!(
                "Clean finished: {} files, {} changed",
                summary.files_processed, summary.files_changed
            );
        }
    }

    Ok(())
}
