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

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::domain::models::dataset::read_dataset;
use crate::domain::models::link::{LinkKind, LinkRef};
use crate::pipeline::store::ArtifactStore;
use crate::utils::url_utils::extract_all_links;

/// 验证运行摘要
#[derive(Debug, Default, Serialize)]
pub struct VerifySummary {
    /// CSV总行数
    pub total_rows: usize,
    /// 含外部引用的行数
    pub rows_with_links: usize,
    /// 发现的链接总数（按行计）
    pub total_links: usize,
    /// 去重后的链接数
    pub unique_links: usize,
    /// PDF链接数
    pub pdf_links: usize,
    /// 非PDF链接数
    pub non_pdf_links: usize,
    /// 磁盘上的产物文件数
    pub scraped_files: usize,
    /// 全部PDF链接（含归属）
    #[serde(skip)]
    pub pdf_link_list: Vec<LinkRef>,
    /// 全部非PDF链接（含归属）
    #[serde(skip)]
    pub non_pdf_link_list: Vec<LinkRef>,
    /// 去重排序后的全部链接
    #[serde(skip)]
    pub all_links: BTreeSet<String>,
}

/// 验证流水线
///
/// 重新扫描数据集CSV中的全部外部链接，与磁盘上的产物交叉
/// 核对，写出 `_verification_report.txt` 并在日志中输出
/// 人类可读的汇总。
pub fn run(csv_path: &Path, scraped_dir: &Path) -> Result<VerifySummary> {
    let store = ArtifactStore::open(scraped_dir)?;
    let rows = read_dataset(csv_path)?;

    let mut summary = VerifySummary::default();

    for row in &rows {
        summary.total_rows += 1;
        let links = extract_all_links(&row.link_text());
        if links.is_empty() {
            continue;
        }

        summary.rows_with_links += 1;
        summary.total_links += links.len();

        for link in links {
            summary.all_links.insert(link.clone());
            let link_ref = LinkRef {
                project: row.project_or_unknown().to_string(),
                model: row.model_or_unknown().to_string(),
                url: link.clone(),
            };
            match LinkKind::from_url(&link) {
                LinkKind::Pdf => {
                    summary.pdf_links += 1;
                    summary.pdf_link_list.push(link_ref);
                }
                LinkKind::Web => {
                    summary.non_pdf_links += 1;
                    summary.non_pdf_link_list.push(link_ref);
                }
            }
        }
    }

    summary.unique_links = summary.all_links.len();

    let artifact_names = store.artifact_names()?;
    summary.scraped_files = artifact_names.len();

    log_summary(&store, &summary, &artifact_names)?;
    write_report(&store, &summary)?;
    store.write_json("_run_summary.json", &summary)?;

    Ok(summary)
}

fn log_summary(
    store: &ArtifactStore,
    summary: &VerifySummary,
    artifact_names: &[String],
) -> Result<()> {
    info!("Total rows in CSV: {}", summary.total_rows);
    info!("Rows with external references: {}", summary.rows_with_links);
    info!("Total external links found: {}", summary.total_links);
    info!("Unique links: {}", summary.unique_links);
    info!("PDF links found: {}", summary.pdf_links);
    info!("Non-PDF links found: {}", summary.non_pdf_links);
    info!("Scraped text files created: {}", summary.scraped_files);

    for item in &summary.pdf_link_list {
        info!("PDF link: {} (project {}, model {})", item.url, item.project, item.model);
    }

    // 非PDF链接只展示前20个
    for (i, item) in summary.non_pdf_link_list.iter().take(20).enumerate() {
        info!(
            "{}. Project: {}, Model: {}, URL: {}",
            i + 1,
            item.project,
            item.model,
            item.url
        );
    }
    if summary.non_pdf_link_list.len() > 20 {
        info!(
            "... and {} more non-PDF links",
            summary.non_pdf_link_list.len() - 20
        );
    }

    for name in artifact_names {
        let size = store.size_of(name)?;
        info!("  {} ({} bytes)", name, size);
    }

    Ok(())
}

/// 写出详细验证报告
fn write_report(store: &ArtifactStore, summary: &VerifySummary) -> Result<()> {
    let mut out = String::from("VERIFICATION REPORT\n");
    out.push_str(&"=".repeat(80));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Generated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Total rows: {}\n", summary.total_rows));
    out.push_str(&format!("Rows with links: {}\n", summary.rows_with_links));
    out.push_str(&format!("Total links: {}\n", summary.total_links));
    out.push_str(&format!("PDF links: {}\n", summary.pdf_links));
    out.push_str(&format!("Non-PDF links: {}\n", summary.non_pdf_links));
    out.push_str(&format!("Scraped files: {}\n\n", summary.scraped_files));
    out.push_str("ALL LINKS FOUND\n");
    out.push_str(&"=".repeat(80));
    out.push_str("\n\n");
    for link in &summary.all_links {
        out.push_str(link);
        out.push('\n');
    }
    store.write_text("_verification_report.txt", &out)
}
