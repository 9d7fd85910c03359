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
use std::path::Path;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::domain::models::artifact::Artifact;
use crate::domain::models::dataset::{read_dataset, DatasetRow};
use crate::domain::models::link::LinkRef;
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::extract::pdf::extract_pdf_text;
use crate::pipeline::store::ArtifactStore;
use crate::utils::url_utils::{extract_pdf_links, sanitize_stem};

/// PDF抓取运行摘要
#[derive(Debug, Default, Serialize)]
pub struct PdfScrapeSummary {
    /// 处理的CSV行数
    pub total_rows: usize,
    /// 含PDF链接的行数
    pub rows_with_pdfs: usize,
    /// 发现的PDF链接总数
    pub total_pdf_links: usize,
    /// 成功下载并转换的数量（含已存在的产物）
    pub successful: usize,
    /// 下载或转换失败的数量
    pub failed: usize,
    /// 全部发现的链接（写入清单）
    #[serde(skip)]
    pub inventory: Vec<LinkRef>,
}

/// PDF抓取流水线
///
/// 读取数据集CSV，从自由文本列中提取PDF链接，逐个下载、
/// 转换为文本并写出带元数据头的产物，最后生成链接清单。
/// 逐行顺序处理，单项失败只记账不中断。
pub struct PdfScrapePipeline<'a> {
    engine: &'a dyn FetchEngine,
    settings: &'a Settings,
}

impl<'a> PdfScrapePipeline<'a> {
    pub fn new(engine: &'a dyn FetchEngine, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    /// 运行流水线
    pub async fn run(&self, csv_path: &Path, output_dir: &Path) -> Result<PdfScrapeSummary> {
        let store = ArtifactStore::open(output_dir)?;
        let rows = read_dataset(csv_path)?;

        info!("Processing {} dataset rows from {}", rows.len(), csv_path.display());

        let mut summary = PdfScrapeSummary::default();

        for row in &rows {
            summary.total_rows += 1;
            let links = extract_pdf_links(&row.link_text());
            if links.is_empty() {
                continue;
            }

            summary.rows_with_pdfs += 1;
            summary.total_pdf_links += links.len();

            let project = row.project_or_unknown();
            let model = row.model_or_unknown();
            info!("Project: {}, Model: {}, {} PDF link(s)", project, model, links.len());

            for link in links {
                summary.inventory.push(LinkRef {
                    project: project.to_string(),
                    model: model.to_string(),
                    url: link.clone(),
                });

                if self.scrape_one(&store, row, &link).await {
                    summary.successful += 1;
                } else {
                    summary.failed += 1;
                }
            }
        }

        self.write_inventory(&store, &summary)?;
        store.write_json("_run_summary.json", &summary)?;

        info!(
            "PDF scrape complete: {} rows, {} links, {} ok, {} failed",
            summary.total_rows, summary.total_pdf_links, summary.successful, summary.failed
        );

        Ok(summary)
    }

    /// 抓取单个PDF链接，返回是否成功
    async fn scrape_one(&self, store: &ArtifactStore, row: &DatasetRow, url: &str) -> bool {
        let name = format!(
            "{}_{}_{}.txt",
            row.project_or_unknown(),
            row.model_or_unknown(),
            sanitize_stem(url)
        );

        if store.exists(&name) {
            info!("Already exists: {}", name);
            return true;
        }

        let request = FetchRequest {
            url: url.to_string(),
            timeout: self.settings.http_timeout(),
            user_agent: self.settings.http.user_agent.clone(),
        };

        let response = match self.engine.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error downloading {}: {}", url, e);
                return false;
            }
        };

        if response.bytes.len() > self.settings.http.max_content_size {
            warn!(
                "Skipping {}: response of {} bytes exceeds limit",
                url,
                response.bytes.len()
            );
            return false;
        }

        let text = match extract_pdf_text(&response.bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract text from {}: {}", url, e);
                return false;
            }
        };

        let artifact = Artifact::for_pdf(
            url,
            row.project_or_unknown(),
            row.model_or_unknown(),
            text,
        );

        match store.write_artifact(&name, &artifact) {
            Ok(()) => {
                info!("Saved: {}", name);
                true
            }
            Err(e) => {
                warn!("Failed to write {}: {}", name, e);
                false
            }
        }
    }

    /// 写出PDF链接清单报告
    fn write_inventory(&self, store: &ArtifactStore, summary: &PdfScrapeSummary) -> Result<()> {
        let mut out = String::from("PDF Links Inventory\n");
        out.push_str(&"=".repeat(80));
        out.push_str("\n\n");
        for item in &summary.inventory {
            out.push_str(&format!("Project: {}\n", item.project));
            out.push_str(&format!("Model: {}\n", item.model));
            out.push_str(&format!("URL: {}\n", item.url));
            out.push_str(&"-".repeat(80));
            out.push('\n');
        }
        store.write_text("_pdf_inventory.txt", &out)
    }
}
