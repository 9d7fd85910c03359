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

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::domain::models::artifact::Artifact;
use crate::domain::models::link::{FetchOutcome, LinkKind};
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::extract::html::tidy_text;
use crate::extract::{is_pdf, pdf::extract_pdf_text};
use crate::pipeline::store::ArtifactStore;
use crate::utils::text_encoding::decode_bytes;
use crate::utils::url_utils::{clean_url, is_video_url, sanitize_stem};

/// 附加链接抓取运行摘要
#[derive(Debug, Default, Serialize)]
pub struct LinkScrapeSummary {
    /// 成功抓取的数量
    pub successful: usize,
    /// 抓取失败的数量
    pub failed: usize,
    /// 主动跳过的数量
    pub skipped: usize,
    /// 每个链接的结局
    pub outcomes: Vec<(String, FetchOutcome)>,
}

impl LinkScrapeSummary {
    pub fn total(&self) -> usize {
        self.successful + self.failed + self.skipped
    }
}

/// 附加链接抓取流水线
///
/// 处理验证报告中列出的非数据集链接：清理URL、抓取内容、
/// 按魔数区分PDF与网页，分别写出 `pdf_*` 与 `web_*` 产物。
/// 视频链接与PDF流水线已覆盖的文档被跳过并记入摘要。
pub struct LinkScrapePipeline<'a> {
    engine: &'a dyn FetchEngine,
    settings: &'a Settings,
}

impl<'a> LinkScrapePipeline<'a> {
    pub fn new(engine: &'a dyn FetchEngine, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    /// 运行流水线
    ///
    /// `list_path` 为链接列表文件：每行一个URL，`#` 开头为注释。
    pub async fn run(&self, list_path: &Path, links_dir: &Path) -> Result<LinkScrapeSummary> {
        let store = ArtifactStore::open(links_dir)?;
        let pdf_store = ArtifactStore::open(&self.settings.paths.output_dir)?;

        let urls = read_link_list(list_path)?;
        info!("Scraping {} additional links into {}", urls.len(), links_dir.display());

        let mut summary = LinkScrapeSummary::default();

        for url in urls {
            let outcome = self.scrape_one(&store, &pdf_store, &url).await;
            match &outcome {
                FetchOutcome::Scraped => summary.successful += 1,
                FetchOutcome::Skipped(reason) => {
                    info!("Skipping ({}): {}", reason, url);
                    summary.skipped += 1;
                }
                _ => summary.failed += 1,
            }
            summary.outcomes.push((url, outcome));
        }

        self.write_summary(&store, &summary)?;
        store.write_json("_run_summary.json", &summary)?;

        info!(
            "Link scrape complete: {} ok, {} failed, {} skipped, {} total",
            summary.successful,
            summary.failed,
            summary.skipped,
            summary.total()
        );

        Ok(summary)
    }

    /// 抓取单个链接
    async fn scrape_one(
        &self,
        store: &ArtifactStore,
        pdf_store: &ArtifactStore,
        url: &str,
    ) -> FetchOutcome {
        if self.settings.scrape.skip_video && is_video_url(url) {
            return FetchOutcome::Skipped("video".into());
        }

        let cleaned = clean_url(url);
        let stem = sanitize_stem(&cleaned);

        // PDF流水线已经抓过的文档不再重复抓取
        if LinkKind::from_url(&cleaned) == LinkKind::Pdf && pdf_store.has_artifact_with_stem(&stem)
        {
            return FetchOutcome::Skipped("already scraped".into());
        }

        info!("Processing: {}", cleaned);

        let request = FetchRequest {
            url: cleaned.clone(),
            timeout: self.settings.http_timeout(),
            user_agent: self.settings.http.user_agent.clone(),
        };

        let response = match self.engine.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching {}: {}", cleaned, e);
                return e.classify();
            }
        };

        if response.bytes.len() > self.settings.http.max_content_size {
            warn!(
                "Response for {} is {} bytes, over the configured limit",
                cleaned,
                response.bytes.len()
            );
            return FetchOutcome::Failed;
        }

        if is_pdf(&response.bytes) {
            match extract_pdf_text(&response.bytes) {
                Ok(text) => {
                    let name = format!("pdf_{}.txt", stem);
                    let artifact = Artifact::for_link(&cleaned, &response.final_url, text);
                    self.save(store, &name, &artifact)
                }
                Err(e) => {
                    warn!("Could not extract PDF from {}: {}", cleaned, e);
                    FetchOutcome::Failed
                }
            }
        } else {
            // 网页内容按原样保存，结构化清理由clean流水线负责
            let text = tidy_text(&decode_bytes(&response.bytes));
            let name = format!("web_{}.txt", stem);
            let artifact = Artifact::for_link(&cleaned, &response.final_url, text);
            self.save(store, &name, &artifact)
        }
    }

    fn save(&self, store: &ArtifactStore, name: &str, artifact: &Artifact) -> FetchOutcome {
        match store.write_artifact(name, artifact) {
            Ok(()) => {
                info!("Saved: {} ({} chars)", name, artifact.body.len());
                FetchOutcome::Scraped
            }
            Err(e) => {
                warn!("Failed to write {}: {}", name, e);
                FetchOutcome::Failed
            }
        }
    }

    /// 写出链接抓取摘要报告
    fn write_summary(&self, store: &ArtifactStore, summary: &LinkScrapeSummary) -> Result<()> {
        let mut out = String::from("Additional Links Summary\n");
        out.push_str(&"=".repeat(80));
        out.push_str("\n\n");
        out.push_str(&format!("Successful: {}\n", summary.successful));
        out.push_str(&format!("Failed: {}\n", summary.failed));
        out.push_str(&format!("Skipped: {}\n", summary.skipped));
        out.push_str(&format!("Total: {}\n\n", summary.total()));
        for (url, outcome) in &summary.outcomes {
            out.push_str(&format!("[{}] {}\n", outcome.label(), url));
        }
        store.write_text("_links_summary.txt", &out)
    }
}

/// 读取链接列表文件：每行一个URL，空行与 `#` 注释被忽略
pub fn read_link_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read link list: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
