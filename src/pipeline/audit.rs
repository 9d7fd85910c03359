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
use crate::engines::traits::{FetchEngine, FetchRequest};
use crate::pipeline::store::ArtifactStore;
use crate::utils::text_encoding::decode_bytes;
use crate::utils::url_utils::github_raw_url;

/// 网页产物的体检分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// 内容完整可用
    Good,
    /// 抓到的是GitHub界面外壳而非文件内容
    GithubUi,
    /// 付费墙拦截（IEEE、Springer等）
    Paywalled,
    /// 内容为空或过短
    Empty,
}

impl FileCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Good => "good",
            FileCategory::GithubUi => "github_ui",
            FileCategory::Paywalled => "paywalled",
            FileCategory::Empty => "empty",
        }
    }
}

/// 体检运行摘要
#[derive(Debug, Default, Serialize)]
pub struct AuditSummary {
    pub good: usize,
    pub github_ui: usize,
    pub paywalled: usize,
    pub empty: usize,
    /// `--fix-github` 模式下成功重写的文件数
    pub fixed: usize,
    /// 每个文件的分类结果
    pub files: Vec<(String, FileCategory)>,
}

impl AuditSummary {
    pub fn total(&self) -> usize {
        self.good + self.github_ui + self.paywalled + self.empty
    }

    fn record(&mut self, name: &str, category: FileCategory) {
        match category {
            FileCategory::Good => self.good += 1,
            FileCategory::GithubUi => self.github_ui += 1,
            FileCategory::Paywalled => self.paywalled += 1,
            FileCategory::Empty => self.empty += 1,
        }
        self.files.push((name.to_string(), category));
    }
}

/// GitHub界面外壳在正文里留下的搜索栏标记
const GITHUB_UI_MARKER: &str = "Search code";

/// 体检流水线
///
/// 检查链接目录下的全部 `web_*` 产物，按正文质量分类，
/// 可选地把GitHub界面外壳替换为raw原始文件内容。
pub struct AuditPipeline<'a> {
    engine: &'a dyn FetchEngine,
    settings: &'a Settings,
}

impl<'a> AuditPipeline<'a> {
    pub fn new(engine: &'a dyn FetchEngine, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    pub async fn run(&self, links_dir: &Path, fix_github: bool) -> Result<AuditSummary> {
        let store = ArtifactStore::open(links_dir)?;
        let mut summary = AuditSummary::default();

        info!("Auditing web artifacts in {}", links_dir.display());

        for name in store.names_with_prefix("web_")? {
            let artifact = store.read_artifact(&name)?;
            let category = classify(&artifact, self.settings.scrape.min_body_chars);
            summary.record(&name, category);

            if fix_github && category == FileCategory::GithubUi {
                match self.fix_one(&store, &name, &artifact).await {
                    Ok(true) => summary.fixed += 1,
                    Ok(false) => {}
                    Err(e) => warn!("Could not fix {}: {}", name, e),
                }
            }
        }

        log_summary(&summary);
        store.write_json("_run_summary.json", &summary)?;

        Ok(summary)
    }

    /// 用raw.githubusercontent.com重抓单个文件，成功则保留头部重写正文
    async fn fix_one(&self, store: &ArtifactStore, name: &str, artifact: &Artifact) -> Result<bool> {
        let url = artifact
            .final_url
            .as_deref()
            .unwrap_or(&artifact.source_url);

        let raw_url = match github_raw_url(url) {
            Some(raw_url) => raw_url,
            None => {
                info!("Cannot convert to raw URL: {}", url);
                return Ok(false);
            }
        };

        info!("Re-fetching {} from {}", name, raw_url);

        let request = FetchRequest {
            url: raw_url,
            timeout: self.settings.http_timeout(),
            user_agent: self.settings.http.user_agent.clone(),
        };

        let response = match self.engine.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch failed for {}: {}", name, e);
                return Ok(false);
            }
        };

        let body = decode_bytes(&response.bytes).trim().to_string();
        // 重抓结果过短视为失败，保留原文件
        if body.len() < 100 {
            info!("Raw content for {} too short ({} chars), keeping original", name, body.len());
            return Ok(false);
        }

        let fixed = Artifact {
            body,
            ..artifact.clone()
        };
        store.write_artifact(name, &fixed)?;
        info!("Fixed: {} ({} chars)", name, fixed.body.len());
        Ok(true)
    }
}

/// 按正文长度与URL归属分类单个产物
fn classify(artifact: &Artifact, min_body_chars: usize) -> FileCategory {
    let url = match &artifact.final_url {
        Some(url) => url.to_lowercase(),
        None => return FileCategory::Empty,
    };
    let body = artifact.body.trim();

    if body.len() < min_body_chars {
        if url.contains("github") {
            FileCategory::GithubUi
        } else if url.contains("ieee") || url.contains("springer") {
            FileCategory::Paywalled
        } else {
            FileCategory::Empty
        }
    } else if url.contains("github.com") && body.contains(GITHUB_UI_MARKER) {
        FileCategory::GithubUi
    } else {
        FileCategory::Good
    }
}

fn log_summary(summary: &AuditSummary) {
    for (name, category) in &summary.files {
        info!("[{}] {}", category.label(), name);
    }
    info!("Good: {}", summary.good);
    info!("GitHub UI: {}", summary.github_ui);
    info!("Paywalled: {}", summary.paywalled);
    info!("Empty: {}", summary.empty);
    if summary.fixed > 0 {
        info!("Fixed: {}", summary.fixed);
    }
    info!("Total: {}", summary.total());
}
