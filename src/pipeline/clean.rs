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
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::extract::html::{extract_html_text, looks_like_html};
use crate::pipeline::store::ArtifactStore;

/// 清理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanPass {
    /// 正文仍是HTML时重新提取纯文本
    Html,
    /// 去除GitHub界面残渣
    Github,
    /// 去除开头的导航行
    Nav,
    /// 去除Markdown标记与多余空白
    Polish,
    /// 只保留标题、代码与真实句子
    Substance,
    /// 按顺序执行上述全部阶段
    All,
}

impl FromStr for CleanPass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(CleanPass::Html),
            "github" => Ok(CleanPass::Github),
            "nav" => Ok(CleanPass::Nav),
            "polish" => Ok(CleanPass::Polish),
            "substance" => Ok(CleanPass::Substance),
            "all" => Ok(CleanPass::All),
            other => Err(format!(
                "unknown clean pass '{}', expected one of: html, github, nav, polish, substance, all",
                other
            )),
        }
    }
}

/// 清理运行摘要
#[derive(Debug, Default, Serialize)]
pub struct CleanSummary {
    /// 处理的文件数
    pub files_processed: usize,
    /// 正文被改写的文件数
    pub files_changed: usize,
    /// 清理前正文总字节数
    pub bytes_before: usize,
    /// 清理后正文总字节数
    pub bytes_after: usize,
}

/// 清理流水线
///
/// 对链接目录下的全部 `web_*` 产物应用选定的清理阶段。
/// 每个阶段只改写正文，头部原样保留；改写前先把原文件
/// 备份到备份目录。
pub fn run(links_dir: &Path, backup_dir: &Path, pass: CleanPass) -> Result<CleanSummary> {
    let store = ArtifactStore::open(links_dir)?;
    std::fs::create_dir_all(backup_dir)
        .with_context(|| format!("Failed to create backup dir: {}", backup_dir.display()))?;

    let names = store.names_with_prefix("web_")?;
    info!(
        "Cleaning {} files in {} (pass: {:?})",
        names.len(),
        links_dir.display(),
        pass
    );

    let mut summary = CleanSummary::default();

    for name in names {
        // 先备份原文件
        std::fs::copy(store.path_for(&name), backup_dir.join(&name))
            .with_context(|| format!("Failed to back up {}", name))?;

        let mut artifact = store.read_artifact(&name)?;
        let before = artifact.body.len();
        let cleaned = apply_pass(&artifact.body, pass);
        let after = cleaned.len();

        summary.files_processed += 1;
        summary.bytes_before += before;
        summary.bytes_after += after;

        if cleaned != artifact.body {
            summary.files_changed += 1;
            artifact.body = cleaned;
            store.write_artifact(&name, &artifact)?;
            info!("Cleaned: {} ({} -> {} bytes)", name, before, after);
        }
    }

    info!(
        "Clean complete: {} files, {} changed, {} -> {} bytes",
        summary.files_processed, summary.files_changed, summary.bytes_before, summary.bytes_after
    );

    Ok(summary)
}

fn apply_pass(body: &str, pass: CleanPass) -> String {
    match pass {
        CleanPass::Html => clean_html(body),
        CleanPass::Github => clean_github(body),
        CleanPass::Nav => clean_nav(body),
        CleanPass::Polish => polish(body),
        CleanPass::Substance => extract_substance(body),
        CleanPass::All => {
            let body = clean_html(body);
            let body = clean_github(&body);
            let body = clean_nav(&body);
            let body = polish(&body);
            extract_substance(&body)
        }
    }
}

/// 正文看起来仍是HTML时重新走一遍提取器
fn clean_html(body: &str) -> String {
    if looks_like_html(body) {
        extract_html_text(body)
    } else {
        body.to_string()
    }
}

/// GitHub界面残渣的删除模式（登录横幅、搜索框、文件列表、页脚等）
///
/// 组织页的热门仓库块以 "Loading" 占位收尾，由末尾的
/// Loading 清除模式一并带走。
static GITHUB_CHROME_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?s)# Search code, repositories,.*?Cancel Create saved search", ""),
        (r"(?s)You signed (in|out).*?refresh your session\.", ""),
        (r"(?s)You switched accounts.*?refresh your session\.", ""),
        (r"(?s)Dismiss alert.*?You must be signed in", ""),
        (r"(?s)## Labels.*?### Development", ""),
        (r"(?s)## Metadata.*?### Development", ""),
        (r"(?s)## Folders and files.*?## History", ""),
        (r"(?s)## Latest commit.*?## Repository", ""),
        (r"(?s)No branches or pull requests.*", ""),
        (r"(?s)## Popular repositories.*?(Loading|No releases)", "Loading"),
        (r"(?s)### Resources.*?### License.*?### Uh oh", ""),
        (r"(?s)### License.*?### Uh oh", ""),
        (r"(?s)### Uh oh!.*?### Stars", ""),
        (r"(?s)### Stars.*?## Languages", ""),
        (r"(?s)\(C\) \d{4} GitHub, Inc\..*", ""),
        (
            r"(?s)(You can't perform that action|You must be signed in|Do not share).*",
            "",
        ),
        (r"\[\]\(\)", ""),
        (r"Loading\n+", ""),
    ]
    .iter()
    .map(|(p, rep)| (Regex::new(p).unwrap(), *rep))
    .collect()
});

static BLANK_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

fn clean_github(body: &str) -> String {
    let mut out = body.to_string();
    for (pattern, replacement) in GITHUB_CHROME_PATTERNS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out = BLANK_RUN_REGEX.replace_all(&out, "\n\n").into_owned();
    out.trim().to_string()
}

/// 文件开头常见的导航行模式
static NAV_LINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(Research areas|People|Microsoft|Labs|Other|Tech|Industries|Search|Global):.*$",
        r"^(Search|Tech|Industries|Global|Partners|Resources).*$",
        r"^(Home|About|Contact|Careers|Events).*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn clean_nav(body: &str) -> String {
    let kept: Vec<&str> = body
        .lines()
        .filter(|line| !NAV_LINE_PATTERNS.iter().any(|p| p.is_match(line)))
        .collect();

    let mut start = 0;
    let mut end = kept.len();
    while start < end && kept[start].trim().is_empty() {
        start += 1;
    }
    while end > start && kept[end - 1].trim().is_empty() {
        end -= 1;
    }
    kept[start..end].join("\n")
}

static MD_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());
static MD_LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").unwrap());
static MD_BOLD_STAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static MD_BOLD_UNDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_]+)__").unwrap());
static MD_ITALIC_STAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static MD_ITALIC_UNDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());
static MD_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRAY_LINK_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\]\(").unwrap());
static STRAY_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\||---|#+[ \t]*)$").unwrap());
static SPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

fn polish(body: &str) -> String {
    let mut out = MD_IMAGE_REGEX.replace_all(body, "").into_owned();
    out = MD_LINK_REGEX.replace_all(&out, "$1").into_owned();
    out = MD_BOLD_STAR_REGEX.replace_all(&out, "$1").into_owned();
    out = MD_BOLD_UNDER_REGEX.replace_all(&out, "$1").into_owned();
    out = MD_ITALIC_STAR_REGEX.replace_all(&out, "$1").into_owned();
    out = MD_ITALIC_UNDER_REGEX.replace_all(&out, "$1").into_owned();
    out = MD_CODE_REGEX.replace_all(&out, "$1").into_owned();
    out = STRAY_LINK_PREFIX_REGEX.replace_all(&out, "").into_owned();
    out = STRAY_LINE_REGEX.replace_all(&out, "").into_owned();
    out = SPACE_RUN_REGEX.replace_all(&out, " ").into_owned();
    out = BLANK_RUN_REGEX.replace_all(&out, "\n\n").into_owned();
    out.trim().to_string()
}

/// 纯符号行（如 "* [] * []"）
static SYMBOL_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s\[\]\-*()]+$").unwrap());

/// 短导航用语，单独成行时整行丢弃
const NAV_WORDS: &[&str] = &[
    "menu",
    "navigation",
    "breadcrumb",
    "sidebar",
    "footer",
    "advertisement",
    "subscribe",
    "follow us",
    "contact us",
    "cookie",
    "privacy",
    "terms",
    "sign in",
    "log in",
];

fn extract_substance(body: &str) -> String {
    let mut kept = Vec::new();

    for line in body.lines() {
        let stripped = line.trim();

        if stripped.len() < 3 {
            continue;
        }
        if SYMBOL_ONLY_REGEX.is_match(stripped) {
            continue;
        }

        let lower = stripped.to_lowercase();
        if stripped.len() < 30 && NAV_WORDS.iter().any(|w| lower.contains(w)) {
            continue;
        }

        // 标题、代码与真实句子保留，其余视为页面噪声
        let has_substance = stripped.contains('.')
            || stripped.contains('!')
            || stripped.contains('?')
            || stripped.contains('#')
            || stripped.contains('`')
            || stripped.len() > 20;
        if !has_substance {
            continue;
        }

        let mut line = MD_LINK_REGEX.replace_all(stripped, "$1").into_owned();
        line = MD_IMAGE_REGEX.replace_all(&line, "").into_owned();
        line = MD_BOLD_STAR_REGEX.replace_all(&line, "$1").into_owned();
        line = MD_BOLD_UNDER_REGEX.replace_all(&line, "$1").into_owned();
        kept.push(line);
    }

    kept.join("\n")
}
