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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含路径、HTTP客户端与抓取行为等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 路径配置
    pub paths: PathSettings,
    /// HTTP客户端配置
    pub http: HttpSettings,
    /// 抓取行为配置
    pub scrape: ScrapeSettings,
}

/// 路径配置设置
#[derive(Debug, Deserialize)]
pub struct PathSettings {
    /// 数据集CSV路径
    pub csv_path: PathBuf,
    /// 抓取产物输出目录
    pub output_dir: PathBuf,
    /// 附加链接产物目录（默认在输出目录之下）
    pub links_dir: Option<PathBuf>,
    /// 清理流程的备份目录
    pub backup_dir: Option<PathBuf>,
}

/// HTTP客户端配置设置
#[derive(Debug, Deserialize)]
pub struct HttpSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent请求头
    pub user_agent: String,
    /// 响应正文大小上限（字节）
    pub max_content_size: usize,
}

/// 抓取行为配置设置
#[derive(Debug, Deserialize)]
pub struct ScrapeSettings {
    /// 审计时判定正文过短的阈值（字符数）
    pub min_body_chars: usize,
    /// 是否跳过视频链接
    pub skip_video: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件与环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("paths.csv_path", "comment_ratios.csv")?
            .set_default("paths.output_dir", "./scraped_pdfs")?
            // Default HTTP settings; the UA matches what the dataset was
            // originally collected with, some hosts reject unknown agents
            .set_default("http.timeout_secs", 30)?
            .set_default(
                "http.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )?
            .set_default("http.max_content_size", 10 * 1024 * 1024)?
            // Default scrape behavior
            .set_default("scrape.min_body_chars", 150)?
            .set_default("scrape.skip_video", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("REFSCRAPE").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 附加链接产物目录，未配置时为 `<output_dir>/external_links`
    pub fn links_dir(&self) -> PathBuf {
        self.paths
            .links_dir
            .clone()
            .unwrap_or_else(|| self.paths.output_dir.join("external_links"))
    }

    /// 备份目录，未配置时为 `<links_dir>_backup`
    pub fn backup_dir(&self) -> PathBuf {
        self.paths.backup_dir.clone().unwrap_or_else(|| {
            let links = self.links_dir();
            let mut name = links
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "external_links".to_string());
            name.push_str("_backup");
            links.with_file_name(name)
        })
    }

    /// HTTP请求超时
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
