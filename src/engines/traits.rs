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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::link::FetchOutcome;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 将错误归类为抓取结局
    ///
    /// 404 归为 NotFound，403 归为 Forbidden，其余一律 Failed。
    /// 批处理按结局记账，不做重试。
    pub fn classify(&self) -> FetchOutcome {
        match self {
            EngineError::HttpStatus(404) => FetchOutcome::NotFound,
            EngineError::HttpStatus(403) => FetchOutcome::Forbidden,
            EngineError::RequestFailed(e) => match e.status().map(|s| s.as_u16()) {
                Some(404) => FetchOutcome::NotFound,
                Some(403) => FetchOutcome::Forbidden,
                _ => FetchOutcome::Failed,
            },
            _ => FetchOutcome::Failed,
        }
    }
}

/// 抓取请求
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
    /// User-Agent请求头
    pub user_agent: String,
}

/// 抓取响应
///
/// 正文保留原始字节：PDF等二进制内容不能按文本读取。
pub struct FetchResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 重定向后的最终URL
    pub final_url: String,
    /// 内容类型
    pub content_type: String,
    /// 响应正文（原始字节）
    pub bytes: Vec<u8>,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 抓取引擎特质
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
