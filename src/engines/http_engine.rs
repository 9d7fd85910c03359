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

use crate::engines::traits::{EngineError, FetchEngine, FetchRequest, FetchResponse};
use async_trait::async_trait;
use std::time::Instant;

/// HTTP抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎，跟随重定向并
/// 以原始字节返回响应正文。
pub struct HttpEngine;

#[async_trait]
impl FetchEngine for HttpEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 抓取响应
    /// * `Err(EngineError)` - 抓取过程中出现的错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(&request.user_agent)
            .timeout(request.timeout)
            .build()?;

        let start = Instant::now();
        let response = client.get(&request.url).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout
            } else {
                EngineError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        // Ensure content_type is not empty
        let content_type = if content_type.trim().is_empty() {
            "text/html".to_string()
        } else {
            content_type
        };

        let bytes = response.bytes().await?.to_vec();

        Ok(FetchResponse {
            status_code: status.as_u16(),
            final_url,
            content_type,
            bytes,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "http"
    }
}
