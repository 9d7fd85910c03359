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

/// 流水线模块
///
/// 数据集抓取工具链的五条流水线：
/// - pdf_scrape: 从数据集CSV抓取PDF引用并生成文本产物
/// - link_scrape: 抓取附加的非数据集链接
/// - verify: 交叉核对链接与磁盘产物并生成验证报告
/// - audit: 检查网页产物质量并可选修复GitHub界面外壳
/// - clean: 对网页产物应用结构化清理
pub mod audit;
pub mod clean;
pub mod link_scrape;
pub mod pdf_scrape;
pub mod store;
pub mod verify;
