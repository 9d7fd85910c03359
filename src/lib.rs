// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体：数据集行、链接引用与文本产物
pub mod domain;

/// 引擎模块
///
/// 实现网页与文档抓取引擎
pub mod engines;

/// 提取模块
///
/// 将PDF与HTML内容转换为干净的纯文本
pub mod extract;

/// 流水线模块
///
/// 实现抓取、验证、体检与清理流水线
pub mod pipeline;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
