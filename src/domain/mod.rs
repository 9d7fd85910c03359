// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含批处理抓取的核心业务概念，包括：
/// - 领域模型（models）：数据集行、外部链接、抓取产物等实体
///
/// 领域层不依赖于任何外部实现，体现了纯粹的业务规则。
pub mod models;
