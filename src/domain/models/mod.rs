// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了批处理抓取的核心业务实体，包括：
/// - 数据集行（dataset）：注释比例数据集CSV中的一条记录
/// - 外部链接（link）：从记录文本中提取出的外部引用
/// - 抓取产物（artifact）：带元数据头的纯文本输出文件
///
/// 这些模型构成了抓取流水线的数据基础。
pub mod artifact;
pub mod dataset;
pub mod link;
