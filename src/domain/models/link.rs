// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 外部链接引用实体
///
/// 从数据集某一行的自由文本中提取出的一个外部链接，
/// 保留其所属的项目与模型归属信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    /// 所属项目
    pub project: String,
    /// 对应模型
    pub model: String,
    /// 链接地址
    pub url: String,
}

/// 链接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// 直接指向PDF文档
    Pdf,
    /// 普通网页
    Web,
}

impl LinkKind {
    /// 按URL后缀判断链接类型（大小写不敏感）
    pub fn from_url(url: &str) -> Self {
        if url.to_lowercase().ends_with(".pdf") {
            LinkKind::Pdf
        } else {
            LinkKind::Web
        }
    }
}

/// 单个链接的抓取结局
///
/// 抓取失败不会中断批处理，而是按类别记入报告：
/// 404 归为 NotFound，403（通常为付费墙）归为 Forbidden，
/// 其余错误归为 Failed，主动跳过的链接归为 Skipped。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchOutcome {
    /// 成功抓取并写出产物
    Scraped,
    /// 目标不存在（HTTP 404）
    NotFound,
    /// 访问被拒（HTTP 403，付费墙等）
    Forbidden,
    /// 其他抓取或提取失败
    Failed,
    /// 主动跳过（视频、重复等），附带原因
    Skipped(String),
}

impl FetchOutcome {
    /// 报告中使用的标签
    pub fn label(&self) -> &str {
        match self {
            FetchOutcome::Scraped => "scraped",
            FetchOutcome::NotFound => "404",
            FetchOutcome::Forbidden => "forbidden",
            FetchOutcome::Failed => "failed",
            FetchOutcome::Skipped(_) => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_kind_from_url() {
        assert_eq!(LinkKind::from_url("https://raft.github.io/raft.pdf"), LinkKind::Pdf);
        assert_eq!(LinkKind::from_url("https://lamport.azurewebsites.net/pubs/DISK-PAXOS.PDF"), LinkKind::Pdf);
        assert_eq!(LinkKind::from_url("https://en.wikipedia.org/wiki/Tower_of_Hanoi"), LinkKind::Web);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(FetchOutcome::NotFound.label(), "404");
        assert_eq!(FetchOutcome::Skipped("video".into()).label(), "skipped");
    }
}
