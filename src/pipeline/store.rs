// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::models::artifact::Artifact;
use crate::utils::text_encoding::decode_bytes;

/// 抓取产物存储
///
/// 以单个目录为根的扁平文件存储。产物为 `*.txt`，
/// 下划线前缀的文件（`_pdf_inventory.txt` 等）为报告，
/// 不计入产物数量。
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// 打开（必要时创建）一个产物目录
    pub fn open(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create output directory: {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// 存储根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 产物文件的完整路径
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// 产物是否已存在
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// 是否存在以给定词干结尾的产物（`*_{stem}.txt`）
    ///
    /// 用于链接流水线跳过PDF流水线已经抓取过的文档。
    /// 按后缀匹配, 避免词干是另一文档词干前缀时误判。
    pub fn has_artifact_with_stem(&self, stem: &str) -> bool {
        let suffix = format!("_{stem}.txt");
        self.artifact_names()
            .map(|names| names.iter().any(|n| n.ends_with(&suffix)))
            .unwrap_or(false)
    }

    /// 写出一个抓取产物
    pub fn write_artifact(&self, name: &str, artifact: &Artifact) -> Result<()> {
        self.write_text(name, &artifact.render())
    }

    /// 读取并解析一个抓取产物
    pub fn read_artifact(&self, name: &str) -> Result<Artifact> {
        Ok(Artifact::parse(&self.read_text(name)?))
    }

    /// 写出文本文件（产物或报告）
    pub fn write_text(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path_for(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// 宽松读取文本文件：非UTF-8字节回退解码
    pub fn read_text(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        let raw = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(decode_bytes(&raw))
    }

    /// 写出JSON格式的运行摘要
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path_for(name);
        let json = serde_json::to_string_pretty(value).context("Failed to serialize summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// 列出全部产物文件名（`*.txt`，排除报告），按名称排序
    pub fn artifact_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".txt") && !name.starts_with('_') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// 列出给定前缀的产物文件名，按名称排序
    pub fn names_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .artifact_names()?
            .into_iter()
            .filter(|n| n.starts_with(prefix))
            .collect())
    }

    /// 产物文件的大小（字节）
    pub fn size_of(&self, name: &str) -> Result<u64> {
        let path = self.path_for(name);
        Ok(std::fs::metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len())
    }
}
