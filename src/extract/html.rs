// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// 整体丢弃的标签
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "meta", "iframe", "nav", "footer", "header", "svg", "form",
    "button", "head",
];

/// class属性中出现即整体丢弃的导航类标记
const SKIP_CLASS_TOKENS: &[&str] = &[
    "nav", "navbar", "menu", "sidebar", "footer", "advertisement", "ad-", "breadcrumb",
    "pagination", "comments", "widget", "related",
];

static BLANK_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// 检测内容是否具有HTML结构
pub fn looks_like_html(content: &str) -> bool {
    content.contains("<html")
        || content.contains("<!DOCTYPE")
        || content.contains("<head")
        || content.contains("<body")
        || content.contains("<div")
        || content.contains("<p>")
        || content.contains("<a ")
}

/// 从HTML中提取正文文本
///
/// 递归遍历DOM，丢弃脚本、样式与导航类容器，保留标题/段落/
/// 列表/代码的轻量markdown结构，最后解码HTML实体并折叠
/// 多余空行。
pub fn extract_html_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    walk(document.root_element(), &mut out, false);

    let decoded = html_escape::decode_html_entities(&out).to_string();
    tidy_text(&decoded)
}

/// 清理纯文本：折叠空白并去除首尾空行
pub fn tidy_text(text: &str) -> String {
    let stripped: String = text
        .lines()
        .map(|line| SPACE_RUN_REGEX.replace_all(line.trim_end(), " ").into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUN_REGEX.replace_all(&stripped, "\n\n").trim().to_string()
}

fn walk(element: ElementRef, out: &mut String, in_pre: bool) {
    let tag = element.value().name();
    if SKIP_TAGS.contains(&tag) {
        return;
    }
    if let Some(class) = element.value().attr("class") {
        let class = class.to_lowercase();
        if SKIP_CLASS_TOKENS.iter().any(|token| class.contains(token)) {
            return;
        }
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level: usize = tag[1..].parse().unwrap_or(3);
            let text = inline_text(element);
            if !text.is_empty() {
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&text);
                out.push('\n');
            }
            return;
        }
        "pre" => {
            let text: String = element.text().collect();
            let text = text.trim_matches('\n');
            if !text.trim().is_empty() {
                out.push_str("\n```\n");
                out.push_str(text);
                out.push_str("\n```\n");
            }
            return;
        }
        "br" => {
            out.push('\n');
            return;
        }
        "li" => {
            ensure_newline(out);
            out.push_str("- ");
        }
        "code" if !in_pre => {
            let text = inline_text(element);
            if !text.is_empty() {
                if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                    out.push(' ');
                }
                out.push('`');
                out.push_str(&text);
                out.push('`');
            }
            return;
        }
        _ => {}
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if in_pre {
                    out.push_str(text);
                } else {
                    push_inline(out, text);
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    walk(child_ref, out, in_pre || tag == "pre");
                }
            }
            _ => {}
        }
    }

    match tag {
        "p" | "blockquote" | "table" => {
            out.push_str("\n\n");
        }
        "li" | "tr" | "div" | "section" | "article" | "ul" | "ol" => {
            ensure_newline(out);
        }
        _ => {}
    }
}

/// 追加行内文本，规范化空白并在需要时补一个分隔空格
fn push_inline(out: &mut String, text: &str) {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return;
    }
    if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
        out.push(' ');
    }
    out.push_str(&normalized);
}

fn inline_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn ensure_newline(out: &mut String) {
    if !(out.is_empty() || out.ends_with('\n')) {
        out.push('\n');
    }
}
