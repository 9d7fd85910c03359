// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Matches URLs that point directly at a PDF document.
static PDF_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"{}|\\^\[\]`]+\.pdf"#).unwrap()
});

/// Matches any http(s) URL up to whitespace or a delimiter character.
static ANY_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"{}|\\^\[\]`]+"#).unwrap()
});

static GITHUB_BLOB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/blob/([^/]+)/(.+)$").unwrap()
});

static GITHUB_TREE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/tree/([^/]+)/(.+)$").unwrap()
});

static GITHUB_REPO_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/?$").unwrap());

static NON_FILENAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]").unwrap());

/// Extract all PDF links from free text, deduplicated in first-seen order.
pub fn extract_pdf_links(text: &str) -> Vec<String> {
    dedup_ordered(PDF_LINK_REGEX.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Extract every external link from free text, deduplicated in first-seen order.
pub fn extract_all_links(text: &str) -> Vec<String> {
    dedup_ordered(ANY_LINK_REGEX.find_iter(text).map(|m| m.as_str().to_string()))
}

fn dedup_ordered(links: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for link in links {
        if seen.insert(link.clone()) {
            unique.push(link);
        }
    }
    unique
}

/// Clean a URL scraped out of prose: strip trailing punctuation the source
/// text glued onto it, and complete the known truncations from the
/// verification report (links cut off with `...`).
pub fn clean_url(url: &str) -> String {
    let mut url = url.trim_end_matches(';').trim_end_matches('.').to_string();

    for (marker, completion) in [
        ("pubs.html#di", "pubs.html#distributed-systems/"),
        ("teaching-con", "teaching-concurrency.html"),
        ("two-phase.htm", "two-phase.html"),
        ("ewd09xx/EWD998", "ewd09xx/EWD998aaa/EWD998.txt"),
    ] {
        if let Some(idx) = url.find(marker) {
            if idx + marker.len() == url.len() {
                url.truncate(idx);
                url.push_str(completion);
            }
        }
    }

    url
}

/// Derive a filesystem-safe stem from a URL: the last path segment, or the
/// host when the path is empty, with anything outside `[A-Za-z0-9_-]`
/// replaced by underscores and capped at 100 characters.
pub fn sanitize_stem(url: &str) -> String {
    let raw = match Url::parse(url) {
        Ok(parsed) => {
            let basename = parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
                .unwrap_or_default();
            if basename.is_empty() {
                parsed.host_str().unwrap_or("unknown").to_string()
            } else {
                basename
            }
        }
        Err(_) => url.to_string(),
    };

    let stem = raw.strip_suffix(".pdf").unwrap_or(&raw);
    // Transliterate non-ASCII segments before the filename filter eats them
    let ascii = deunicode::deunicode(stem);
    let mut sanitized = NON_FILENAME_REGEX.replace_all(&ascii, "_").into_owned();
    sanitized.truncate(100);
    sanitized
}

/// Convert a GitHub web URL into its raw.githubusercontent.com equivalent.
///
/// `blob/` URLs map directly to the raw file; `tree/` URLs (directories)
/// map to the directory's README; bare repo URLs map to the repo's README
/// on `master`. Returns `None` for URLs that have no raw counterpart
/// (issues, org pages, non-GitHub hosts).
pub fn github_raw_url(url: &str) -> Option<String> {
    if url.contains("raw.githubusercontent.com") {
        return Some(url.to_string());
    }
    if !url.contains("github.com") {
        return None;
    }

    if let Some(caps) = GITHUB_BLOB_REGEX.captures(url) {
        return Some(format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            &caps[1], &caps[2], &caps[3], &caps[4]
        ));
    }

    if let Some(caps) = GITHUB_TREE_REGEX.captures(url) {
        return Some(format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}/README.md",
            &caps[1], &caps[2], &caps[3], &caps[4]
        ));
    }

    if let Some(caps) = GITHUB_REPO_REGEX.captures(url) {
        return Some(format!(
            "https://raw.githubusercontent.com/{}/{}/master/README.md",
            &caps[1], &caps[2]
        ));
    }

    None
}

/// Whether a URL points at a video platform we never scrape.
pub fn is_video_url(url: &str) -> bool {
    url.starts_with("https://www.youtube.com")
        || url.starts_with("http://www.youtube.com")
        || url.starts_with("https://youtu.be")
        || url.starts_with("http://youtu.be")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pdf_links_dedup_in_order() {
        let text = "see https://raft.github.io/raft.pdf and also \
                    https://cedric.cnam.fr/fichiers/RC474.pdf then again \
                    https://raft.github.io/raft.pdf";
        let links = extract_pdf_links(text);
        assert_eq!(
            links,
            vec![
                "https://raft.github.io/raft.pdf",
                "https://cedric.cnam.fr/fichiers/RC474.pdf"
            ]
        );
    }

    #[test]
    fn test_extract_all_links_ignores_non_pdf_suffix() {
        let text = "docs at https://example.com/page.html plus https://raft.github.io/raft.pdf";
        assert_eq!(extract_all_links(text).len(), 2);
        assert_eq!(extract_pdf_links(text).len(), 1);
    }

    #[test]
    fn test_clean_url_strips_trailing_punctuation() {
        assert_eq!(
            clean_url("https://github.com/Azure/RSL;"),
            "https://github.com/Azure/RSL"
        );
        assert_eq!(
            clean_url("https://github.com/byisystems/byihive."),
            "https://github.com/byisystems/byihive"
        );
    }

    #[test]
    fn test_clean_url_completes_known_truncations() {
        assert_eq!(
            clean_url("http://lamport.azurewebsites.net/pubs/teaching-con"),
            "http://lamport.azurewebsites.net/pubs/teaching-concurrency.html"
        );
        assert_eq!(
            clean_url("http://lamport.azurewebsites.net/tla/two-phase.htm"),
            "http://lamport.azurewebsites.net/tla/two-phase.html"
        );
    }

    #[test]
    fn test_sanitize_stem_from_path() {
        assert_eq!(sanitize_stem("https://raft.github.io/raft.pdf"), "raft");
        assert_eq!(
            sanitize_stem("https://cedric.cnam.fr/fichiers/RC474.pdf"),
            "RC474"
        );
    }

    #[test]
    fn test_sanitize_stem_falls_back_to_host() {
        assert_eq!(
            sanitize_stem("https://raft.github.io/"),
            "raft_github_io"
        );
    }

    #[test]
    fn test_sanitize_stem_replaces_special_chars() {
        let stem = sanitize_stem("https://dl.acm.org/citation.cfm?id=214134");
        assert!(stem.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_github_raw_url_blob() {
        assert_eq!(
            github_raw_url("https://github.com/nano-o/MultiPaxos/blob/master/DiskPaxos.tla"),
            Some("https://raw.githubusercontent.com/nano-o/MultiPaxos/master/DiskPaxos.tla".into())
        );
    }

    #[test]
    fn test_github_raw_url_tree_gets_readme() {
        assert_eq!(
            github_raw_url("https://github.com/banhday/tlabenchmarks/tree/master/benchmarks/spanning"),
            Some(
                "https://raw.githubusercontent.com/banhday/tlabenchmarks/master/benchmarks/spanning/README.md"
                    .into()
            )
        );
    }

    #[test]
    fn test_github_raw_url_bare_repo_gets_master_readme() {
        assert_eq!(
            github_raw_url("https://github.com/Azure/RingMaster"),
            Some("https://raw.githubusercontent.com/Azure/RingMaster/master/README.md".into())
        );
        assert_eq!(
            github_raw_url("https://github.com/byisystems/byihive/"),
            Some("https://raw.githubusercontent.com/byisystems/byihive/master/README.md".into())
        );
    }

    #[test]
    fn test_github_raw_url_rejects_non_file_pages() {
        assert_eq!(github_raw_url("https://github.com/tlaplus/Examples/issues/9"), None);
        assert_eq!(github_raw_url("https://github.com/LMAX-Exchange"), None);
        assert_eq!(github_raw_url("https://example.com/page"), None);
    }

    #[test]
    fn test_is_video_url() {
        assert!(is_video_url("https://www.youtube.com/watch?v=cYenTPD7740"));
        assert!(is_video_url("https://youtu.be/_GP9OpZPUYc?t=742"));
        assert!(!is_video_url("https://raft.github.io/raft.pdf"));
    }
}
