// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io::Write;
use std::path::PathBuf;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use refscrape::config::settings::{HttpSettings, PathSettings, ScrapeSettings, Settings};
use refscrape::domain::models::artifact::Artifact;
use refscrape::engines::http_engine::HttpEngine;
use refscrape::pipeline::clean::{self, CleanPass};
use refscrape::pipeline::link_scrape::LinkScrapePipeline;
use refscrape::pipeline::pdf_scrape::PdfScrapePipeline;
use refscrape::pipeline::verify;

/// 构造指向临时目录的测试配置
fn test_settings(csv_path: PathBuf, output_dir: PathBuf) -> Settings {
    Settings {
        paths: PathSettings {
            csv_path,
            output_dir,
            links_dir: None,
            backup_dir: None,
        },
        http: HttpSettings {
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            max_content_size: 10 * 1024 * 1024,
        },
        scrape: ScrapeSettings {
            min_body_chars: 150,
            skip_video: true,
        },
    }
}

/// 生成一份单页PDF用于模拟下载
fn build_pdf(message: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(message)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode page content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize pdf");
    buf
}

/// 测试PDF抓取流水线端到端流程
///
/// 验证从CSV发现PDF链接、下载、文本转换、产物落盘与
/// 清单生成的完整链路。
#[tokio::test]
async fn test_pdf_scrape_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/papers/raft.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(build_pdf("In Search of an Understandable Consensus Algorithm")),
        )
        .mount(&server)
        .await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv,
        "project,model,,notes,has_external_doc_ref\n\
         raft,MultiPaxos,see {}/papers/raft.pdf for details,,TRUE\n\
         other,GPT-4,no links in this row,,FALSE\n",
        server.uri()
    )
    .unwrap();

    let out = tempfile::tempdir().unwrap();
    let settings = test_settings(csv.path().to_path_buf(), out.path().to_path_buf());
    let engine = HttpEngine;

    let summary = PdfScrapePipeline::new(&engine, &settings)
        .run(csv.path(), out.path())
        .await
        .unwrap();

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.rows_with_pdfs, 1);
    assert_eq!(summary.total_pdf_links, 1);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 0);

    let artifact_path = out.path().join("raft_MultiPaxos_raft.txt");
    let content = std::fs::read_to_string(&artifact_path).unwrap();
    assert!(content.starts_with("Source URL:"));
    assert!(content.contains("Project: raft"));
    assert!(content.contains("Understandable Consensus Algorithm"));

    let inventory = std::fs::read_to_string(out.path().join("_pdf_inventory.txt")).unwrap();
    assert!(inventory.contains("/papers/raft.pdf"));
}

/// 测试附加链接抓取流水线端到端流程
///
/// 网页被转换为纯文本产物，404与视频链接分别记为失败
/// 与跳过，并生成链接摘要。
#[tokio::test]
async fn test_link_scrape_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/consensus.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><h1>Consensus</h1>\
             <p>The leader replicates log entries to followers.</p>\
             <script>tracker()</script></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut list = tempfile::NamedTempFile::new().unwrap();
    writeln!(list, "# additional links").unwrap();
    writeln!(list, "{}/docs/consensus.html", server.uri()).unwrap();
    writeln!(list, "{}/gone", server.uri()).unwrap();
    writeln!(list, "https://www.youtube.com/watch?v=abc123").unwrap();

    let out = tempfile::tempdir().unwrap();
    let links_dir = out.path().join("external_links");
    let settings = test_settings(PathBuf::from("unused.csv"), out.path().to_path_buf());
    let engine = HttpEngine;

    let summary = LinkScrapePipeline::new(&engine, &settings)
        .run(list.path(), &links_dir)
        .await
        .unwrap();

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);

    let content = std::fs::read_to_string(links_dir.join("web_consensus_html.txt")).unwrap();
    assert!(content.starts_with("Source URL:"));
    assert!(content.contains("Final URL:"));
    assert!(content.contains("leader replicates log entries"));
    assert!(!content.contains("tracker()"));
    assert!(!content.contains("<p>"));

    let report = std::fs::read_to_string(links_dir.join("_links_summary.txt")).unwrap();
    assert!(report.contains("Successful: 1"));
    assert!(report.contains("[404]"));
    assert!(report.contains("[skipped]"));
}

/// 测试抓取后验证流程
///
/// 抓取产生的产物应被验证流水线计入，链接统计与报告
/// 内容一致。
#[tokio::test]
async fn test_scrape_then_verify() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spec/paxos.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(build_pdf("The Part-Time Parliament")),
        )
        .mount(&server)
        .await;

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv,
        "project,model,,notes,has_external_doc_ref\n\
         paxos,TLC,{}/spec/paxos.pdf plus https://example.test/page,,TRUE\n",
        server.uri()
    )
    .unwrap();

    let out = tempfile::tempdir().unwrap();
    let settings = test_settings(csv.path().to_path_buf(), out.path().to_path_buf());
    let engine = HttpEngine;

    PdfScrapePipeline::new(&engine, &settings)
        .run(csv.path(), out.path())
        .await
        .unwrap();

    let summary = verify::run(csv.path(), out.path()).unwrap();
    assert_eq!(summary.total_rows, 1);
    assert_eq!(summary.rows_with_links, 1);
    assert_eq!(summary.total_links, 2);
    assert_eq!(summary.pdf_links, 1);
    assert_eq!(summary.non_pdf_links, 1);
    assert_eq!(summary.scraped_files, 1);

    let report = std::fs::read_to_string(out.path().join("_verification_report.txt")).unwrap();
    assert!(report.contains("Scraped files: 1"));
    assert!(report.contains("https://example.test/page"));
}

/// 测试清理流水线保留头部并备份原文件
#[tokio::test]
async fn test_clean_preserves_header_and_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let links_dir = dir.path().join("external_links");
    let backup_dir = dir.path().join("external_links_backup");
    std::fs::create_dir_all(&links_dir).unwrap();

    let artifact = Artifact::for_link(
        "https://example.test/notes",
        "https://example.test/notes",
        "See [the paper](https://x.test/p.pdf) for **details** on the protocol.".to_string(),
    );
    std::fs::write(links_dir.join("web_notes.txt"), artifact.render()).unwrap();

    let summary = clean::run(&links_dir, &backup_dir, CleanPass::Polish).unwrap();
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_changed, 1);

    let cleaned = std::fs::read_to_string(links_dir.join("web_notes.txt")).unwrap();
    assert!(cleaned.starts_with("Source URL: https://example.test/notes"));
    assert!(cleaned.contains("See the paper for details on the protocol."));
    assert!(!cleaned.contains("**"));

    let backup = std::fs::read_to_string(backup_dir.join("web_notes.txt")).unwrap();
    assert!(backup.contains("[the paper]"));
}
