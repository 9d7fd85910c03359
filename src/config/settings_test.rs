use super::Settings;

#[test]
fn test_defaults_load_without_files() {
    let settings = Settings::new().expect("defaults should load");

    assert_eq!(settings.http.timeout_secs, 30);
    assert_eq!(settings.http.max_content_size, 10 * 1024 * 1024);
    assert!(settings.http.user_agent.starts_with("Mozilla/5.0"));
    assert_eq!(settings.scrape.min_body_chars, 150);
    assert!(settings.scrape.skip_video);
}

#[test]
fn test_derived_directories() {
    let settings = Settings::new().expect("defaults should load");

    let links = settings.links_dir();
    assert!(links.ends_with("external_links"));
    assert!(links.starts_with(&settings.paths.output_dir));

    let backup = settings.backup_dir();
    assert!(backup
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_backup"));
}

#[test]
fn test_http_timeout_conversion() {
    let settings = Settings::new().expect("defaults should load");
    assert_eq!(settings.http_timeout().as_secs(), settings.http.timeout_secs);
}
