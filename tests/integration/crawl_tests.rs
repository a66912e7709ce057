//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yylive_crawler::config::Config;
use yylive_crawler::crawler::{crawl, Controller, Engine, MemoryLog};
use yylive_crawler::output::{result_file_name, FileSink, BOM};

/// Creates a test configuration pointing every endpoint at the mock server
fn create_test_config(server: &MockServer, output_dir: &str) -> Config {
    let mut config = Config::default();
    config.endpoints.channel_list = format!("{}/nav/v3/infoList", server.uri());
    config.endpoints.aggregator = format!("{}/index/v4/infoList", server.uri());
    config.endpoints.coded_list = format!("{}/data/liveList", server.uri());
    config.crawler.max_concurrent_requests = 4;
    config.output.directory = output_dir.to_string();
    config
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn live(id: u32, name: &str, users: u32) -> String {
    format!(
        r#"{{"liveId":{id},"sid":{sid},"liveName":"{name}","liveDesc":"desc {id}","users":{users}}}"#,
        id = id,
        sid = id + 1000,
        name = name,
        users = users
    )
}

fn flat_page(entries: &[String]) -> String {
    format!(r#"{{"data":{{"liveList":[{}]}}}}"#, entries.join(","))
}

async fn mount_channels(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/nav/v3/infoList"))
        .and(query_param("imei", "622266312844051"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, data_code: Option<&str>, page: u32, body: String) {
    let mut mock = Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()));
    if let Some(code) = data_code {
        mock = mock.and(query_param("dataCode", code));
    }
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Runs the engine against the mock server and returns the result file contents
async fn run_crawl(config: &Config, output: &TempDir) -> (String, Arc<MemoryLog>, yylive_crawler::output::CrawlStatistics) {
    let sink = Arc::new(
        FileSink::create(output.path(), &config.output.file_prefix, run_date(), config.output.deduplicate)
            .expect("Failed to create result file"),
    );
    let log = Arc::new(MemoryLog::new());
    let controller =
        Arc::new(Controller::new(config, sink.clone(), log.clone()).expect("Failed to create controller"));
    let engine = Engine::new(&config.crawler, controller).expect("Failed to create engine");

    let stats = engine.run().await;

    let contents = std::fs::read_to_string(sink.path()).expect("Failed to read result file");
    (contents, log, stats)
}

#[tokio::test]
async fn test_full_crawl_both_endpoint_shapes() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(
        &mock_server,
        r#"{"data":[
            {"tabName":"热门","dataCode":"","subDataCode":""},
            {"tabName":"游戏","dataCode":"x1","subDataCode":"y1"}
        ]}"#,
    )
    .await;

    // Trending channel: aggregator endpoint, module-grouped pages
    Mock::given(method("GET"))
        .and(path("/index/v4/infoList"))
        .and(query_param("page", "1"))
        .and(query_param("totalCount", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"data":{{"moduleList":[
                {{"moduleName":"banner","dataList":[{}]}},
                {{"moduleName":"hot","dataList":[{},{}]}}
            ]}}}}"#,
            live(99, "ad", 0),
            live(1, "A,B", 5),
            live(2, "C", 6)
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index/v4/infoList"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data":{"moduleList":[{"moduleName":"banner","dataList":[]}]}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Coded channel: flat pages, two with records then an empty one
    mount_page(&mock_server, "/data/liveList", Some("x1"), 1, flat_page(&[live(10, "g1", 1), live(11, "g2", 2)])).await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 2, flat_page(&[live(12, "g3", 3)])).await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 3, flat_page(&[])).await;

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let (contents, log, stats) = run_crawl(&config, &output).await;

    assert!(contents.starts_with(BOM));
    let mut lines: Vec<_> = contents.trim_start_matches(BOM).lines().collect();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "游戏,10,1010,g1,desc 10,1",
            "游戏,11,1011,g2,desc 11,2",
            "游戏,12,1012,g3,desc 12,3",
            "热门,1,1001,AB,desc 1,5",
            "热门,2,1002,C,desc 2,6",
        ]
    );

    assert_eq!(stats.channels_discovered, 2);
    assert_eq!(stats.pages_fetched, 6);
    assert_eq!(stats.records_written, 5);
    assert_eq!(stats.chains_exhausted, 2);
    assert_eq!(stats.failed_branches(), 0);
    assert!(log
        .at_level(Level::INFO)
        .iter()
        .any(|e| e.message == "Got 2 channels"));
}

#[tokio::test]
async fn test_page_batches_are_contiguous() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let channels: Vec<String> = (0..4)
        .map(|i| format!(r#"{{"tabName":"c{i}","dataCode":"d{i}","subDataCode":"s{i}"}}"#, i = i))
        .collect();
    mount_channels(&mock_server, &format!(r#"{{"data":[{}]}}"#, channels.join(","))).await;

    for i in 0..4u32 {
        let code = format!("d{}", i);
        let entries: Vec<_> = (0..20).map(|n| live(i * 100 + n, &format!("c{}", i), n)).collect();
        mount_page(&mock_server, "/data/liveList", Some(&code), 1, flat_page(&entries)).await;
        mount_page(&mock_server, "/data/liveList", Some(&code), 2, flat_page(&[])).await;
    }

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let (contents, _, stats) = run_crawl(&config, &output).await;

    assert_eq!(stats.records_written, 80);
    let lines: Vec<_> = contents.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 80);
    for batch in lines.chunks(20) {
        let channel = batch[0].split(',').next().unwrap();
        assert!(batch.iter().all(|line| line.split(',').next() == Some(channel)));
    }
}

#[tokio::test]
async fn test_unparseable_page_ends_only_that_chain() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(
        &mock_server,
        r#"{"data":[
            {"tabName":"X","dataCode":"bad","subDataCode":""},
            {"tabName":"Y","dataCode":"good","subDataCode":""}
        ]}"#,
    )
    .await;

    mount_page(&mock_server, "/data/liveList", Some("bad"), 1, flat_page(&[live(1, "x1", 1)])).await;
    mount_page(&mock_server, "/data/liveList", Some("bad"), 2, flat_page(&[live(2, "x2", 1)])).await;
    mount_page(&mock_server, "/data/liveList", Some("bad"), 3, "<html>maintenance</html>".to_string()).await;
    // Page 4 of X must never be requested
    Mock::given(method("GET"))
        .and(path("/data/liveList"))
        .and(query_param("dataCode", "bad"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(flat_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/data/liveList", Some("good"), 1, flat_page(&[live(5, "y1", 1)])).await;
    mount_page(&mock_server, "/data/liveList", Some("good"), 2, flat_page(&[])).await;

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let (contents, log, stats) = run_crawl(&config, &output).await;

    assert_eq!(contents.trim_start_matches(BOM).lines().count(), 3);
    assert_eq!(stats.parse_failures, 1);
    assert_eq!(stats.chains_exhausted, 1);

    let errors = log.at_level(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].mentions("X"));
    assert!(errors[0].mentions("3"));
}

#[tokio::test]
async fn test_unparseable_channel_list_writes_only_bom() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(&mock_server, "definitely not json").await;
    Mock::given(method("GET"))
        .and(path("/data/liveList"))
        .respond_with(ResponseTemplate::new(200).set_body_string(flat_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let (contents, log, stats) = run_crawl(&config, &output).await;

    assert_eq!(contents, BOM);
    assert_eq!(stats.channels_discovered, 0);
    assert_eq!(stats.parse_failures, 1);
    assert_eq!(log.at_level(Level::ERROR).len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_ends_chain_without_retry() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(
        &mock_server,
        r#"{"data":[{"tabName":"游戏","dataCode":"x1","subDataCode":"y1"}]}"#,
    )
    .await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 1, flat_page(&[live(1, "a", 1)])).await;
    Mock::given(method("GET"))
        .and(path("/data/liveList"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let (contents, _, stats) = run_crawl(&config, &output).await;

    assert_eq!(contents.trim_start_matches(BOM).lines().count(), 1);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.chains_exhausted, 0);
}

#[tokio::test]
async fn test_deduplicate_drops_repeated_shows() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(
        &mock_server,
        r#"{"data":[{"tabName":"游戏","dataCode":"x1","subDataCode":"y1"}]}"#,
    )
    .await;
    // Listing drift: show 2 appears on both pages
    mount_page(&mock_server, "/data/liveList", Some("x1"), 1, flat_page(&[live(1, "a", 1), live(2, "b", 1)])).await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 2, flat_page(&[live(2, "b", 1), live(3, "c", 1)])).await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 3, flat_page(&[])).await;

    let mut config = create_test_config(&mock_server, &output.path().to_string_lossy());
    config.output.deduplicate = true;
    let (contents, _, stats) = run_crawl(&config, &output).await;

    assert_eq!(contents.trim_start_matches(BOM).lines().count(), 3);
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.pages_with_records, 2);
}

#[tokio::test]
async fn test_crawl_entry_point_writes_dated_file() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_channels(
        &mock_server,
        r#"{"data":[{"tabName":"游戏","dataCode":"x1","subDataCode":"y1"}]}"#,
    )
    .await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 1, flat_page(&[live(7, "n", 9)])).await;
    mount_page(&mock_server, "/data/liveList", Some("x1"), 2, flat_page(&[])).await;

    let result_dir = output.path().join("result");
    let config = create_test_config(&mock_server, &result_dir.to_string_lossy());

    let stats = crawl(config).await.expect("Crawl failed");
    assert_eq!(stats.records_written, 1);

    let today = chrono::Local::now().date_naive();
    let file = result_dir.join(result_file_name("yylive", today));
    let contents = std::fs::read_to_string(file).expect("Result file missing");
    assert_eq!(contents, format!("{}游戏,7,1007,n,desc 7,9\n", BOM));
}
