use std::collections::HashSet;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::dataset::Dataset;
use crate::dom::Element;
use crate::loader::{DataSource, DatasetCache, LoadError, LoaderOptions};
use crate::page::{Page, PageState};
use crate::projector::project;
use crate::render::{self, DetailOutcome, Locale, Messages, RenderOptions};

fn headers() -> Vec<String> {
    vec![
        "hfpxzc href",
        "qBF1Pd",
        "MW4etd",
        "UY7F9",
        "W4Efsd",
        "W4Efsd (3)",
        "W4Efsd (4)",
        "W4Efsd (5)",
        "AJB7ye",
        "UsdlK",
        "FQ2IWe src",
        "ah5Ghc",
        "ah5Ghc (2)",
        "A1zNzb href",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn sample_json() -> String {
    json!({
        "headers": headers(),
        "rows": [
            {
                "hfpxzc href": "https://maps.example/1",
                "qBF1Pd": "Morning Swirl",
                "MW4etd": "4.8",
                "UY7F9": "(230)",
                "W4Efsd": "Bakery",
                "W4Efsd (3)": "Kaohsiung Sanmin Rd 1",
                "W4Efsd (4)": "Open",
                "UsdlK": "07-123-4567",
                "FQ2IWe src": "https://img.example/1.jpg",
                "_id": 1,
                "_title": "Morning Swirl"
            },
            {
                "qBF1Pd": "Cinnamon Lab",
                "MW4etd": "·",
                "W4Efsd": "Cafe",
                "W4Efsd (3)": "Taipei Xinyi Rd 5",
                "A1zNzb href": "https://order.example/2",
                "_id": 2,
                "_title": "Cinnamon Lab"
            },
            {
                "qBF1Pd": "Roll Corner",
                "MW4etd": "4.1",
                "W4Efsd": "Dessert shop",
                "W4Efsd (3)": "Tainan Zhongxi",
                "_id": 3,
                "_title": "Roll Corner"
            }
        ]
    })
    .to_string()
}

fn sample() -> Dataset {
    Dataset::from_json(sample_json().as_bytes()).unwrap()
}

fn inline_cache() -> DatasetCache {
    DatasetCache::new(DataSource::Inline(sample_json())).unwrap()
}

fn list_ids(dataset: &Dataset, query: &str) -> Vec<u64> {
    let mut list = Element::new("section").with_id("roll-list");
    render::render_list(&mut list, dataset, query, &RenderOptions::default())
}

/// Serves exactly one HTTP response on a loopback port, then closes.
async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/")
}

fn http_cache(base: &str) -> DatasetCache {
    let source = DataSource::resolve(base, "data/rolls.json").unwrap();
    let options = LoaderOptions {
        no_proxy: true,
        ..LoaderOptions::default()
    };
    DatasetCache::with_options(source, &options).unwrap()
}

#[test]
fn filtering_never_adds_records() {
    let ds = sample();
    let all: HashSet<u64> = list_ids(&ds, "").into_iter().collect();
    for keyword in ["roll", "a", "cafe", "zzz", "  Taipei  ", "4.8"] {
        let subset: HashSet<u64> = list_ids(&ds, keyword).into_iter().collect();
        assert!(subset.is_subset(&all), "keyword {keyword:?}");
    }
}

#[test]
fn filtering_is_case_insensitive() {
    let ds = sample();
    assert_eq!(list_ids(&ds, "CINNAMON"), list_ids(&ds, "cinnamon"));
    assert_eq!(list_ids(&ds, "BAKERY"), vec![1]);
}

#[test]
fn searching_taipei_yields_only_matching_address() {
    let ds = sample();
    assert_eq!(list_ids(&ds, "taipei"), vec![2]);
}

#[test]
fn empty_query_keeps_dataset_order() {
    let ds = sample();
    assert_eq!(list_ids(&ds, "   "), vec![1, 2, 3]);
}

#[test]
fn no_match_renders_single_placeholder() {
    let ds = sample();
    let mut list = Element::new("section");
    let ids = render::render_list(&mut list, &ds, "croissant", &RenderOptions::default());
    assert!(ids.is_empty());
    assert_eq!(list.children().len(), 1);
    let empty = list.find_by_class("empty-state");
    assert_eq!(empty.len(), 1);
    assert_eq!(
        empty[0].text_content(),
        "沒有符合搜尋的肉桂捲，換個關鍵字試試看吧！"
    );
}

#[test]
fn sentinel_rating_renders_no_rating_badge() {
    let ds = sample();
    let mut list = Element::new("section");
    render::render_list(&mut list, &ds, "cinnamon lab", &RenderOptions::default());
    let badges: Vec<String> = list
        .find_by_class("badge")
        .iter()
        .map(|b| b.text_content())
        .collect();
    assert_eq!(badges, vec!["Cafe"]);
    assert!(!list.to_html().contains('·'));
}

#[test]
fn projected_title_matches_record_title() {
    let ds = sample();
    for record in ds.rows() {
        assert_eq!(project(record).title, record.title);
    }
}

#[test]
fn detail_lookup_is_total() {
    let ds = sample();
    let options = RenderOptions::default();
    for record in ds.rows() {
        let mut container = Element::new("div");
        let outcome = render::render_detail(&mut container, &ds, Some(record.id), &options);
        assert_eq!(outcome, DetailOutcome::Found(record.id));
        let heading = container.find_by_tag("h2");
        assert_eq!(heading[0].text_content(), record.title);
    }
    let mut container = Element::new("div");
    let outcome = render::render_detail(&mut container, &ds, Some(42), &options);
    assert_eq!(outcome, DetailOutcome::NotFound);
}

#[test]
fn malformed_dataset_is_rejected_at_load() {
    let body = json!({"headers": ["a", "b"], "rows": []}).to_string();
    assert!(Dataset::from_json(body.as_bytes()).is_err());
}

#[tokio::test]
async fn loading_twice_fetches_once() {
    let cache = inline_cache();
    let first = cache.load().await.unwrap();
    let second = cache.load().await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.fetch_count(), 1);
}

#[tokio::test]
async fn http_loader_fetches_once_and_caches() {
    let base = serve_once("200 OK", sample_json()).await;
    let cache = http_cache(&base);
    assert_eq!(cache.load().await.unwrap().len(), 3);
    // The server is gone after one response; a second fetch would fail.
    assert_eq!(cache.load().await.unwrap().len(), 3);
    assert_eq!(cache.fetch_count(), 1);
}

#[tokio::test]
async fn http_404_is_data_unavailable() {
    let base = serve_once("404 Not Found", "missing".to_string()).await;
    let cache = http_cache(&base);
    match cache.load().await {
        Err(LoadError::DataUnavailable { reason, .. }) => assert_eq!(reason, "HTTP 404"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(cache.get().is_none());
}

#[tokio::test]
async fn http_404_index_page_shows_unavailable_message() {
    let base = serve_once("404 Not Found", String::new()).await;
    let cache = http_cache(&base);
    let options = RenderOptions::default();
    let mut page = Page::index();
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Error);
    let container = page.container();
    assert_eq!(container.id(), Some("roll-list"));
    assert_eq!(container.text_content(), "無法讀取肉桂捲資料");
    assert_eq!(container.find_by_class("empty-state").len(), 1);
}

#[tokio::test]
async fn unparsable_body_is_data_unavailable() {
    let cache = DatasetCache::new(DataSource::Inline("{not json".to_string())).unwrap();
    assert!(matches!(
        cache.load().await,
        Err(LoadError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn short_header_list_is_malformed_and_localized() {
    let body = json!({"headers": ["a"], "rows": []}).to_string();
    let cache = DatasetCache::new(DataSource::Inline(body)).unwrap();
    let options = RenderOptions {
        messages: Messages::for_locale(Locale::En),
        ..RenderOptions::default()
    };
    let mut page = Page::detail("?id=1");
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Error);
    assert_eq!(page.error_message(), Some("Cinnamon roll data is malformed"));
    assert_eq!(
        page.container().text_content(),
        "Cinnamon roll data is malformed"
    );
}

#[tokio::test]
async fn missing_file_is_data_unavailable() {
    let path = std::env::temp_dir().join("rollfinder-does-not-exist.json");
    let cache = DatasetCache::new(DataSource::FilePath(path)).unwrap();
    assert!(matches!(
        cache.load().await,
        Err(LoadError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn file_source_loads_dataset() {
    let dir = std::env::temp_dir().join(format!("rollfinder-site-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("data")).unwrap();
    std::fs::write(dir.join("data/rolls.json"), sample_json()).unwrap();
    let source = DataSource::resolve(&dir.to_string_lossy(), "data/rolls.json").unwrap();
    let cache = DatasetCache::new(source).unwrap();
    assert_eq!(cache.load().await.unwrap().len(), 3);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn detail_page_unknown_id_shows_not_found_exactly() {
    let cache = inline_cache();
    let options = RenderOptions::default();
    let mut page = Page::detail("?id=999");
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Rendered);
    assert_eq!(page.detail_outcome(), Some(DetailOutcome::NotFound));
    let container = page.container();
    assert_eq!(container.children().len(), 1);
    assert_eq!(
        container.to_html(),
        r#"<div id="roll-detail"><div class="empty-state">找不到指定的肉桂捲，請回到首頁查看列表。</div></div>"#
    );
}

#[tokio::test]
async fn detail_page_renders_hero_and_raw_table() {
    let cache = inline_cache();
    let options = RenderOptions::default();
    let mut page = Page::detail("roll.html?id=1");
    page.bootstrap(&cache, &options).await;
    let container = page.container();
    assert_eq!(container.find_by_tag("h2")[0].text_content(), "Morning Swirl");
    assert_eq!(container.find_by_class("roll-hero").len(), 1);
    let rows = container.find_by_tag("tr");
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0].find_by_tag("th")[0].text_content(), "hfpxzc href");
}

#[tokio::test]
async fn search_input_rerenders_from_cache_without_refetch() {
    let cache = inline_cache();
    let options = RenderOptions::default();
    let mut page = Page::index();
    page.bootstrap(&cache, &options).await;
    assert_eq!(page.rendered_ids(), &[1, 2, 3]);

    let ids = page.on_search_input(&cache, "Tainan", &options).map(|ids| ids.to_vec());
    assert_eq!(ids, Some(vec![3]));
    assert_eq!(page.search_value(), "Tainan");
    assert_eq!(page.container().find_by_class("roll-card").len(), 1);

    page.on_search_input(&cache, "", &options);
    assert_eq!(page.container().find_by_class("roll-card").len(), 3);
    assert_eq!(cache.fetch_count(), 1);
    assert_eq!(page.state(), PageState::Rendered);
}

#[tokio::test]
async fn bootstrap_runs_once_per_page() {
    let cache = inline_cache();
    let options = RenderOptions::default();
    let mut page = Page::index();
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Rendered);
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Rendered);
    assert_eq!(cache.fetch_count(), 1);
}

#[tokio::test]
async fn search_input_ignored_after_failed_load() {
    let cache = DatasetCache::new(DataSource::Inline("[]".to_string())).unwrap();
    let options = RenderOptions::default();
    let mut page = Page::index();
    assert_eq!(page.bootstrap(&cache, &options).await, PageState::Error);
    assert!(page.on_search_input(&cache, "roll", &options).is_none());
    assert_eq!(page.container().text_content(), "無法讀取肉桂捲資料");
}

#[tokio::test]
async fn report_reflects_filtered_index() {
    let cache = inline_cache();
    let options = RenderOptions::default();
    let mut page = Page::index();
    page.bootstrap(&cache, &options).await;
    page.on_search_input(&cache, "cafe", &options);
    let dataset = cache.get();
    let report = crate::output::build_report(&page, dataset.as_deref(), &options);
    match report {
        crate::output::PageReport::Index { query, total, records } => {
            assert_eq!(query, "cafe");
            assert_eq!(total, 1);
            assert_eq!(records[0].order_url.as_deref(), Some("https://order.example/2"));
        }
        other => panic!("unexpected report: {other:?}"),
    }
    let html = String::from_utf8(crate::output::render_html(&page, &options)).unwrap();
    assert!(html.contains(r#"value="cafe""#));
    assert!(html.contains(r#"href="roll.html?id=2""#));
}
