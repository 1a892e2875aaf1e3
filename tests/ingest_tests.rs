//! Integration tests for the ingestion pipeline
//!
//! These tests run the crawler against a wiremock catalog and check the
//! discovery walk, the fetch loop's failure isolation, and the consistency
//! of the persisted stores.

use muddler::config::Config;
use muddler::crawler::{Coordinator, Discovery, Fetcher, ListingCrawler};
use muddler::store::JsonStore;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at the mock catalog, with no politeness delay
fn test_config(base_url: &str, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.base_url = base_url.trim_end_matches('/').to_string();
    config.fetcher.timeout_secs = 2;
    config.fetcher.request_delay_ms = 0;
    config.output.data_dir = data_dir.display().to_string();
    config
}

/// A listing page: one h3 anchor per detail slug, plus an optional
/// next-page arrow
fn listing_page(slugs: &[&str], next: bool) -> String {
    let mut html = String::from("<html><body>");
    for slug in slugs {
        html.push_str(&format!(
            "<h3><a href=\"/recept/{}/\">{}</a></h3>",
            slug, slug
        ));
    }
    if next {
        html.push_str("<a href=\"/alla-drinkar/page/2/\">\u{bb}</a>");
    }
    html.push_str("</body></html>");
    html
}

/// A valid detail page with two complete ingredient lines
fn recipe_page(name: &str, categories: &[&str]) -> String {
    let category_anchors: String = categories
        .iter()
        .map(|c| format!("<a class=\"related-terms\" href=\"#\">{}</a>", c))
        .collect();

    format!(
        r#"<html>
        <head><title>{name} - Drinkoteket</title></head>
        <body>
            <h1>{name}</h1>
            <p>Betyg: 4.0/5</p>
            <p>Tillredningstid: 5 minuter</p>
            <ul class="ingredients">
                <li><span>6 cl ljus rom</span><span>Ljus rom</span></li>
                <li><span>2 cl limejuice</span><span>Limejuice</span></li>
            </ul>
            <div class="display-recipe-terms">{category_anchors}</div>
        </body>
        </html>"#
    )
}

async fn mount_listing(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_recipe(server: &MockServer, slug: &str, body: String) {
    mount_listing(server, &format!("/recept/{}/", slug), body).await;
}

#[tokio::test]
async fn discovery_dedups_across_pages_and_keeps_encounter_order() {
    let server = MockServer::start().await;

    // Page 1 yields A,B,C with a next arrow; page 2 yields C,D with a
    // pagination anchor that does not advance; C must appear once
    mount_listing(&server, "/alla-drinkar/", listing_page(&["a", "b", "c"], true)).await;
    let mut page2 = listing_page(&["c", "d"], false);
    page2 = page2.replace(
        "</body>",
        "<a href=\"/alla-drinkar/page/2/\">2</a></body>",
    );
    mount_listing(&server, "/alla-drinkar/page/2/", page2).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Fetcher::new(&config.fetcher).unwrap();
    let crawler = ListingCrawler::new(&config.source).unwrap();

    let discovery = crawler.discover_all(&fetcher, Duration::ZERO).await;
    assert!(discovery.is_complete());

    let slugs: Vec<String> = discovery
        .urls()
        .iter()
        .map(|u| u.path().trim_matches('/').trim_start_matches("recept/").to_string())
        .collect();
    assert_eq!(slugs, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn discovery_stops_on_page_without_links() {
    let server = MockServer::start().await;

    mount_listing(&server, "/alla-drinkar/", listing_page(&["a", "b"], true)).await;
    // Page 2 exists but lists nothing: end of the listing
    mount_listing(&server, "/alla-drinkar/page/2/", listing_page(&[], false)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Fetcher::new(&config.fetcher).unwrap();
    let crawler = ListingCrawler::new(&config.source).unwrap();

    let discovery = crawler.discover_all(&fetcher, Duration::ZERO).await;
    assert!(discovery.is_complete());
    assert_eq!(discovery.urls().len(), 2);
}

#[tokio::test]
async fn discovery_failure_is_reported_as_partial() {
    let server = MockServer::start().await;

    mount_listing(&server, "/alla-drinkar/", listing_page(&["a", "b"], true)).await;
    Mock::given(method("GET"))
        .and(path("/alla-drinkar/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Fetcher::new(&config.fetcher).unwrap();
    let crawler = ListingCrawler::new(&config.source).unwrap();

    match crawler.discover_all(&fetcher, Duration::ZERO).await {
        Discovery::Partial {
            urls, failed_page, ..
        } => {
            // Everything gathered before the failure is kept
            assert_eq!(urls.len(), 2);
            assert_eq!(failed_page, 2);
        }
        Discovery::Complete(_) => panic!("expected a partial discovery"),
    }
}

#[tokio::test]
async fn full_run_isolates_per_url_failures() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/alla-drinkar/",
        listing_page(&["mojito", "daiquiri", "broken", "zombie", "negroni"], false),
    )
    .await;

    mount_recipe(&server, "mojito", recipe_page("Mojito", &["Rom"])).await;
    mount_recipe(&server, "daiquiri", recipe_page("Daiquiri", &["Rom"])).await;
    mount_recipe(&server, "zombie", recipe_page("Zombie", &["Rom", "Tiki"])).await;
    mount_recipe(&server, "negroni", recipe_page("Negroni", &["Gin"])).await;
    // URL #3 fails server-side; the run must continue past it
    Mock::given(method("GET"))
        .and(path("/recept/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    let stats = coordinator.run_all(None).await.unwrap();
    assert_eq!(stats.successes, 4);
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.processed, 5);
    assert!(!stats.aborted);

    // The records store holds exactly the four successes
    let store = JsonStore::new(dir.path());
    let recipes = store.load_recipes().unwrap();
    assert_eq!(recipes.len(), 4);
    assert!(recipes.iter().all(|r| !r.ingredients.is_empty()));
    assert!(recipes.iter().any(|r| r.slug == "mojito"));
    assert!(!recipes.iter().any(|r| r.slug == "broken"));
}

#[tokio::test]
async fn persisted_stores_are_mutually_consistent() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/alla-drinkar/",
        listing_page(&["mojito", "daiquiri"], false),
    )
    .await;
    mount_recipe(&server, "mojito", recipe_page("Mojito", &["Rom", "Sommardrinkar"])).await;
    mount_recipe(&server, "daiquiri", recipe_page("Daiquiri", &["Rom"])).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    let stats = coordinator.run_all(None).await.unwrap();
    assert_eq!(stats.successes, 2);
    assert_eq!(stats.category_count, 2);
    assert_eq!(stats.vocabulary_size, 2); // Ljus rom, Limejuice

    let store = JsonStore::new(dir.path());
    let recipes = store.load_recipes().unwrap();
    let categories: BTreeMap<String, Vec<String>> = store.load_categories().unwrap();
    let ingredients = store.load_ingredients().unwrap();

    // Every slug referenced by the category index exists in the records
    // store from the same run
    for (category, slugs) in &categories {
        for slug in slugs {
            assert!(
                recipes.iter().any(|r| &r.slug == slug),
                "category {} references unknown slug {}",
                category,
                slug
            );
        }
    }
    assert_eq!(categories["Rom"], vec!["mojito", "daiquiri"]);

    // Vocabulary matches the union of the records' ingredient names
    for recipe in &recipes {
        for name in &recipe.ingredient_names {
            assert!(ingredients.contains(name));
        }
    }
}

#[tokio::test]
async fn run_with_limit_caps_the_fetch_loop() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "/alla-drinkar/",
        listing_page(&["a", "b", "c", "d", "e", "f", "g"], false),
    )
    .await;
    for slug in ["a", "b", "c"] {
        mount_recipe(&server, slug, recipe_page(slug, &[])).await;
    }

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    let stats = coordinator.run_all(Some(3)).await.unwrap();
    assert_eq!(stats.urls_discovered, 7);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.successes, 3);
}

#[tokio::test]
async fn empty_listing_aborts_without_writing_files() {
    let server = MockServer::start().await;
    mount_listing(&server, "/alla-drinkar/", listing_page(&[], false)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    let stats = coordinator.run_all(None).await.unwrap();
    assert!(stats.aborted);
    assert_eq!(stats.processed, 0);

    assert!(!dir.path().join("recipes.json").exists());
    assert!(!dir.path().join("categories.json").exists());
    assert!(!dir.path().join("ingredients.json").exists());
}

#[tokio::test]
async fn rejected_pages_count_as_failures_not_crashes() {
    let server = MockServer::start().await;

    mount_listing(&server, "/alla-drinkar/", listing_page(&["mojito", "tom"], false)).await;
    mount_recipe(&server, "mojito", recipe_page("Mojito", &[])).await;
    // A page with a heading but no ingredients list fails the gate
    mount_recipe(
        &server,
        "tom",
        "<html><body><h1>Tom Collins</h1></body></html>".to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    let stats = coordinator.run_all(None).await.unwrap();
    assert_eq!(stats.successes, 1);
    assert_eq!(stats.failures, 1);
}

#[tokio::test]
async fn update_mode_reads_but_never_writes() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config("https://drinkoteket.se", dir.path());
    config.output.data_dir = dir.path().display().to_string();

    let coordinator = Coordinator::new(&config).unwrap();

    // No persisted data at all: loads succeed with empty defaults
    let stats = coordinator.update().unwrap();
    assert_eq!(stats.successes, 0);
    assert_eq!(stats.category_count, 0);
    assert!(!dir.path().join("recipes.json").exists());
}
