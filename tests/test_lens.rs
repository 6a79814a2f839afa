//! End-to-end resolve, fetch and render cycles against a mock EDHREC server.

mod common;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use edhrec_combos::config::PANEL_ID;
use edhrec_combos::{
    ComboLens, ComboLensBuilder, PageTree, RefreshOutcome, Selector, WatchState,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn builder(base_url: &str) -> ComboLensBuilder {
    ComboLens::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .debounce(Duration::from_millis(30))
        .retry_delay(Duration::from_millis(20))
}

fn has_panel(page: &Mutex<PageTree>) -> bool {
    page.lock().unwrap().find_by_id(PANEL_ID).is_some()
}

async fn mount_dockside(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/dockside-extortionist.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::dockside_body()))
        .mount(server)
        .await;
}

async fn mount_birgi_forbidden(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/birgi-god-of-storytelling.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// builder
// ---------------------------------------------------------------------------

#[test]
fn build_rejects_empty_panel_id() {
    assert!(ComboLens::builder().panel_id("  ").build().is_err());
}

#[test]
fn display_shows_configuration() {
    let lens = builder("https://combos.example/pages/combos/").build().unwrap();
    assert_eq!(
        lens.to_string(),
        "ComboLens(base_url=https://combos.example/pages/combos, panel_id=edhrec-combos-panel, cached=0)"
    );
}

// ---------------------------------------------------------------------------
// refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_shows_combos_for_previewed_card() {
    common::init_logging();
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;

    let base_url = mock_server.uri();
    let (outcome, page) = tokio::task::spawn_blocking(move || {
        let lens = builder(&base_url).build().unwrap();
        let page = Mutex::new(common::deck_page(common::DOCKSIDE_HASH));
        (lens.refresh(&page), page)
    })
    .await
    .unwrap();

    assert_eq!(
        outcome,
        RefreshOutcome::Shown {
            card_name: "Dockside Extortionist".to_string(),
            combos: 2,
        }
    );
    let page = page.into_inner().unwrap();
    let entries = page.roots[0].find_all(&Selector::class("edhrec-combo"));
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn refresh_clears_panel_when_card_has_no_combos() {
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;
    mount_birgi_forbidden(&mock_server).await;

    let base_url = mock_server.uri();
    let (first, second, panel_left) = tokio::task::spawn_blocking(move || {
        let lens = builder(&base_url).build().unwrap();
        let page = Mutex::new(common::deck_page(common::DOCKSIDE_HASH));
        let first = lens.refresh(&page);
        page.lock().unwrap().set_attribute(
            &Selector::tag("img"),
            "src",
            &common::preview_src(common::BIRGI_HASH),
        );
        let second = lens.refresh(&page);
        (first, second, has_panel(&page))
    })
    .await
    .unwrap();

    assert!(matches!(first, RefreshOutcome::Shown { .. }));
    assert_eq!(second, RefreshOutcome::Cleared);
    assert!(!panel_left);
}

#[tokio::test]
async fn refresh_without_resolvable_card_skips_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::dockside_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        let lens = builder(&base_url).build().unwrap();
        let page = Mutex::new(common::deck_page(common::UNLISTED_HASH));
        lens.refresh(&page)
    })
    .await
    .unwrap();

    assert_eq!(outcome, RefreshOutcome::Cleared);
}

#[tokio::test]
async fn refresh_reports_missing_anchor() {
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;

    let base_url = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut selectors = edhrec_combos::Selectors::default();
        selectors.render_anchor = Selector::id("not-on-this-page");
        let lens = builder(&base_url).selectors(selectors).build().unwrap();
        let page = Mutex::new(common::deck_page(common::DOCKSIDE_HASH));
        lens.refresh(&page)
    })
    .await
    .unwrap();

    assert_eq!(outcome, RefreshOutcome::NoAnchor);
}

#[tokio::test]
async fn slow_response_does_not_overwrite_newer_card() {
    common::init_logging();
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dockside-extortionist.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::dockside_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    mount_birgi_forbidden(&mock_server).await;

    let base_url = mock_server.uri();
    let (slow, fast, panel_left) = tokio::task::spawn_blocking(move || {
        let lens = Arc::new(builder(&base_url).build().unwrap());
        let page = Arc::new(Mutex::new(common::deck_page(common::DOCKSIDE_HASH)));

        let slow = {
            let lens = lens.clone();
            let page = page.clone();
            thread::spawn(move || lens.refresh(&page))
        };
        thread::sleep(Duration::from_millis(150));
        page.lock().unwrap().set_attribute(
            &Selector::tag("img"),
            "src",
            &common::preview_src(common::BIRGI_HASH),
        );
        let fast = lens.refresh(&page);
        let slow = slow.join().unwrap();
        (slow, fast, has_panel(&page))
    })
    .await
    .unwrap();

    assert_eq!(fast, RefreshOutcome::Cleared);
    assert_eq!(slow, RefreshOutcome::Superseded);
    assert!(!panel_left);
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watcher_follows_preview_changes() {
    common::init_logging();
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;
    mount_birgi_forbidden(&mock_server).await;

    let base_url = mock_server.uri();
    tokio::task::spawn_blocking(move || {
        let lens = Arc::new(builder(&base_url).build().unwrap());
        let page = Arc::new(Mutex::new(common::deck_page(common::DOCKSIDE_HASH)));
        let handle = lens.watch(page.clone());

        // Initial run on attach
        assert!(common::wait_until(Duration::from_secs(3), || has_panel(&page)));

        page.lock().unwrap().set_attribute(
            &Selector::tag("img"),
            "src",
            &common::preview_src(common::BIRGI_HASH),
        );
        handle.notify();
        assert!(common::wait_until(Duration::from_secs(3), || !has_panel(&page)));

        page.lock().unwrap().set_attribute(
            &Selector::tag("img"),
            "src",
            &common::preview_src(common::DOCKSIDE_HASH),
        );
        handle.notify();
        assert!(common::wait_until(Duration::from_secs(3), || has_panel(&page)));

        handle.stop();
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn watcher_waits_for_watch_root() {
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;

    let base_url = mock_server.uri();
    tokio::task::spawn_blocking(move || {
        let lens = Arc::new(builder(&base_url).build().unwrap());
        let page = Arc::new(Mutex::new(PageTree::default()));
        let handle = lens.watch(page.clone());

        thread::sleep(Duration::from_millis(100));
        assert_eq!(handle.state(), WatchState::Uninitialized);

        *page.lock().unwrap() = common::deck_page(common::DOCKSIDE_HASH);
        assert!(common::wait_until(Duration::from_secs(3), || has_panel(&page)));
        handle.stop();
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn starting_second_watcher_stops_first() {
    let mock_server = MockServer::start().await;
    mount_dockside(&mock_server).await;

    let base_url = mock_server.uri();
    tokio::task::spawn_blocking(move || {
        let lens = Arc::new(builder(&base_url).build().unwrap());
        let page = Arc::new(Mutex::new(common::deck_page(common::DOCKSIDE_HASH)));

        let first = lens.watch(page.clone());
        assert!(common::wait_until(Duration::from_secs(3), || {
            first.state() == WatchState::Watching
        }));

        let second = lens.watch(page.clone());
        assert!(common::wait_until(Duration::from_secs(3), || {
            second.state() == WatchState::Watching
        }));
        assert!(common::wait_until(Duration::from_secs(3), || {
            first.state() == WatchState::Stopped
        }));
        assert_eq!(second.state(), WatchState::Watching);

        assert!(lens.stop_watching());
        assert!(common::wait_until(Duration::from_secs(3), || {
            second.state() == WatchState::Stopped
        }));
        assert!(!lens.stop_watching());

        first.stop();
        second.stop();
    })
    .await
    .unwrap();
}
