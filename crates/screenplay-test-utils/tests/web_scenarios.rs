//! End-to-end browser scenarios against the scriptable page stub

use screenplay_config::Settings;
use screenplay_core::{Actor, RunContext, Task};
use screenplay_test_utils::{init_test_logging, StubPage};
use screenplay_web::{
    BrowseTheWeb, CaptureScreenshot, CurrentUrl, ElementVisibility, NavigateTo, OpenWorkspace,
    PageTitle, SignIn,
};

fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.timeouts.default_ms = 100;
    settings.timeouts.navigation_ms = 100;
    settings.timeouts.poll_interval_ms = 5;
    settings.retry.delay_ms = 5;
    settings
}

async fn browsing_actor(name: &str, page: &StubPage) -> Actor {
    let settings = fast_settings();
    let actor = Actor::named(name).with_context(RunContext::new(settings.clone()));
    actor
        .acquire(BrowseTheWeb::with_driver(Box::new(page.clone()), &settings))
        .await
        .unwrap();
    actor
}

#[tokio::test]
async fn alice_signs_in_and_opens_her_workspace() {
    init_test_logging();
    let page = StubPage::new().with_visible(&[
        "#i0116",
        "#i0118",
        "#KmsiCheckboxField",
        "[data-testid='workspace-selector']",
        "[data-testid='workspace-option'][data-workspace='ws-e2e']",
    ]);
    let alice = browsing_actor("Alice", &page).await;

    let tasks: Vec<Box<dyn Task>> = vec![
        Box::new(NavigateTo::url("https://ml.azure.com").unwrap()),
        Box::new(SignIn::with_credentials("alice@example.com", "hunter2").unwrap()),
        Box::new(OpenWorkspace::named("ws-e2e").unwrap()),
    ];
    alice.attempts_to_all(tasks).await.unwrap();

    let actions = page.recorded_actions();
    assert!(actions.contains(&"goto https://ml.azure.com".to_string()));
    assert!(actions.contains(&"fill #i0116=alice@example.com".to_string()));
    assert!(actions.contains(&"fill #i0118=hunter2".to_string()));
    // Username submit, password submit, stay-signed-in confirmation.
    let submits = actions
        .iter()
        .filter(|a| a.as_str() == "click #idSIButton9")
        .count();
    assert_eq!(submits, 3);
    assert!(actions
        .iter()
        .any(|a| a.contains("click [data-testid='workspace-option']")));
}

#[tokio::test]
async fn flaky_clicks_are_retried_within_budget() {
    init_test_logging();
    let page = StubPage::new()
        .with_visible(&[
            "[data-testid='workspace-selector']",
            "[data-testid='workspace-option'][data-workspace='ws-e2e']",
        ])
        .with_failing_clicks("[data-testid='workspace-selector']", 2);
    let alice = browsing_actor("Alice", &page).await;

    alice
        .attempts_to(OpenWorkspace::named("ws-e2e").unwrap())
        .await
        .unwrap();

    let actions = page.recorded_actions();
    let failed = actions
        .iter()
        .filter(|a| a.as_str() == "click [data-testid='workspace-selector'] (failed)")
        .count();
    assert_eq!(failed, 2);
}

#[tokio::test]
async fn opening_a_workspace_times_out_when_the_picker_never_shows() {
    init_test_logging();
    let page = StubPage::new();
    let alice = browsing_actor("Alice", &page).await;

    let err = alice
        .attempts_to(OpenWorkspace::named("ws-e2e").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(err.to_string().contains("workspace-selector"));
}

#[tokio::test]
async fn questions_read_the_live_page() {
    init_test_logging();
    let page = StubPage::new()
        .with_title("Azure ML Studio | ws-e2e")
        .with_visible(&["[data-testid='nav-compute']"]);
    let alice = browsing_actor("Alice", &page).await;

    alice
        .attempts_to(NavigateTo::url("https://ml.azure.com/workspaces").unwrap())
        .await
        .unwrap();

    assert_eq!(
        alice.asks_for(CurrentUrl::shown()).await.unwrap(),
        "https://ml.azure.com/workspaces"
    );
    alice
        .should(ElementVisibility::of("[data-testid='nav-compute']"))
        .await
        .unwrap();
    alice
        .should_see(PageTitle::shown(), |title| {
            anyhow::ensure!(title.contains("ws-e2e"), "title was {title}");
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn screenshots_are_captured_on_demand() {
    init_test_logging();
    let page = StubPage::new();
    let alice = browsing_actor("Alice", &page).await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("failure.png");
    alice
        .attempts_to(CaptureScreenshot::to(target.clone()))
        .await
        .unwrap();

    assert!(page
        .recorded_actions()
        .contains(&format!("screenshot {}", target.display())));
}

#[tokio::test]
async fn disposal_closes_the_page_exactly_once() {
    init_test_logging();
    let page = StubPage::new();
    let alice = browsing_actor("Alice", &page).await;

    let report = alice.dispose().await;
    assert!(report.is_clean());
    assert!(page.was_closed());

    // A second dispose neither re-closes nor fails.
    let report = alice.dispose().await;
    assert!(report.is_clean());
}
