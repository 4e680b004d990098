//! Web questions - read-only queries answered through [`BrowseTheWeb`]

use crate::browse::BrowseTheWeb;
use async_trait::async_trait;
use screenplay_core::{Actor, Question, ScreenplayError};

/// The current page title
#[derive(Debug)]
pub struct PageTitle;

impl PageTitle {
    /// Build the question
    #[inline]
    #[must_use]
    pub fn shown() -> Self {
        Self
    }
}

#[async_trait]
impl Question for PageTitle {
    type Answer = String;

    fn question(&self) -> String {
        "the page title".to_string()
    }

    async fn answered_by(&self, actor: &Actor) -> Result<String, ScreenplayError> {
        actor.ability::<BrowseTheWeb>()?.title().await
    }
}

/// The current page URL
#[derive(Debug)]
pub struct CurrentUrl;

impl CurrentUrl {
    /// Build the question
    #[inline]
    #[must_use]
    pub fn shown() -> Self {
        Self
    }
}

#[async_trait]
impl Question for CurrentUrl {
    type Answer = String;

    fn question(&self) -> String {
        "the current URL".to_string()
    }

    async fn answered_by(&self, actor: &Actor) -> Result<String, ScreenplayError> {
        actor.ability::<BrowseTheWeb>()?.current_url().await
    }
}

/// Whether a selector currently matches a visible element
#[derive(Debug)]
pub struct ElementVisibility {
    selector: String,
}

impl ElementVisibility {
    /// Build the question for the given selector
    #[must_use]
    pub fn of(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl Question for ElementVisibility {
    type Answer = bool;

    fn question(&self) -> String {
        format!("visibility of {}", self.selector)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<bool, ScreenplayError> {
        actor
            .ability::<BrowseTheWeb>()?
            .is_visible(&self.selector)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockPageDriver;
    use screenplay_config::Settings;
    use screenplay_core::Actor;

    fn browsing_actor(driver: MockPageDriver) -> Actor {
        let actor = Actor::named("Alice");
        actor
            .can(BrowseTheWeb::with_driver(
                Box::new(driver),
                &Settings::default(),
            ))
            .unwrap();
        actor
    }

    #[tokio::test]
    async fn page_title_is_read_fresh_each_time() {
        let mut driver = MockPageDriver::new();
        driver
            .expect_title()
            .times(2)
            .returning(|| Ok("Azure ML Studio".to_string()));

        let actor = browsing_actor(driver);
        assert_eq!(actor.asks_for(PageTitle::shown()).await.unwrap(), "Azure ML Studio");
        assert_eq!(actor.asks_for(PageTitle::shown()).await.unwrap(), "Azure ML Studio");
    }

    #[tokio::test]
    async fn element_visibility_feeds_should() {
        let mut driver = MockPageDriver::new();
        driver
            .expect_is_visible()
            .returning(|selector| Ok(selector == "[data-testid='workspace-selector']"));

        let actor = browsing_actor(driver);
        actor
            .should(ElementVisibility::of("[data-testid='workspace-selector']"))
            .await
            .unwrap();

        let err = actor
            .should(ElementVisibility::of("[data-testid='nav-compute']"))
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("nav-compute"));
    }
}
