//! Action Dispatcher
//!
//! Maps typed voice actions to client-side effects, in order, through an
//! `ActionSink`. Each dispatch is independent: no rollback, and a failed or
//! skipped action does not stop the batch.
//!
//! | Action           | Effect                                      |
//! |------------------|---------------------------------------------|
//! | `navigate`       | redirect to `parameters.path`               |
//! | `create_listing` | redirect to `/artisan/products/create`      |
//! | `search`         | redirect to `/catalog?search=<query>`       |
//! | `help`           | speak the help message                      |
//! | `update_order`   | skipped (no client-side effect)             |

use crate::models::{Directive, VoiceAction};
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Listing-creation entry point
pub const CREATE_LISTING_PATH: &str = "/artisan/products/create";

/// Catalog page receiving search queries
pub const CATALOG_PATH: &str = "/catalog";

/// Spoken for `help` actions
pub const HELP_MESSAGE: &str = "I can help you navigate the platform, create product listings, search for products, and manage your orders. What would you like to do?";

/// Effect could not be performed
#[derive(Debug, Error)]
#[error("Action effect failed: {0}")]
pub struct SinkError(pub String);

/// Receiver of dispatched effects
pub trait ActionSink {
    fn redirect(&mut self, location: &str) -> Result<(), SinkError>;
    fn speak(&mut self, text: &str) -> Result<(), SinkError>;
}

/// Sink collecting effects as `Directive`s for an HTTP response
#[derive(Debug, Default)]
pub struct DirectiveCollector {
    directives: Vec<Directive>,
}

impl DirectiveCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_directives(self) -> Vec<Directive> {
        self.directives
    }
}

impl ActionSink for DirectiveCollector {
    fn redirect(&mut self, location: &str) -> Result<(), SinkError> {
        self.directives.push(Directive::Redirect {
            location: location.to_string(),
        });
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<(), SinkError> {
        self.directives.push(Directive::Speak {
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Counts for one dispatched batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub performed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What one action resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    Redirect(String),
    Speak(&'static str),
    Skip(&'static str),
}

#[derive(Debug, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch actions in order
    pub fn dispatch(&self, actions: &[VoiceAction], sink: &mut dyn ActionSink) -> DispatchReport {
        let mut report = DispatchReport::default();

        for action in actions {
            let result = match resolve(action) {
                Effect::Redirect(location) => sink.redirect(&location),
                Effect::Speak(text) => sink.speak(text),
                Effect::Skip(reason) => {
                    debug!(action = action.kind(), reason, "Action skipped");
                    report.skipped += 1;
                    continue;
                }
            };

            match result {
                Ok(()) => report.performed += 1,
                Err(e) => {
                    warn!(action = action.kind(), error = %e, "Action dispatch failed, continuing");
                    report.failed += 1;
                }
            }
        }

        if !actions.is_empty() {
            info!(
                performed = report.performed,
                skipped = report.skipped,
                failed = report.failed,
                "Actions dispatched"
            );
        }

        report
    }

    /// Dispatch into a fresh `DirectiveCollector` and return its directives
    pub fn collect_directives(&self, actions: &[VoiceAction]) -> Vec<Directive> {
        let mut collector = DirectiveCollector::new();
        self.dispatch(actions, &mut collector);
        collector.into_directives()
    }
}

fn resolve(action: &VoiceAction) -> Effect {
    match action {
        VoiceAction::Navigate(params) => match non_blank(&params.path) {
            Some(path) => Effect::Redirect(path.to_string()),
            None => Effect::Skip("navigate without path"),
        },
        VoiceAction::CreateListing(_) => Effect::Redirect(CREATE_LISTING_PATH.to_string()),
        VoiceAction::Search(params) => match non_blank(&params.query) {
            Some(query) => Effect::Redirect(search_location(query)),
            None => Effect::Skip("search without query"),
        },
        VoiceAction::Help(_) => Effect::Speak(HELP_MESSAGE),
        VoiceAction::UpdateOrder(_) => Effect::Skip("update_order has no client-side effect"),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `/catalog?search=<url-encoded query>`
///
/// # Examples
///
/// ```
/// use kalakar_ai::services::action_dispatcher::search_location;
///
/// assert_eq!(search_location("brass lamp & diya"), "/catalog?search=brass+lamp+%26+diya");
/// ```
pub fn search_location(query: &str) -> String {
    let encoded = match Url::parse("http://localhost/") {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("search", query);
            url.query().unwrap_or_default().to_string()
        }
        Err(_) => format!("search={}", query),
    };
    format!("{}?{}", CATALOG_PATH, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateListingParams, HelpParams, NavigateParams, SearchParams, UpdateOrderParams};

    struct FailingSink;

    impl ActionSink for FailingSink {
        fn redirect(&mut self, _location: &str) -> Result<(), SinkError> {
            Err(SinkError("router unavailable".into()))
        }

        fn speak(&mut self, _text: &str) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn navigate(path: Option<&str>) -> VoiceAction {
        VoiceAction::Navigate(NavigateParams {
            path: path.map(String::from),
        })
    }

    #[test]
    fn test_dispatch_in_order() {
        let actions = vec![
            navigate(Some("/artisan/orders")),
            VoiceAction::CreateListing(CreateListingParams::default()),
            VoiceAction::Search(SearchParams {
                query: Some("madhubani painting".into()),
            }),
            VoiceAction::Help(HelpParams::default()),
        ];

        let mut collector = DirectiveCollector::new();
        let report = ActionDispatcher::new().dispatch(&actions, &mut collector);

        assert_eq!(report, DispatchReport { performed: 4, skipped: 0, failed: 0 });
        assert_eq!(
            collector.into_directives(),
            vec![
                Directive::Redirect { location: "/artisan/orders".into() },
                Directive::Redirect { location: CREATE_LISTING_PATH.into() },
                Directive::Redirect { location: "/catalog?search=madhubani+painting".into() },
                Directive::Speak { text: HELP_MESSAGE.into() },
            ]
        );
    }

    #[test]
    fn test_missing_parameters_and_update_order_skipped() {
        let actions = vec![
            navigate(None),
            navigate(Some("  ")),
            VoiceAction::Search(SearchParams::default()),
            VoiceAction::UpdateOrder(UpdateOrderParams {
                order_id: Some("ord-1".into()),
                status: Some("shipped".into()),
            }),
        ];

        let mut collector = DirectiveCollector::new();
        let report = ActionDispatcher::new().dispatch(&actions, &mut collector);

        assert_eq!(report, DispatchReport { performed: 0, skipped: 4, failed: 0 });
        assert!(collector.into_directives().is_empty());
    }

    #[test]
    fn test_failed_effect_does_not_stop_batch() {
        let actions = vec![navigate(Some("/cart")), VoiceAction::Help(HelpParams::default())];
        let report = ActionDispatcher::new().dispatch(&actions, &mut FailingSink);
        assert_eq!(report, DispatchReport { performed: 1, skipped: 0, failed: 1 });
    }

    #[test]
    fn test_search_location_encoding() {
        assert_eq!(search_location("पीतल दीया"), "/catalog?search=%E0%A4%AA%E0%A5%80%E0%A4%A4%E0%A4%B2+%E0%A4%A6%E0%A5%80%E0%A4%AF%E0%A4%BE");
    }
}
