//! Navigation intents: the points where the flow leaves the current page.
//!
//! The core never reloads or redirects by itself. It hands a
//! `NavigationIntent` to an injected `Navigator`, which in a browser host maps
//! to `location.href` / `location.reload()` and in tests just records it.

use std::sync::Mutex;

use tokio::sync::mpsc;

/// A request to leave the current screen's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Full navigation to another URL.
    Redirect(String),
    /// Reload the current page, discarding the session.
    Reload,
}

impl std::fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redirect(url) => write!(f, "redirect to {url}"),
            Self::Reload => write!(f, "reload"),
        }
    }
}

/// Host-side handler for navigation intents.
pub trait Navigator: Send + Sync {
    fn navigate(&self, intent: NavigationIntent);
}

/// Forwards intents over an unbounded channel.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<NavigationIntent>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, intent: NavigationIntent) {
        tracing::info!(%intent, "Navigation requested");
        if self.tx.send(intent).is_err() {
            tracing::warn!("Navigation receiver dropped; intent discarded");
        }
    }
}

/// Keeps every intent in order. Useful for hosts that poll, and for tests.
#[derive(Default)]
pub struct RecordingNavigator {
    intents: Mutex<Vec<NavigationIntent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> Vec<NavigationIntent> {
        self.intents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, intent: NavigationIntent) {
        if let Ok(mut guard) = self.intents.lock() {
            guard.push(intent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_navigator_forwards_in_order() {
        let (nav, mut rx) = ChannelNavigator::new();
        nav.navigate(NavigationIntent::Redirect("https://book.example.com".into()));
        nav.navigate(NavigationIntent::Reload);

        assert_eq!(
            rx.recv().await,
            Some(NavigationIntent::Redirect("https://book.example.com".into()))
        );
        assert_eq!(rx.recv().await, Some(NavigationIntent::Reload));
    }

    #[test]
    fn channel_navigator_survives_dropped_receiver() {
        let (nav, rx) = ChannelNavigator::new();
        drop(rx);
        nav.navigate(NavigationIntent::Reload);
    }

    #[test]
    fn recording_navigator_keeps_history() {
        let nav = RecordingNavigator::new();
        nav.navigate(NavigationIntent::Reload);
        nav.navigate(NavigationIntent::Reload);
        assert_eq!(nav.intents().len(), 2);
    }
}
