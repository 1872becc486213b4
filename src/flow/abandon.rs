//! Abandonment handlers: the result screen's close and "not now" actions.
//!
//! Both send a beacon and move on without waiting for it.

use tracing::{info, warn};

use crate::error::Error;
use crate::navigation::NavigationIntent;
use crate::submission::AbandonSource;

use super::session::AssessmentSession;

impl AssessmentSession {
    /// Close the result screen and reload the page.
    ///
    /// Sends the abandonment beacon first, unless the lead already saved
    /// their results with "not now".
    pub async fn close_result(&self) -> Result<(), Error> {
        let lead = self.result_lead("close the result").await?;
        let already_abandoned = self
            .flow
            .read()
            .await
            .result()
            .is_some_and(|m| m.is_abandoned_confirmation());

        if !already_abandoned {
            if let Err(e) = self.submission.beacon_abandon(AbandonSource::Close, &lead) {
                warn!(session_id = %self.id(), "Abandonment beacon failed: {}", e);
            }
        }

        info!(session_id = %self.id(), beacon = !already_abandoned, "Result closed");
        self.navigator().navigate(NavigationIntent::Reload);
        Ok(())
    }

    /// "Not now, just email me the results": one-shot.
    ///
    /// The confirmation is swapped in before the beacon goes out, so a
    /// concurrent second call sees `AlreadyAbandoned`.
    pub async fn not_now(&self) -> Result<(), Error> {
        let lead = {
            let mut flow = self.flow.write().await;
            flow.mark_not_now()?;
            flow.lead().cloned()
        };

        match lead {
            Some(lead) => {
                if let Err(e) = self.submission.beacon_abandon(AbandonSource::NotNow, &lead) {
                    warn!(session_id = %self.id(), "Abandonment beacon failed: {}", e);
                }
            }
            None => warn!(session_id = %self.id(), "No lead captured; abandonment beacon skipped"),
        }

        info!(session_id = %self.id(), "Results saved for later");
        Ok(())
    }
}
