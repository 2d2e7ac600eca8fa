//! Notification collaborator: composes and delivers participant emails.
//!
//! Delivery is always fire-and-forget. The event service spawns it off the
//! request path and a failed delivery never surfaces as a request failure;
//! it only leaves a warning in the logs.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Event context rendered into every notification body.
#[derive(Debug, Clone)]
pub struct EventNote {
    /// Human-readable event date ("June 01, 2024").
    pub date: String,
    /// Event description.
    pub description: String,
}

/// One invitation to deliver right after event creation.
#[derive(Debug, Clone)]
pub struct Invitation {
    /// Recipient address.
    pub to: String,
    /// That recipient's secret management link.
    pub link: String,
}

/// Error raised when a notification could not be delivered.
#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Collaborator contract for outbound participant notifications.
pub trait FlakeNotifier: Send + Sync {
    /// Deliver each participant their secret link after creation.
    fn invitations(
        &self,
        note: EventNote,
        invitations: Vec<Invitation>,
    ) -> BoxFuture<'static, Result<(), NotifyError>>;

    /// Tell both participants that both of them are feeling flakey.
    fn both_flaked(
        &self,
        note: EventNote,
        recipients: [String; 2],
    ) -> BoxFuture<'static, Result<(), NotifyError>>;

    /// Tell the *other* participant that the caller's flake status moved.
    fn flake_changed(
        &self,
        note: EventNote,
        other: String,
    ) -> BoxFuture<'static, Result<(), NotifyError>>;
}

/// Spawn a delivery future off the request path, logging any failure.
pub fn spawn_delivery(
    fut: BoxFuture<'static, Result<(), NotifyError>>,
    context: &'static str,
) {
    tokio::spawn(async move {
        if let Err(err) = fut.await {
            warn!(error = %err, context, "notification delivery failed");
        }
    });
}

/// Pick the notifier implied by the configuration: the webhook relay when one
/// is configured (and compiled in), a log-only notifier otherwise.
pub fn from_config(config: &AppConfig) -> Arc<dyn FlakeNotifier> {
    #[cfg(feature = "webhook-notify")]
    if let Some(relay_url) = &config.mail_relay_url {
        return Arc::new(WebhookNotifier::new(
            relay_url.clone(),
            config.mail_from.clone(),
        ));
    }

    if config.mail_relay_url.is_some() {
        warn!("mail relay configured but webhook-notify feature is disabled; logging only");
    }
    Arc::new(LogNotifier)
}

const INVITATION_SUBJECT: &str = "You've been invited to a FlakeDate event!";
const BOTH_FLAKED_SUBJECT: &str = "FlakeDate Update: Both parties are feeling flakey!";
const FLAKE_CHANGED_SUBJECT: &str = "FlakeDate Update: Flake status changed";

fn invitation_body(note: &EventNote, link: &str) -> String {
    format!(
        "Hello!\n\n\
         You've been invited to a FlakeDate event on {}.\n\n\
         Event description: {}\n\n\
         To view and manage your event, please visit this link:\n{}\n\n\
         Remember, this link is secret and unique to you. Don't share it with anyone else!\n\n\
         Best regards,\nThe FlakeDate Team",
        note.date, note.description, link
    )
}

fn both_flaked_body(note: &EventNote) -> String {
    format!(
        "Hello!\n\n\
         We wanted to let you know that both you and the other participant for the event \
         on {} are feeling flakey.\n\n\
         Event description: {}\n\n\
         You might want to consider rescheduling or confirming your plans.\n\n\
         Best regards,\nThe FlakeDate Team",
        note.date, note.description
    )
}

fn flake_changed_body(note: &EventNote) -> String {
    format!(
        "Hello!\n\n\
         The flake status for your event on {} has been updated.\n\n\
         Event description: {}\n\n\
         You can check the current status by visiting your event page.\n\n\
         Best regards,\nThe FlakeDate Team",
        note.date, note.description
    )
}

/// Log-only notifier used when no mail relay is configured.
pub struct LogNotifier;

impl FlakeNotifier for LogNotifier {
    fn invitations(
        &self,
        note: EventNote,
        invitations: Vec<Invitation>,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        for invitation in &invitations {
            info!(to = %invitation.to, date = %note.date, "would send invitation");
        }
        futures::future::ready(Ok(())).boxed()
    }

    fn both_flaked(
        &self,
        note: EventNote,
        recipients: [String; 2],
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        for to in &recipients {
            info!(%to, date = %note.date, "would send both-flaked notice");
        }
        futures::future::ready(Ok(())).boxed()
    }

    fn flake_changed(
        &self,
        note: EventNote,
        other: String,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        info!(to = %other, date = %note.date, "would send flake-changed notice");
        futures::future::ready(Ok(())).boxed()
    }
}

/// Notifier that POSTs composed messages as JSON to a mail relay endpoint.
#[cfg(feature = "webhook-notify")]
pub struct WebhookNotifier {
    client: reqwest::Client,
    relay_url: String,
    from: String,
}

#[cfg(feature = "webhook-notify")]
impl WebhookNotifier {
    /// Build a notifier pointed at `relay_url`, sending as `from`.
    pub fn new(relay_url: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
            from,
        }
    }

    fn deliver(
        &self,
        messages: Vec<(String, &'static str, String)>,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        let client = self.client.clone();
        let relay_url = self.relay_url.clone();
        let from = self.from.clone();

        async move {
            for (target, subject, body) in messages {
                let payload = serde_json::json!({
                    "from": from,
                    "target": target,
                    "subject": subject,
                    "body": body,
                });

                let response = client
                    .post(&relay_url)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|err| NotifyError(format!("relay unreachable: {err}")))?;

                if !response.status().is_success() {
                    return Err(NotifyError(format!(
                        "relay rejected message for {target}: {}",
                        response.status()
                    )));
                }
                info!(to = %target, subject, "notification sent");
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(feature = "webhook-notify")]
impl FlakeNotifier for WebhookNotifier {
    fn invitations(
        &self,
        note: EventNote,
        invitations: Vec<Invitation>,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        let messages = invitations
            .into_iter()
            .map(|invitation| {
                let body = invitation_body(&note, &invitation.link);
                (invitation.to, INVITATION_SUBJECT, body)
            })
            .collect();
        self.deliver(messages)
    }

    fn both_flaked(
        &self,
        note: EventNote,
        recipients: [String; 2],
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        let body = both_flaked_body(&note);
        let messages = recipients
            .into_iter()
            .map(|to| (to, BOTH_FLAKED_SUBJECT, body.clone()))
            .collect();
        self.deliver(messages)
    }

    fn flake_changed(
        &self,
        note: EventNote,
        other: String,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        self.deliver(vec![(other, FLAKE_CHANGED_SUBJECT, flake_changed_body(&note))])
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording notifier used by service-level tests.

    use std::sync::Mutex;

    use super::*;

    /// One recorded delivery attempt.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Recorded {
        /// Invitation recipients, in slot order.
        Invitations(Vec<String>),
        /// Both-flaked recipients.
        BothFlaked([String; 2]),
        /// Flake-changed recipient.
        FlakeChanged(String),
    }

    /// Notifier that appends every call to an in-memory log.
    #[derive(Default)]
    pub struct RecordingNotifier {
        log: Mutex<Vec<Recorded>>,
    }

    impl RecordingNotifier {
        /// Snapshot the recorded calls so far.
        pub fn recorded(&self) -> Vec<Recorded> {
            self.log.lock().unwrap().clone()
        }

        /// Count of recorded both-flaked notifications.
        pub fn both_flaked_count(&self) -> usize {
            self.recorded()
                .iter()
                .filter(|entry| matches!(entry, Recorded::BothFlaked(_)))
                .count()
        }
    }

    impl FlakeNotifier for RecordingNotifier {
        fn invitations(
            &self,
            _note: EventNote,
            invitations: Vec<Invitation>,
        ) -> BoxFuture<'static, Result<(), NotifyError>> {
            self.log.lock().unwrap().push(Recorded::Invitations(
                invitations.into_iter().map(|i| i.to).collect(),
            ));
            futures::future::ready(Ok(())).boxed()
        }

        fn both_flaked(
            &self,
            _note: EventNote,
            recipients: [String; 2],
        ) -> BoxFuture<'static, Result<(), NotifyError>> {
            self.log.lock().unwrap().push(Recorded::BothFlaked(recipients));
            futures::future::ready(Ok(())).boxed()
        }

        fn flake_changed(
            &self,
            _note: EventNote,
            other: String,
        ) -> BoxFuture<'static, Result<(), NotifyError>> {
            self.log.lock().unwrap().push(Recorded::FlakeChanged(other));
            futures::future::ready(Ok(())).boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_body_carries_link_and_description() {
        let note = EventNote {
            date: "June 01, 2024".into(),
            description: "Coffee".into(),
        };
        let body = invitation_body(&note, "https://flakedate.com/event/abc");
        assert!(body.contains("June 01, 2024"));
        assert!(body.contains("Coffee"));
        assert!(body.contains("https://flakedate.com/event/abc"));
    }

    #[test]
    fn both_flaked_body_mentions_both_parties() {
        let note = EventNote {
            date: "June 01, 2024".into(),
            description: "Coffee".into(),
        };
        let body = both_flaked_body(&note);
        assert!(body.contains("both you and the other participant"));
    }
}
