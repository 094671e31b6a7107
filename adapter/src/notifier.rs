use async_trait::async_trait;
use kernel::model::notification::TransitionNotice;
use kernel::notifier::NotificationGateway;
use shared::config::NotifierConfig;

/// Delivers transition notices to the external notification service as JSON
/// over HTTP. Failures are logged and swallowed: the state transition that
/// produced the notice has already committed and must not be rolled back.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: config.webhook_url.clone(),
        }
    }
}

#[async_trait]
impl NotificationGateway for WebhookNotifier {
    async fn publish(&self, notice: TransitionNotice) {
        let Some(url) = &self.webhook_url else {
            tracing::debug!(
                reservation_id = %notice.reservation_id,
                new_state = %notice.new_state,
                "no notification webhook configured; notice dropped"
            );
            return;
        };

        match self.client.post(url).json(&notice).send().await {
            Ok(res) if res.status().is_success() => {
                tracing::debug!(
                    reservation_id = %notice.reservation_id,
                    new_state = %notice.new_state,
                    "transition notice delivered"
                );
            }
            Ok(res) => {
                tracing::warn!(
                    reservation_id = %notice.reservation_id,
                    status = %res.status(),
                    "notification service answered with an error status"
                );
            }
            Err(e) => {
                tracing::warn!(
                    reservation_id = %notice.reservation_id,
                    error = %e,
                    "failed to deliver transition notice"
                );
            }
        }
    }
}
