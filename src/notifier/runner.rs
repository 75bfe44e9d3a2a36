use super::message::{build_payload, Notification};
use super::time::{format_event_time, target_time};
use crate::config::Config;
use crate::error::AppResult;
use crate::slack::MessageSender;
use crate::store::EventStore;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

/// One match-and-notify pass: find every event starting exactly at the
/// target minute and post a notification to each owner's channel.
/// Returns the number of attempted dispatches.
///
/// Lookups that come back empty abort the whole pass; a failed post is
/// logged and only costs that recipient their notification.
pub async fn run_notification_pass(
    store: &dyn EventStore,
    sender: &dyn MessageSender,
    config: &Config,
    now: DateTime<Utc>,
) -> AppResult<usize> {
    let target = target_time(now, config.utc_offset_hours, config.lead_minutes);

    if !store.any_event_starting_at(&target).await? {
        debug!("No events starting at {}", target);
        return Ok(0);
    }

    let users = store.users_with_event_at(&target).await?;
    info!("{} event(s) starting at {}", users.len(), target);

    let mut attempted = 0;
    for user_id in &users {
        let bot_token = store.bot_token_for_user(user_id).await?;
        let event = store.event_for_user_at(user_id, &target).await?;
        let channel = store.channel_for_user(user_id).await?;

        let payload = build_payload(&Notification {
            channel,
            start_time: format_event_time(&event.start_time),
            end_time: format_event_time(&event.end_time),
            summary: event.summary,
            link: event.link,
        });

        attempted += 1;
        match sender.send(&bot_token, &payload).await {
            Ok(()) => info!("Notified user {} of event starting at {}", user_id, target),
            Err(e) => error!("Failed to notify user {}: {:?}", user_id, e),
        }
    }

    Ok(attempted)
}
