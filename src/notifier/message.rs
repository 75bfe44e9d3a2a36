use serde_json::{json, Value};

/// Attachment bar color for event notifications
pub const ATTACHMENT_COLOR: &str = "2FA86B";

/// Header line of every event-start notification
pub const NOTIFICATION_TITLE: &str = "🔔 일정 시작 15분 전 알림";

/// Display fields of one outbound notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub channel: String,
    pub summary: String,
    pub link: String,
    pub start_time: String,
    pub end_time: String,
}

/// Build the chat.postMessage payload: a header block plus one colored
/// attachment holding the linked title and the start/end lines
pub fn build_payload(notification: &Notification) -> Value {
    json!({
        "channel": notification.channel,
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": NOTIFICATION_TITLE,
                    "emoji": true
                }
            }
        ],
        "attachments": [
            {
                "color": ATTACHMENT_COLOR,
                "fallback": format!("{} {}", NOTIFICATION_TITLE, notification.summary),
                "blocks": [
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": format!("<{}|*{}*>", notification.link, notification.summary)
                        }
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": format!(
                                "일정 시작 : {}\n일정 종료 : {}",
                                notification.start_time, notification.end_time
                            )
                        }
                    }
                ]
            }
        ]
    })
}
