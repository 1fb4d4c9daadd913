//! How this notifier presents itself to the host: its type, display name and
//! the two per-user properties the host must offer in its settings UI.

use serde::Serialize;

pub const NOTIFICATOR_TYPE: &str = "DiscordNotificator";
pub const DISPLAY_NAME: &str = "Discord WebHook";

/// User property holding the recipient's webhook URL.
pub const WEBHOOK_URL_KEY: &str = "DiscordWebHookURL";
/// User property holding the optional username override.
pub const USERNAME_KEY: &str = "DiscordUsername";

/// A user-configurable property the host registers for this notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProperty {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificatorDescriptor {
    #[serde(rename = "type")]
    pub notificator_type: &'static str,
    pub display_name: &'static str,
    pub user_properties: Vec<UserProperty>,
}

pub fn user_properties() -> Vec<UserProperty> {
    vec![
        UserProperty { key: WEBHOOK_URL_KEY, label: "Webhook URL" },
        UserProperty { key: USERNAME_KEY, label: "Username" },
    ]
}

pub fn descriptor() -> NotificatorDescriptor {
    NotificatorDescriptor {
        notificator_type: NOTIFICATOR_TYPE,
        display_name: DISPLAY_NAME,
        user_properties: user_properties(),
    }
}
