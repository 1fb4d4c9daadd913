//! CI notification core: turns CI server lifecycle events into chat-webhook
//! embeds and delivers them to every recipient's own webhook.
//!
//! The host owns event emission, user properties and project lookups; this
//! crate only consumes them through the traits in [`ports`]. Everything here is
//! stateless across events, so one [`NotificationDispatcher`] can be shared by
//! any number of concurrent callers.

pub mod descriptor;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{DeliveryError, ErrorCategory};
pub use events::{NotificationEvent, ProjectRef, ResponsibilityTarget};
pub use models::build::{Branch, BuildContext};
pub use models::destination::{Destination, RecipientId};
pub use models::message::{EmbedColor, EmbedField, NotificationMessage};
pub use ports::{ProjectRegistry, UserConfigResolver};
pub use services::dispatcher::{DispatchReport, NotificationDispatcher, RecipientOutcome};
pub use services::webhook_client::{ClientConfig, DeliveryOutcome, WebhookClient};
