//! Notification data models: all created fresh per event.

pub mod build;
pub mod destination;
pub mod message;
