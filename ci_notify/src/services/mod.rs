//! Notification services: message composition and webhook delivery.

pub mod dispatcher;
pub mod payload_service;
pub mod webhook_client;
