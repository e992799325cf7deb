pub mod calendar;
pub mod date_spec;
pub mod executor;
pub mod index_resolver;
pub mod message_log;
pub mod poll_service;
pub mod reconcile;
