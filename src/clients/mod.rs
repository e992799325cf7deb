pub mod page;
pub mod poll_client;
