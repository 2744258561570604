//! # convo_core
//!
//! Intent dispatch and rich-response building for the conversation
//! components webhook. Transport-free: `convo_api` wires it to HTTP.

pub mod dispatch;
pub mod handlers;
pub mod intent;
pub mod response;
pub mod webhook;

pub use dispatch::{DispatchError, DispatchTable, Fulfillment, FulfillmentError};
pub use intent::{Intent, SelectionKey};
pub use response::{Reply, WebhookResponse};
pub use webhook::{Conversation, WebhookRequest};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
