//! Contact form endpoint

use crate::client::SwiftifyClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};

/// Contact API interface
#[derive(Clone)]
pub struct ContactApi {
    client: SwiftifyClient,
}

impl ContactApi {
    /// Create a new contact API interface
    pub(crate) fn new(client: SwiftifyClient) -> Self {
        Self { client }
    }

    /// Submit a contact message
    ///
    /// POST /contact
    pub async fn submit(&self, message: &ContactMessage) -> ApiResult<ContactResponse> {
        self.client.post("contact", message).await
    }
}

/// A message from the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Message body
    pub message: String,
}

/// Acknowledgement of a contact message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    /// Whether the backend accepted the message
    pub success: bool,
}
