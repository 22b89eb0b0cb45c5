//! Contact form command

use crate::app::{print_json, App};
use anyhow::Result;
use swiftify_api_client::endpoints::contact::ContactMessage;
use swiftify_cli::output::Status;

pub async fn run(app: &App, name: String, email: String, message: String) -> Result<()> {
    let client = app.require_client("contact")?;
    let response = client
        .contact()
        .submit(&ContactMessage { name, email, message })
        .await
        .map_err(swiftify_core::Error::from)?;

    if app.json() {
        return print_json(&response);
    }
    if response.success {
        Status::success("Message sent");
        Ok(())
    } else {
        Err(swiftify_core::Error::backend_unavailable("The backend did not accept the message").into())
    }
}
