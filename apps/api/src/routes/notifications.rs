//! Bulk email to a list of recipients (schedule changes, holiday trips).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use busdesk_core::validation::RequiredFields;

use crate::auth::CompanyScope;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::mailer::{escape_html, send_bulk, OutboundEmail};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BulkEmailRequest {
    pub recipients: Option<Vec<String>>,
    pub subject: Option<String>,
    pub text: Option<String>,
    /// Falls back to `text` wrapped in a paragraph.
    pub html: Option<String>,
}

pub async fn send_notifications(
    State(state): State<AppState>,
    scope: CompanyScope,
    ApiJson(body): ApiJson<BulkEmailRequest>,
) -> ApiResult<Json<Value>> {
    let mut required = RequiredFields::default();
    let recipients = required.take(
        "recipients",
        body.recipients.filter(|list| list.iter().any(|r| !r.trim().is_empty())),
    );
    let subject = required.text("subject", body.subject);
    let text = required.text("text", body.text);

    let (Some(recipients), Some(subject), Some(text)) = (recipients, subject, text) else {
        return Err(required.into_error().into());
    };

    let html = body
        .html
        .unwrap_or_else(|| format!("<p>{}</p>", escape_html(&text)));
    let emails: Vec<OutboundEmail> = recipients
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|recipient| OutboundEmail {
            recipient: recipient.to_string(),
            subject: subject.clone(),
            html: html.clone(),
            text: text.clone(),
        })
        .collect();

    info!(
        company_id = %scope.company_id,
        user_id = %scope.user_id,
        recipients = emails.len(),
        "Sending bulk email"
    );
    let report = send_bulk(state.mailer.as_ref(), &emails).await;

    Ok(Json(json!({
        "success": true,
        "sent": report.sent,
        "failed": report.failed,
        "failures": report.failures,
    })))
}
