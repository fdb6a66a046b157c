//! # Outgoing Email
//!
//! Receipts and bulk announcements are handed to a [`Mailer`]. Delivery
//! failures are logged and counted; they never undo the action that
//! triggered the email.
//!
//! ```text
//! POST /bus/payments ──► ticket saved ──► receipt_email ──► Mailer::send
//!                                                              │
//!                                              Err ──► warn!, response unchanged
//!
//! POST /bus/notifications ──► send_bulk ──► { sent, failed, failures[] }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use busdesk_core::Payment;

/// One message to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Recipient rejected: {recipient}: {reason}")]
    Rejected { recipient: String, reason: String },

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Delivers email. Implementations must be safe to share across requests.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Writes every message to the log instead of delivering it.
///
/// Used in development and wherever no mail relay is configured.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        LogMailer { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if !email.recipient.contains('@') {
            return Err(MailError::Rejected {
                recipient: email.recipient.clone(),
                reason: "not an email address".to_string(),
            });
        }

        info!(
            from = %self.from,
            to = %email.recipient,
            subject = %email.subject,
            "Email sent"
        );
        Ok(())
    }
}

// =============================================================================
// Bulk Send
// =============================================================================

/// Per-recipient outcome of a bulk send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendReport {
    pub sent: usize,
    pub failed: usize,
    /// Recipients whose message was not delivered.
    pub failures: Vec<String>,
}

/// Sends each email in turn. One failure does not stop the rest.
pub async fn send_bulk(mailer: &dyn Mailer, emails: &[OutboundEmail]) -> BulkSendReport {
    let mut report = BulkSendReport::default();

    for email in emails {
        match mailer.send(email).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(recipient = %email.recipient, error = %e, "Bulk email failed");
                report.failed += 1;
                report.failures.push(email.recipient.clone());
            }
        }
    }

    info!(sent = report.sent, failed = report.failed, "Bulk email finished");
    report
}

/// Escapes text for an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Receipt for a recorded payment, if the customer left an email address.
pub fn receipt_email(payment: &Payment) -> Option<OutboundEmail> {
    let recipient = payment.customer_email.as_deref()?.trim();
    if recipient.is_empty() {
        return None;
    }

    let trip = payment.trip_name.as_deref().unwrap_or("your trip");
    let departure = payment
        .departure_date
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_default();
    let subject = format!("Payment received: {}", payment.payment_id);
    let text = format!(
        "Dear {},\n\nWe received {} {:.2} by {} for {} {}.\nReference: {}\n",
        payment.customer_name,
        payment.currency,
        payment.amount.to_decimal(),
        payment.payment_method,
        trip,
        departure,
        payment.payment_id,
    );
    let html = format!(
        "<p>Dear {},</p><p>We received <strong>{} {:.2}</strong> by {} for {} {}.</p>\
         <p>Reference: <code>{}</code></p>",
        escape_html(&payment.customer_name),
        escape_html(&payment.currency),
        payment.amount.to_decimal(),
        payment.payment_method,
        escape_html(trip),
        departure,
        escape_html(&payment.payment_id),
    );

    Some(OutboundEmail {
        recipient: recipient.to_string(),
        subject,
        html,
        text,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
