use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::notify::{DependOnNotifier, Mail, NotificationStatus, Notifier};
use kernel::prelude::entity::{format_display, BookingRequest, RequestStatus, UserEmail};
use time::UtcOffset;

fn escape(text: impl AsRef<str>) -> String {
    text.as_ref()
        .chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Builds the decision mail for a reviewed request. `None` while the request is
/// still pending.
pub fn compose_decision(
    request: &BookingRequest,
    to: &UserEmail,
    offset: UtcOffset,
) -> Option<Mail> {
    let title = escape(request.title().as_ref());
    let venue = escape(request.venue().as_ref());
    let start = format_display(request.span().start(), offset);
    let end = format_display(request.span().end(), offset);
    let greeting = match request.submitter().name() {
        Some(name) => format!("<p>Hello {},</p>", escape(name.as_ref())),
        None => "<p>Hello,</p>".to_string(),
    };
    let details = format!(
        "<ul><li>Title: {title}</li><li>Venue: {venue}</li><li>From: {start}</li><li>To: {end}</li></ul>"
    );

    match request.status() {
        RequestStatus::PendingApproval => None,
        RequestStatus::Approved => Some(Mail::new(
            to.clone(),
            format!("Booking approved: {}", request.title().as_ref()),
            format!("{greeting}<p>Your booking request has been approved.</p>{details}"),
        )),
        RequestStatus::Rejected => {
            let reason = request
                .rejection_reason()
                .as_ref()
                .map(|reason| format!("<p>Reason: {}</p>", escape(reason.as_ref())))
                .unwrap_or_default();
            Some(Mail::new(
                to.clone(),
                format!("Booking rejected: {}", request.title().as_ref()),
                format!(
                    "{greeting}<p>Your booking request has been rejected.</p>{details}{reason}"
                ),
            ))
        }
    }
}

/// Tells the submitter about a decision. Never fails: the outcome is reported as a
/// status and the decision itself stands regardless.
pub(crate) async fn notify_submitter<T>(module: &T, request: &BookingRequest) -> NotificationStatus
where
    T: DependOnNotifier + DependOnClock + ?Sized,
{
    let Some(to) = request.submitter().email() else {
        tracing::info!(
            "Request {} has no submitter email; notification skipped",
            request.id().as_ref()
        );
        return NotificationStatus::Skipped;
    };
    let Some(mail) = compose_decision(request, to, module.clock().display_offset()) else {
        return NotificationStatus::Skipped;
    };

    match module.notifier().send(&mail).await {
        Ok(delivery) => {
            let status = NotificationStatus::from(&delivery);
            tracing::info!(
                "Notification for request {} {}",
                request.id().as_ref(),
                status
            );
            status
        }
        Err(report) => {
            tracing::warn!(
                "Notification for request {} failed: {:?}",
                request.id().as_ref(),
                report
            );
            NotificationStatus::Failed
        }
    }
}
