use crate::app::{STATUS_EXITED, STATUS_RUNNING};
use notify_rust::{Notification, Urgency};

pub fn send_desktop(container: Option<&str>, old: &str, new: &str) {
    let (summary, icon, urgency) = match new {
        STATUS_RUNNING => ("Container started", "dialog-information", Urgency::Normal),
        STATUS_EXITED => ("Container exited", "dialog-warning", Urgency::Critical),
        _ => ("Container status changed", "dialog-information", Urgency::Normal),
    };

    let body = match container {
        Some(name) => format!("{name}: {old} → {new}"),
        None => format!("{old} → {new}"),
    };

    if let Err(e) = Notification::new()
        .summary(summary)
        .body(&body)
        .icon(icon)
        .urgency(urgency)
        .show()
    {
        tracing::debug!("desktop notification failed: {e}");
    }
}
