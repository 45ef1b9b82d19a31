//! Console output for dispatcher events.

use batchfetch_core::dispatcher::DispatchEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Line printed for an event, if any. Exits are only logged.
pub fn format_event(event: &DispatchEvent) -> Option<String> {
    match event {
        DispatchEvent::Started {
            seq,
            total,
            handle,
            id,
        } => Some(format!(
            "Started downloading {}/{} (PID: {}) - {}",
            seq, total, handle, id
        )),
        DispatchEvent::Finished { .. } => None,
        DispatchEvent::AllCompleted(_) => Some("All downloads completed!".to_string()),
    }
}

pub async fn print_events(mut rx: UnboundedReceiver<DispatchEvent>) {
    while let Some(event) = rx.recv().await {
        if let DispatchEvent::Finished {
            seq, id, status, ..
        } = &event
        {
            if !status.success() {
                tracing::warn!("fetcher for {} ({}) ended with {}", seq, id, status);
            }
        }
        if let Some(line) = format_event(&event) {
            println!("{}", line);
        }
    }
}
