use chrono::{DateTime, SecondsFormat, Utc};
use pdf_table_csv::{EventHandler, ObjectStore, Outcome, Scratch, TableExtractor};

use crate::error::WorkerError;
use crate::notification::EventPayload;

/// What happened to one queue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// A deletion notification; there is nothing to convert.
    IgnoredDeletion { key: String },
    Handled {
        outcome: Outcome,
        /// When the upload happened, if the notification said.
        event_time: Option<DateTime<Utc>>,
    },
}

/// Decodes one queue message and runs it through the handler.
pub async fn process_message<S, X, F>(
    handler: &mut EventHandler<S, X, F>,
    body: serde_json::Value,
) -> Result<Processed, WorkerError>
where
    S: ObjectStore,
    X: TableExtractor,
    F: Scratch,
{
    let payload = EventPayload::from_json(body)?;
    if payload.is_deletion() {
        return Ok(Processed::IgnoredDeletion {
            key: payload.into_event().name,
        });
    }

    let event_time = payload.event_time();
    let event = payload.into_event();
    let outcome = handler.handle(&event).await?;
    Ok(Processed::Handled {
        outcome,
        event_time,
    })
}

pub fn describe(processed: &Processed) -> String {
    match processed {
        Processed::IgnoredDeletion { key } => format!("ignored deletion of {key}"),
        Processed::Handled {
            outcome,
            event_time,
        } => {
            let summary = match outcome {
                Outcome::Skipped => "skipped non-PDF object".to_string(),
                Outcome::Converted {
                    output_key,
                    region_count,
                    row_count,
                } => format!("published {output_key}: regions={region_count}, rows={row_count}"),
            };
            match event_time {
                Some(time) => format!(
                    "{summary} (uploaded {})",
                    time.to_rfc3339_opts(SecondsFormat::Millis, true)
                ),
                None => summary,
            }
        }
    }
}
