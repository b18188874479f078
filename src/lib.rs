pub mod config;
pub mod error;
pub mod notification;
pub mod queue_consumer;
pub mod r2_store;

use pdf_table_csv::{EventHandler, MemScratch, TextTableExtractor};
use worker::{Context, Env, MessageBatch, MessageExt, Result, event};

use crate::config::WorkerConfig;
use crate::r2_store::R2Store;

/// Consumes storage notifications one message at a time. Successful and
/// undecodable messages are acknowledged; every other failure is handed back
/// to the queue for redelivery.
#[event(queue)]
async fn queue(batch: MessageBatch<serde_json::Value>, env: Env, _ctx: Context) -> Result<()> {
    let config = WorkerConfig::from_env(&env)
        .map_err(|error| worker::Error::RustError(error.to_string()))?;

    // No writable filesystem on Workers; scratch files stay in memory.
    let mut handler = EventHandler::new(
        R2Store::new(&env, &config),
        TextTableExtractor::default(),
        MemScratch::new(&config.scratch_dir),
    )
    .with_continuation(config.continuation);

    for message in batch.messages()? {
        match queue_consumer::process_message(&mut handler, message.body().clone()).await {
            Ok(processed) => {
                worker::console_log!(
                    "message {}: {}",
                    message.id(),
                    queue_consumer::describe(&processed)
                );
                message.ack();
            }
            Err(error) if error.is_retryable() => {
                worker::console_error!("message {} failed, retrying: {error}", message.id());
                message.retry();
            }
            Err(error) => {
                worker::console_error!("message {} dropped: {error}", message.id());
                message.ack();
            }
        }
    }

    Ok(())
}
