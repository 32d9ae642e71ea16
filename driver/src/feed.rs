use std::time::Duration;

use sqlx::postgres::PgListener;
use tokio::sync::broadcast;

use kernel::prelude::feed::ChangeEvent;
use kernel::KernelError;

use crate::database::postgres::PostgresDatabase;
use crate::error::ConvertError;

/// Channel the table triggers publish on.
pub static CHANGE_CHANNEL: &str = "venue_changes";

const CAPACITY: usize = 256;

/// Fans committed store changes out to any number of subscribers.
///
/// Subscribers that fall more than the channel capacity behind skip the missed events.
#[derive(Clone)]
pub struct PostgresChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl PostgresChangeFeed {
    /// Starts listening on [`CHANGE_CHANNEL`] in a background task.
    pub async fn listen(database: &PostgresDatabase) -> error_stack::Result<Self, KernelError> {
        let mut listener = PgListener::connect_with(database.pool())
            .await
            .convert_error()?;
        listener.listen(CHANGE_CHANNEL).await.convert_error()?;

        let (sender, _) = broadcast::channel(CAPACITY);
        let forward = sender.clone();
        tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        match serde_json::from_str::<ChangeEvent>(notification.payload()) {
                            Ok(event) => {
                                tracing::debug!("Store change {:?}", event);
                                // no subscribers is fine
                                let _ = forward.send(event);
                            }
                            Err(error) => {
                                tracing::warn!("Malformed change payload: {}", error)
                            }
                        }
                    }
                    Err(error) => {
                        tracing::error!("Change feed connection lost: {}", error);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self { sender })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}
