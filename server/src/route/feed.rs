use crate::handler::AppModule;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::Stream;
use kernel::prelude::feed::ChangeEvent;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

pub trait FeedRouter {
    fn route_feed(self) -> Self;
}

impl FeedRouter for Router<AppModule> {
    fn route_feed(self) -> Self {
        self.route(
            "/events",
            get(|State(module): State<AppModule>| async move {
                Sse::new(changes(module.feed().subscribe())).keep_alive(KeepAlive::default())
            }),
        )
    }
}

/// `change` events in commit order; a lagging subscriber skips what it missed.
fn changes(receiver: Receiver<ChangeEvent>) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(change) => match Event::default().event("change").json_data(&change) {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(error) => tracing::warn!("Unencodable change {:?}: {}", change, error),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Event subscriber lagged, skipped {} change(s)", skipped)
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::StreamExt;
    use kernel::prelude::feed::{ChangeOperation, Collection};
    use tokio::sync::broadcast;

    fn change(id: &str) -> ChangeEvent {
        ChangeEvent {
            collection: Collection::Bookings,
            operation: ChangeOperation::Insert,
            id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn stream_ends_when_feed_closes() {
        let (sender, receiver) = broadcast::channel(4);
        sender.send(change("1")).unwrap();
        sender.send(change("2")).unwrap();
        drop(sender);

        let events: Vec<_> = changes(receiver).collect().await;
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_missed_changes() {
        let (sender, receiver) = broadcast::channel(2);
        for id in ["1", "2", "3", "4"] {
            sender.send(change(id)).unwrap();
        }
        drop(sender);

        let events: Vec<_> = changes(receiver).collect().await;
        assert_eq!(events.len(), 2);
    }
}
