use crate::{ConnectionId, Envelope, Intent, ManagerError, MatchManager, Notification};
use async_trait::async_trait;
use futures::future;
use itertools::Itertools;

/// Carries notifications and rejections to connected clients. How they are encoded and
/// delivered is up to the implementor.
///
/// # Errors
///
/// The implementor returns an error when a message could not be delivered. Delivery to other
/// connections proceeds, and every error is collected and returned to the calling code.
#[async_trait]
pub trait Transport<E> {
    /// Delivers `notification` to `connection_id`.
    async fn send(&self, connection_id: &ConnectionId, notification: &Notification)
        -> Result<(), E>;

    /// Tells `connection_id` why its request could not be served.
    async fn reject(&self, connection_id: &ConnectionId, error: &ManagerError) -> Result<(), E>;
}

/// Asynchronously sends every envelope to every one of its receivers.
///
/// # Errors
///
/// Accumulates all errors from [`Transport::send`] into a vector.
pub async fn dispatch<T, E>(transport: &T, envelopes: &[Envelope]) -> Result<(), Vec<E>>
where
    T: Transport<E> + Sync,
{
    let send_tasks = envelopes.iter().flat_map(|envelope| {
        envelope
            .to
            .iter()
            .map(move |connection_id| transport.send(connection_id, &envelope.notification))
    });

    let errors = future::join_all(send_tasks)
        .await
        .into_iter()
        .filter_map(Result::err)
        .collect_vec();
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(())
}

/// Handles `intent` from `connection_id` with `manager`, then either
/// [dispatches](dispatch) the resulting notifications or
/// [rejects](Transport::reject) the request to `connection_id` alone.
///
/// # Errors
///
/// Accumulates all errors from the [`Transport`] into a vector.
pub async fn process_intent<T, E>(
    manager: &MatchManager,
    transport: &T,
    connection_id: &ConnectionId,
    intent: &Intent,
) -> Result<(), Vec<E>>
where
    T: Transport<E> + Sync,
{
    // the manager is done with its locks before anything is awaited
    let handled = manager.handle(connection_id, intent);
    match handled {
        Ok(envelopes) => dispatch(transport, &envelopes).await,
        Err(error) => {
            log::debug!("rejecting {connection_id}: {error}");
            transport
                .reject(connection_id, &error)
                .await
                .map_err(|error| vec![error])
        }
    }
}
