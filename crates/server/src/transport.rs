//! NATS request/reply binding for the dispatcher.
//!
//! Every pattern is a queue subscription, so several service instances
//! share the load. Each message is handled in its own task.

use std::sync::Arc;

use anyhow::anyhow;
use async_nats::{Client, ConnectOptions, Message, ServerAddr, Subject};
use futures_util::StreamExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use configs::NatsConfig;
use service::products::repository::ProductStore;

use crate::dispatch::RpcDispatcher;
use crate::errors::StartupError;
use crate::patterns::Pattern;

const CLIENT_NAME: &str = "products-ms";

pub fn parse_servers(servers: &[String]) -> Result<Vec<ServerAddr>, StartupError> {
    servers
        .iter()
        .map(|s| {
            s.parse::<ServerAddr>()
                .map_err(|e| StartupError::Transport(format!("invalid server address {s:?}: {e}")))
        })
        .collect()
}

/// Connect to the bus. Failure here is fatal to startup.
pub async fn connect(cfg: &NatsConfig) -> Result<Client, StartupError> {
    let addrs = parse_servers(&cfg.servers)?;
    let client = ConnectOptions::new()
        .name(CLIENT_NAME)
        .connect(addrs.as_slice())
        .await
        .map_err(|e| StartupError::Transport(e.to_string()))?;
    info!(servers = ?cfg.servers, "message bus connected");
    Ok(client)
}

/// Serve all patterns until a subscription ends.
pub async fn serve<S>(client: Client, dispatcher: Arc<RpcDispatcher<S>>, queue_group: &str) -> anyhow::Result<()>
where
    S: ProductStore + 'static,
{
    let mut listeners = JoinSet::new();
    for pattern in Pattern::ALL {
        let mut subscriber = client
            .queue_subscribe(pattern.subject(), queue_group.to_string())
            .await
            .map_err(|e| anyhow!("subscribe to {pattern} failed: {e}"))?;
        info!(subject = pattern.subject(), queue_group, "subscribed");

        let client = client.clone();
        let dispatcher = Arc::clone(&dispatcher);
        listeners.spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let client = client.clone();
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move { handle_message(&client, &dispatcher, msg).await });
            }
            pattern
        });
    }

    match listeners.join_next().await {
        Some(Ok(pattern)) => Err(anyhow!("subscription for {pattern} closed")),
        Some(Err(e)) => Err(anyhow!("subscription task failed: {e}")),
        None => Ok(()),
    }
}

/// Dispatch one message and decide where its reply goes. `None` means the
/// sender did not ask for a reply; the call still runs.
pub async fn process<S: ProductStore>(
    dispatcher: &RpcDispatcher<S>,
    subject: &str,
    payload: &[u8],
    reply_to: Option<Subject>,
) -> Option<(Subject, Vec<u8>)> {
    let reply = dispatcher.dispatch(subject, payload).await;
    match reply_to {
        Some(target) => Some((target, reply.to_bytes())),
        None => {
            debug!(subject, "no reply subject; result dropped");
            None
        }
    }
}

async fn handle_message<S: ProductStore>(client: &Client, dispatcher: &RpcDispatcher<S>, msg: Message) {
    let routed = process(dispatcher, msg.subject.as_str(), &msg.payload, msg.reply).await;
    if let Some((target, body)) = routed {
        if let Err(e) = client.publish(target, body.into()).await {
            warn!(subject = %msg.subject, error = %e, "reply publish failed");
        }
    }
}
