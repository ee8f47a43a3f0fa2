//! The single task that owns the store.
//!
//! Connection tasks never touch data directly. They send each parsed command through a bounded
//! channel together with a oneshot for the reply, and the dispatcher applies commands one at a
//! time in arrival order. Expired string keys are swept on the same task, between commands.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

pub struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<Frame>,
}

/// Cloneable sending side held by each connection.
#[derive(Clone)]
pub struct Handle {
    requests: mpsc::Sender<Request>,
}

impl Handle {
    /// Queues `command` and waits for its reply.
    pub async fn execute(&self, command: Command) -> Result<Frame, Error> {
        let (reply, response) = oneshot::channel();

        self.requests
            .send(Request { command, reply })
            .await
            .map_err(|_| "dispatcher has shut down")?;

        Ok(response.await?)
    }
}

pub struct Dispatcher {
    store: Store,
    requests: mpsc::Receiver<Request>,
}

/// Creates a dispatcher over `store` and the handle used to reach it.
pub fn channel(store: Store, depth: usize) -> (Handle, Dispatcher) {
    let (tx, rx) = mpsc::channel(depth.max(1));

    (
        Handle { requests: tx },
        Dispatcher {
            store,
            requests: rx,
        },
    )
}

impl Dispatcher {
    /// Runs until every `Handle` has been dropped, then hands the store back.
    pub async fn run(mut self) -> Store {
        loop {
            let next_expiration = self.store.strings().next_expiration();

            tokio::select! {
                request = self.requests.recv() => {
                    let Some(Request { command, reply }) = request else {
                        break;
                    };

                    let res = execute(command, &mut self.store);
                    // The connection may have gone away; the command was still applied.
                    let _ = reply.send(res);
                }
                _ = sleep_until(next_expiration) => {
                    let removed = self.store.strings().remove_expired_keys(Instant::now());
                    debug!(removed, "Removed expired keys");
                }
            }
        }

        info!("Dispatcher stopped");
        self.store
    }
}

/// Applies one command, turning any failure into an error reply.
pub fn execute(command: Command, store: &mut Store) -> Frame {
    let name: &'static str = (&command).into();
    debug!(command = name, "Executing command");

    match command.exec(store) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(command = name, error = %e, "Command failed");
            Frame::Error(format!("ERR {}", e))
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::time::Duration;

    fn command(parts: &[&str]) -> Command {
        let frame = Frame::Array(
            parts
                .iter()
                .map(|part| Frame::Bulk(Bytes::from(part.to_string())))
                .collect(),
        );
        Command::try_from(frame).unwrap()
    }

    #[test]
    fn store_errors_become_error_replies() {
        let mut store = Store::default();

        assert_eq!(
            execute(command(&["GET", "missing"]), &mut store),
            Frame::Error("ERR no such key".to_string())
        );

        execute(command(&["SET", "k", "v"]), &mut store);

        assert_eq!(
            execute(command(&["INCR", "k"]), &mut store),
            Frame::Error("ERR value is not an integer or out of range".to_string())
        );
    }

    #[tokio::test]
    async fn commands_apply_in_order() {
        let (handle, dispatcher) = channel(Store::default(), 8);
        tokio::spawn(dispatcher.run());

        for _ in 0..10 {
            handle.execute(command(&["INCR", "n"])).await.unwrap();
        }

        assert_eq!(
            handle.execute(command(&["GET", "n"])).await.unwrap(),
            Frame::Bulk(Bytes::from("10"))
        );
    }

    #[tokio::test]
    async fn concurrent_handles_are_serialized() {
        let (handle, dispatcher) = channel(Store::default(), 4);
        tokio::spawn(dispatcher.run());

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..25 {
                    handle.execute(command(&["RPUSH", "list", "x"])).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(
            handle.execute(command(&["LLEN", "list"])).await.unwrap(),
            Frame::Integer(200)
        );
    }

    #[tokio::test]
    async fn sweeps_expired_keys() {
        time::pause();

        let (handle, dispatcher) = channel(Store::default(), 8);
        let task = tokio::spawn(dispatcher.run());

        handle
            .execute(command(&["SET", "k", "v", "PX", "100"]))
            .await
            .unwrap();
        handle.execute(command(&["SET", "other", "v"])).await.unwrap();

        time::sleep(Duration::from_millis(150)).await;

        assert_eq!(
            handle.execute(command(&["EXIST", "k"])).await.unwrap(),
            Frame::Integer(0)
        );

        // Dropping the last handle stops the loop and gives the store back.
        drop(handle);
        let mut store = task.await.unwrap();

        assert_eq!(store.strings().len(), 1);
        assert_eq!(store.strings().next_expiration(), None);
    }
}
