use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::codec::FrameCodec;
use crate::commands::Command;
use crate::config::Config;
use crate::connection::Connection;
use crate::dispatcher::{self, Handle};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((config.bind.as_str(), config.port)).await?;

    serve(listener, config).await
}

/// Accepts connections on `listener` forever, all sharing one dispatcher.
pub async fn serve(listener: TcpListener, config: Config) -> Result<(), Error> {
    let store = Store::new(config.list_block_capacity);
    let (handle, dispatcher) = dispatcher::channel(store, config.queue_depth);
    tokio::spawn(dispatcher.run());

    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let handle = handle.clone();
        let codec = FrameCodec::new(config.max_frame_size);
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, codec, handle).await {
                error!(error = %e, "Connection failed");
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, codec, handle),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    codec: FrameCodec,
    handle: Handle,
) -> Result<(), Error> {
    let mut conn = Connection::with_codec(stream, codec);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    loop {
        let frame = match conn.read_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                // The byte stream can no longer be trusted, so answer once and hang up.
                warn!(error = %e, "Failed to decode frame");
                let _ = conn.write_frame(Frame::Error(format!("ERR {}", e))).await;
                return Err(e);
            }
        };
        debug!("Received frame from client: {:?}", frame);

        let res = match Command::try_from(frame) {
            Ok(cmd) => handle.execute(cmd).await?,
            Err(e) => Frame::Error(format!("ERR {}", e)),
        };

        debug!("Sending response to client: {:?}", res);
        conn.write_frame(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
