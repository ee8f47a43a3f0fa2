use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Error;

pub struct Connection {
    pub id: Uuid,
    // Bytes are read from the socket into the codec's buffer. When a frame is parsed, the
    // corresponding data is removed from the buffer.
    frames: Framed<TcpStream, FrameCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection::with_codec(stream, FrameCodec::default())
    }

    pub fn with_codec(stream: TcpStream, codec: FrameCodec) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            frames: Framed::new(stream, codec),
        }
    }

    /// Reads the next frame, or `None` once the peer has closed the connection.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.frames.next().await.transpose()
    }

    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.frames.send(frame).await
    }
}
