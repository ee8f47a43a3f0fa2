use bytes::{Buf, BytesMut};
use std::io::Cursor;
use tokio_util::codec::{Decoder, Encoder};

use crate::config::DEFAULT_MAX_FRAME_SIZE;
use crate::frame::{self, Frame};
use crate::Error;

/// Turns the inbound byte stream into frames and frames back into bytes.
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> FrameCodec {
        FrameCodec { max_frame_size }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // A client that keeps sending without ever completing a frame is cut off here.
        if src.len() > self.max_frame_size {
            return Err("frame size exceeds limit".into());
        }

        let mut cursor = Cursor::new(&src[..]);
        let frame = match Frame::parse(&mut cursor) {
            Ok(frame) => frame,
            Err(frame::Error::Incomplete) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let position = cursor.position() as usize;

        // Remove the parsed frame from the buffer.
        src.advance(position);

        Ok(Some(frame))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&frame.serialize());
        Ok(())
    }
}
