use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Insert value at the tail of the list stored at key, creating the list if needed.
///
/// Ref: <https://redis.io/docs/latest/commands/rpush/>
#[derive(Debug, PartialEq)]
pub struct RPush {
    pub key: String,
    pub value: Bytes,
}

impl Executable for RPush {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.lists().rpush(&self.key, self.value);

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for RPush {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}
