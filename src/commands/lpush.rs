use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Insert value at the head of the list stored at key, creating the list if needed.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct LPush {
    pub key: String,
    pub value: Bytes,
}

impl Executable for LPush {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.lists().lpush(&self.key, self.value);

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for LPush {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}
