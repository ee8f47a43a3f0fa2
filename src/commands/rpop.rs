use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes and returns the last element of the list stored at key.
///
/// Ref: <https://redis.io/docs/latest/commands/rpop/>
#[derive(Debug, PartialEq)]
pub struct RPop {
    pub key: String,
}

impl Executable for RPop {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let value = store.lists().rpop(&self.key)?;

        Ok(Frame::Bulk(value))
    }
}

impl TryFrom<&mut CommandParser> for RPop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}
