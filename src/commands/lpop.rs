use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes and returns the first element of the list stored at key.
///
/// Ref: <https://redis.io/docs/latest/commands/lpop/>
#[derive(Debug, PartialEq)]
pub struct LPop {
    pub key: String,
}

impl Executable for LPop {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let value = store.lists().lpop(&self.key)?;

        Ok(Frame::Bulk(value))
    }
}

impl TryFrom<&mut CommandParser> for LPop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}
