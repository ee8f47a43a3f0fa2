use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the value of key. A missing or expired key is an error.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let value = store.strings().get(&self.key)?;

        Ok(Frame::Bulk(value))
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}
