use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes `member` from the sorted set at key. An absent member is an error.
///
/// Ref: <https://redis.io/docs/latest/commands/zrem/>
#[derive(Debug, PartialEq)]
pub struct ZRem {
    pub key: String,
    pub member: String,
}

impl Executable for ZRem {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.zsets().remove(&self.key, &self.member)?;

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for ZRem {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;

        Ok(Self { key, member })
    }
}
