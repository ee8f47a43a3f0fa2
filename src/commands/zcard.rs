use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the number of members in the sorted set at key, 0 when there is none.
///
/// Ref: <https://redis.io/docs/latest/commands/zcard/>
#[derive(Debug, PartialEq)]
pub struct ZCard {
    pub key: String,
}

impl Executable for ZCard {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let card = store.zsets().card(&self.key);

        Ok(Frame::Integer(card as i64))
    }
}

impl TryFrom<&mut CommandParser> for ZCard {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}
