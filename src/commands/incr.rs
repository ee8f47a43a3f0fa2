use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Increments the number stored at key by `amount`, one by default.
///
/// A missing key starts a new counter at `amount`. Replies with the new value.
///
/// Ref: <https://redis.io/docs/latest/commands/incr/>
#[derive(Debug, PartialEq)]
pub struct Incr {
    pub key: String,
    pub amount: i64,
}

impl Executable for Incr {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let value = store.strings().incr_by(&self.key, self.amount)?;

        Ok(Frame::Integer(value))
    }
}

impl TryFrom<&mut CommandParser> for Incr {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let amount = match parser.remaining() {
            0 => 1,
            _ => parser.next_integer()?,
        };

        Ok(Self { key, amount })
    }
}
