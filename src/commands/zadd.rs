use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Adds `member` with `score` to the sorted set at key, or moves an existing member.
///
/// Arguments are `ZADD key member score`.
#[derive(Debug, PartialEq)]
pub struct ZAdd {
    pub key: String,
    pub member: String,
    pub score: f64,
}

impl Executable for ZAdd {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.zsets().insert(&self.key, self.member, self.score)?;

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for ZAdd {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        let score = parser.next_float()?;

        Ok(Self { key, member, score })
    }
}
