use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns members with 0-based ranks between `start` and `end`, inclusive, lowest score first.
///
/// Index rules are the same as `LRANGE`.
///
/// Ref: <https://redis.io/docs/latest/commands/zrange/>
#[derive(Debug, PartialEq)]
pub struct ZRange {
    pub key: String,
    pub start: i64,
    pub end: i64,
}

impl Executable for ZRange {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let members = store.zsets().range(&self.key, self.start, self.end)?;

        Ok(Frame::Array(
            members
                .into_iter()
                .map(|member| Frame::Bulk(Bytes::from(member)))
                .collect(),
        ))
    }
}

impl TryFrom<&mut CommandParser> for ZRange {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let end = parser.next_integer()?;

        Ok(Self { key, start, end })
    }
}
