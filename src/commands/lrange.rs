use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the elements between `start` and `end`, both inclusive.
///
/// `-1` means the last element; other negative indices are rejected by the store.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct LRange {
    pub key: String,
    pub start: i64,
    pub end: i64,
}

impl Executable for LRange {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let values = store.lists().lrange(&self.key, self.start, self.end)?;

        Ok(Frame::Array(values.into_iter().map(Frame::Bulk).collect()))
    }
}

impl TryFrom<&mut CommandParser> for LRange {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let end = parser.next_integer()?;

        Ok(Self { key, start, end })
    }
}
