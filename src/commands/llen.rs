use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the length of the list stored at key, 0 when there is none.
///
/// Ref: <https://redis.io/docs/latest/commands/llen/>
#[derive(Debug, PartialEq)]
pub struct LLen {
    pub key: String,
}

impl Executable for LLen {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let len = store.lists().llen(&self.key);

        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for LLen {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn counts_across_blocks() {
        let mut store = Store::new(2);
        for i in 0..5 {
            store.lists().lpush("list", Bytes::from(i.to_string()));
        }

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LLEN")),
            Frame::Bulk(Bytes::from("list")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(cmd.exec(&mut store).unwrap(), Frame::Integer(5));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LLEN")),
            Frame::Bulk(Bytes::from("other")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(cmd.exec(&mut store).unwrap(), Frame::Integer(0));
    }
}
