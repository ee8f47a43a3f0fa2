use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes the string key and its TTL. Deleting an absent key still succeeds.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub key: String,
}

impl Executable for Del {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.strings().delete(&self.key);

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Del {
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
    fn existing_and_missing_key() {
        let mut store = Store::default();
        store
            .strings()
            .set(String::from("key1"), Bytes::from("1"), None);

        for _ in 0..2 {
            let frame = Frame::Array(vec![
                Frame::Bulk(Bytes::from("DEL")),
                Frame::Bulk(Bytes::from("key1")),
            ]);
            let cmd = Command::try_from(frame).unwrap();

            assert_eq!(cmd.exec(&mut store).unwrap(), Frame::ok());
            assert!(!store.strings().exists("key1"));
        }
    }

    #[test]
    fn other_keyspaces_are_untouched() {
        let mut store = Store::default();
        store.lists().rpush("key1", Bytes::from("a"));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("DEL")),
            Frame::Bulk(Bytes::from("key1")),
        ]);
        Command::try_from(frame).unwrap().exec(&mut store).unwrap();

        assert_eq!(store.lists().llen("key1"), 1);
    }
}
