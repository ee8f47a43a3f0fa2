use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the 1-based position of `member` in ascending score order.
#[derive(Debug, PartialEq)]
pub struct ZRank {
    pub key: String,
    pub member: String,
}

impl Executable for ZRank {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let rank = store.zsets().rank(&self.key, &self.member)?;

        Ok(Frame::Integer(rank as i64))
    }
}

impl TryFrom<&mut CommandParser> for ZRank {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;

        Ok(Self { key, member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::store::StoreError;
    use bytes::Bytes;

    fn zrank(store: &mut Store, key: &str, member: &str) -> Result<Frame, Error> {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("ZRANK")),
            Frame::Bulk(Bytes::from(key.to_string())),
            Frame::Bulk(Bytes::from(member.to_string())),
        ]);
        Command::try_from(frame)?.exec(store)
    }

    #[test]
    fn ranks_follow_scores() {
        let mut store = Store::default();
        for (member, score) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            store.zsets().insert("z", member.to_string(), score).unwrap();
        }

        assert_eq!(zrank(&mut store, "z", "b").unwrap(), Frame::Integer(2));

        store.zsets().insert("z", "a".to_string(), 5.0).unwrap();

        assert_eq!(zrank(&mut store, "z", "a").unwrap(), Frame::Integer(3));
    }

    #[test]
    fn missing_key() {
        let mut store = Store::default();

        let err = zrank(&mut store, "z", "a").unwrap_err();

        assert_eq!(*err.downcast::<StoreError>().unwrap(), StoreError::NoSuchKey);
    }
}
