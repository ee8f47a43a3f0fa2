use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Replies 1 if the string key holds a live value, 0 otherwise. Also accepted as `EXISTS`.
#[derive(Debug, PartialEq)]
pub struct Exist {
    pub key: String,
}

impl Executable for Exist {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let exists = store.strings().exists(&self.key);

        Ok(Frame::Integer(exists as i64))
    }
}

impl TryFrom<&mut CommandParser> for Exist {
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
    use tokio::time::{self, Duration};

    #[tokio::test]
    async fn expired_key_does_not_exist() {
        time::pause();

        let mut store = Store::default();
        store.strings().set(
            String::from("key1"),
            Bytes::from("1"),
            Some(Duration::from_millis(100)),
        );

        let exist = |store: &mut Store| {
            let frame = Frame::Array(vec![
                Frame::Bulk(Bytes::from("EXIST")),
                Frame::Bulk(Bytes::from("key1")),
            ]);
            Command::try_from(frame).unwrap().exec(store).unwrap()
        };

        assert_eq!(exist(&mut store), Frame::Integer(1));

        time::advance(Duration::from_millis(100)).await;

        assert_eq!(exist(&mut store), Frame::Integer(0));
    }
}
