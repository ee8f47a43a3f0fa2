use bytes::Bytes;
use tokio::time::Duration;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Set key to hold the string value, with an optional time to live.
///
/// `SET key value [EX seconds | PX milliseconds]`. Any previous TTL is replaced, or cleared
/// when no expiry is given.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub ttl: Option<Duration>,
}

impl Executable for Set {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.strings().set(self.key, self.value, self.ttl);

        Ok(Frame::ok())
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        if parser.remaining() == 0 {
            return Ok(Self {
                key,
                value,
                ttl: None,
            });
        }

        let unit = parser.next_string()?;
        let amount = parser.next_integer()?;

        let millis = match unit.as_str() {
            "EX" => amount.checked_mul(1000),
            "PX" => Some(amount),
            _ => return Err(parser.invalid_argument(unit).into()),
        };

        let millis = match millis {
            Some(millis) if millis > 0 => millis as u64,
            _ => return Err(parser.invalid_argument(amount.to_string()).into()),
        };

        Ok(Self {
            key,
            value,
            ttl: Some(Duration::from_millis(millis)),
        })
    }
}
