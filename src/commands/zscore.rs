use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the score of `member` as a decimal string.
///
/// Ref: <https://redis.io/docs/latest/commands/zscore/>
#[derive(Debug, PartialEq)]
pub struct ZScore {
    pub key: String,
    pub member: String,
}

impl Executable for ZScore {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let score = store.zsets().score(&self.key, &self.member)?;

        Ok(Frame::Bulk(Bytes::from(format_score(score))))
    }
}

/// Shortest text that parses back to `score`, switching to exponent form for very large or
/// very small magnitudes.
fn format_score(score: f64) -> String {
    let magnitude = score.abs();
    if score == 0.0 || !score.is_finite() || (1e-5..1e17).contains(&magnitude) {
        score.to_string()
    } else {
        format!("{:e}", score)
    }
}

impl TryFrom<&mut CommandParser> for ZScore {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;

        Ok(Self { key, member })
    }
}
