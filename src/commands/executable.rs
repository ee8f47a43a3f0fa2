use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Applies a parsed command to the store and produces its reply.
///
/// Store failures come back as `Err`; the dispatch loop turns them into error replies.
pub trait Executable {
    fn exec(self, store: &mut Store) -> Result<Frame, Error>;
}
