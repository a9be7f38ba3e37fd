use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::{Frame, Pending};

command_group! {
    /// `MULTI` / `EXEC` transactions.
    ///
    /// Between `multi` and `exec` the server answers every command with the
    /// `QUEUED` status, so typed command methods do not resolve to their usual
    /// values there: `wait_ok` based ones resolve to `false` and the others may
    /// fail to convert. Read the results from the reply of `exec` instead.
    pub trait TransactionCommands {
        fn multi(&self) -> Pending<bool> {
            wait_ok(self.execute("MULTI", vec![]))
        }

        /// Run the queued commands. `None` if a watched key changed and the
        /// transaction was aborted. Failed commands appear as `Frame::Error`
        /// entries.
        fn exec(&self) -> Pending<Option<Vec<Frame>>> {
            convert(self.execute("EXEC", vec![]))
        }

        fn discard(&self) -> Pending<bool> {
            wait_ok(self.execute("DISCARD", vec![]))
        }

        fn watch(&self, keys: &[impl ToArg]) -> Pending<bool> {
            wait_ok(self.execute("WATCH", to_args(keys).collect()))
        }

        fn unwatch(&self) -> Pending<bool> {
            wait_ok(self.execute("UNWATCH", vec![]))
        }
    }
}
