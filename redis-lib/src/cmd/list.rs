use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::Pending;
use bytes::Bytes;

command_group! {
    /// Commands on lists.
    pub trait ListCommands {
        /// Pop from the first non-empty list among `keys`, waiting up to
        /// `timeout` seconds (`0` waits forever). Returns `(key, element)`.
        ///
        /// The connection serves no other reply while the server blocks, so
        /// every command issued after this one waits behind it.
        fn blpop(&self, keys: &[impl ToArg], timeout: u64) -> Pending<Option<(Bytes, Bytes)>> {
            let mut args: Vec<Bytes> = to_args(keys).collect();
            args.push(timeout.to_arg());

            convert(self.execute("BLPOP", args))
        }

        fn lindex(&self, key: impl ToArg, index: i64) -> Pending<Option<Bytes>> {
            convert(self.execute("LINDEX", vec![key.to_arg(), index.to_arg()]))
        }

        fn llen(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("LLEN", vec![key.to_arg()]))
        }

        fn lpop(&self, key: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("LPOP", vec![key.to_arg()]))
        }

        /// Prepend `values`. Returns the length of the list after the push.
        fn lpush(&self, key: impl ToArg, values: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(values));

            convert(self.execute("LPUSH", args))
        }

        fn lrange(&self, key: impl ToArg, start: i64, stop: i64) -> Pending<Vec<Bytes>> {
            convert(self.execute("LRANGE", vec![key.to_arg(), start.to_arg(), stop.to_arg()]))
        }

        /// Remove up to `count` occurrences of `value`; see `LREM` for the sign
        /// of `count`.
        fn lrem(&self, key: impl ToArg, count: i64, value: impl ToArg) -> Pending<i64> {
            convert(self.execute("LREM", vec![key.to_arg(), count.to_arg(), value.to_arg()]))
        }

        fn lset(&self, key: impl ToArg, index: i64, value: impl ToArg) -> Pending<bool> {
            wait_ok(self.execute("LSET", vec![key.to_arg(), index.to_arg(), value.to_arg()]))
        }

        fn ltrim(&self, key: impl ToArg, start: i64, stop: i64) -> Pending<bool> {
            wait_ok(self.execute("LTRIM", vec![key.to_arg(), start.to_arg(), stop.to_arg()]))
        }

        fn rpop(&self, key: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("RPOP", vec![key.to_arg()]))
        }

        fn rpush(&self, key: impl ToArg, values: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(values));

            convert(self.execute("RPUSH", args))
        }
    }
}
