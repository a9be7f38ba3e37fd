use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::Pending;
use bytes::Bytes;
use std::time::Duration;

command_group! {
    /// Commands on string values.
    pub trait StringCommands {
        /// Append `value` to the string at `key`. Returns the new length.
        fn append(&self, key: impl ToArg, value: impl ToArg) -> Pending<i64> {
            convert(self.execute("APPEND", vec![key.to_arg(), value.to_arg()]))
        }

        /// Get the value of key.
        ///
        /// If the key does not exist `None` is returned.
        fn get(&self, key: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("GET", vec![key.to_arg()]))
        }

        /// Set `key` to hold `value`, discarding any previous time to live.
        fn set(&self, key: impl ToArg, value: impl ToArg) -> Pending<bool> {
            wait_ok(self.execute("SET", vec![key.to_arg(), value.to_arg()]))
        }

        /// Set `key` to hold `value`, expiring after `expiration`.
        ///
        /// The expiration is sent in milliseconds.
        fn set_expires(&self, key: impl ToArg, value: impl ToArg, expiration: Duration) -> Pending<bool> {
            let millis = u64::try_from(expiration.as_millis()).unwrap_or(u64::MAX);
            let args = vec![key.to_arg(), value.to_arg(), Bytes::from_static(b"PX"), millis.to_arg()];

            wait_ok(self.execute("SET", args))
        }

        fn setex(&self, key: impl ToArg, seconds: u64, value: impl ToArg) -> Pending<bool> {
            wait_ok(self.execute("SETEX", vec![key.to_arg(), seconds.to_arg(), value.to_arg()]))
        }

        /// Set `key` only if it does not exist. `true` if the key was set.
        fn setnx(&self, key: impl ToArg, value: impl ToArg) -> Pending<bool> {
            convert(self.execute("SETNX", vec![key.to_arg(), value.to_arg()]))
        }

        fn getset(&self, key: impl ToArg, value: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("GETSET", vec![key.to_arg(), value.to_arg()]))
        }

        fn getrange(&self, key: impl ToArg, start: i64, end: i64) -> Pending<Bytes> {
            convert(self.execute("GETRANGE", vec![key.to_arg(), start.to_arg(), end.to_arg()]))
        }

        fn setrange(&self, key: impl ToArg, offset: u64, value: impl ToArg) -> Pending<i64> {
            convert(self.execute("SETRANGE", vec![key.to_arg(), offset.to_arg(), value.to_arg()]))
        }

        fn strlen(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("STRLEN", vec![key.to_arg()]))
        }

        fn incr(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("INCR", vec![key.to_arg()]))
        }

        fn incrby(&self, key: impl ToArg, increment: i64) -> Pending<i64> {
            convert(self.execute("INCRBY", vec![key.to_arg(), increment.to_arg()]))
        }

        /// The server replies with the new value as a bulk string.
        fn incrbyfloat(&self, key: impl ToArg, increment: f64) -> Pending<f64> {
            convert(self.execute("INCRBYFLOAT", vec![key.to_arg(), increment.to_arg()]))
        }

        fn decr(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("DECR", vec![key.to_arg()]))
        }

        fn decrby(&self, key: impl ToArg, decrement: i64) -> Pending<i64> {
            convert(self.execute("DECRBY", vec![key.to_arg(), decrement.to_arg()]))
        }

        /// Values of all `keys`, `None` for missing ones.
        fn mget(&self, keys: &[impl ToArg]) -> Pending<Vec<Option<Bytes>>> {
            convert(self.execute("MGET", to_args(keys).collect()))
        }

        fn mset(&self, pairs: &[(impl ToArg, impl ToArg)]) -> Pending<bool> {
            let args = pairs
                .iter()
                .flat_map(|(key, value)| [key.to_arg(), value.to_arg()])
                .collect();

            wait_ok(self.execute("MSET", args))
        }
    }
}
