use crate::cmd::{convert, to_args, ToArg};
use crate::reply::{pairs, wait_convert, wait_ok};
use crate::Pending;
use bytes::Bytes;

command_group! {
    /// Commands on hash values.
    pub trait HashCommands {
        /// Delete `fields` from the hash. Returns how many were removed.
        fn hdel(&self, key: impl ToArg, fields: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(fields));

            convert(self.execute("HDEL", args))
        }

        fn hexists(&self, key: impl ToArg, field: impl ToArg) -> Pending<bool> {
            convert(self.execute("HEXISTS", vec![key.to_arg(), field.to_arg()]))
        }

        fn hget(&self, key: impl ToArg, field: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("HGET", vec![key.to_arg(), field.to_arg()]))
        }

        /// Every field and value, in server order.
        fn hgetall(&self, key: impl ToArg) -> Pending<Vec<(Bytes, Bytes)>> {
            wait_convert(self.execute("HGETALL", vec![key.to_arg()]), pairs)
        }

        fn hincrby(&self, key: impl ToArg, field: impl ToArg, increment: i64) -> Pending<i64> {
            convert(self.execute("HINCRBY", vec![key.to_arg(), field.to_arg(), increment.to_arg()]))
        }

        fn hincrbyfloat(&self, key: impl ToArg, field: impl ToArg, increment: f64) -> Pending<f64> {
            convert(self.execute("HINCRBYFLOAT", vec![key.to_arg(), field.to_arg(), increment.to_arg()]))
        }

        fn hkeys(&self, key: impl ToArg) -> Pending<Vec<Bytes>> {
            convert(self.execute("HKEYS", vec![key.to_arg()]))
        }

        fn hlen(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("HLEN", vec![key.to_arg()]))
        }

        fn hmget(&self, key: impl ToArg, fields: &[impl ToArg]) -> Pending<Vec<Option<Bytes>>> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(fields));

            convert(self.execute("HMGET", args))
        }

        fn hmset(&self, key: impl ToArg, entries: &[(impl ToArg, impl ToArg)]) -> Pending<bool> {
            let mut args = vec![key.to_arg()];
            args.extend(entries.iter().flat_map(|(field, value)| [field.to_arg(), value.to_arg()]));

            wait_ok(self.execute("HMSET", args))
        }

        /// Returns `1` if `field` is new, `0` if its value was overwritten.
        fn hset(&self, key: impl ToArg, field: impl ToArg, value: impl ToArg) -> Pending<i64> {
            convert(self.execute("HSET", vec![key.to_arg(), field.to_arg(), value.to_arg()]))
        }

        fn hsetnx(&self, key: impl ToArg, field: impl ToArg, value: impl ToArg) -> Pending<bool> {
            convert(self.execute("HSETNX", vec![key.to_arg(), field.to_arg(), value.to_arg()]))
        }

        fn hvals(&self, key: impl ToArg) -> Pending<Vec<Bytes>> {
            convert(self.execute("HVALS", vec![key.to_arg()]))
        }
    }
}
