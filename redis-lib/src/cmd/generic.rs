use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::Pending;
use async_stream::try_stream;
use bytes::Bytes;
use tokio_stream::Stream;

command_group! {
    /// Commands that operate on keys of any type.
    pub trait GenericCommands {
        /// Delete `keys`. Returns the number of keys that were removed.
        fn del(&self, keys: &[impl ToArg]) -> Pending<i64> {
            convert(self.execute("DEL", to_args(keys).collect()))
        }

        fn exists(&self, key: impl ToArg) -> Pending<bool> {
            convert(self.execute("EXISTS", vec![key.to_arg()]))
        }

        /// Set a timeout of `seconds` on `key`. `false` if the key does not exist.
        fn expire(&self, key: impl ToArg, seconds: u64) -> Pending<bool> {
            convert(self.execute("EXPIRE", vec![key.to_arg(), seconds.to_arg()]))
        }

        fn pexpire(&self, key: impl ToArg, millis: u64) -> Pending<bool> {
            convert(self.execute("PEXPIRE", vec![key.to_arg(), millis.to_arg()]))
        }

        /// Remove the timeout on `key`.
        fn persist(&self, key: impl ToArg) -> Pending<bool> {
            convert(self.execute("PERSIST", vec![key.to_arg()]))
        }

        /// Remaining time to live in seconds.
        ///
        /// `-2` if the key does not exist, `-1` if it has no timeout.
        fn ttl(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("TTL", vec![key.to_arg()]))
        }

        fn pttl(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("PTTL", vec![key.to_arg()]))
        }

        fn keys(&self, pattern: impl ToArg) -> Pending<Vec<Bytes>> {
            convert(self.execute("KEYS", vec![pattern.to_arg()]))
        }

        fn rename(&self, key: impl ToArg, new_key: impl ToArg) -> Pending<bool> {
            wait_ok(self.execute("RENAME", vec![key.to_arg(), new_key.to_arg()]))
        }

        /// Rename `key` only if `new_key` does not exist yet.
        fn renamenx(&self, key: impl ToArg, new_key: impl ToArg) -> Pending<bool> {
            convert(self.execute("RENAMENX", vec![key.to_arg(), new_key.to_arg()]))
        }

        fn randomkey(&self) -> Pending<Option<Bytes>> {
            convert(self.execute("RANDOMKEY", vec![]))
        }

        /// `TYPE key`: `string`, `list`, `set`, `zset`, `hash` or `none`.
        fn key_type(&self, key: impl ToArg) -> Pending<String> {
            convert(self.execute("TYPE", vec![key.to_arg()]))
        }

        /// `MOVE key db`.
        fn move_key(&self, key: impl ToArg, db: u32) -> Pending<bool> {
            convert(self.execute("MOVE", vec![key.to_arg(), db.to_arg()]))
        }

        /// One step of a `SCAN` iteration. Returns the next cursor, `0` when
        /// the iteration is complete, and the keys of this step.
        fn scan(&self, cursor: u64, pattern: Option<&str>, count: Option<u64>) -> Pending<(u64, Vec<Bytes>)> {
            let mut args = vec![cursor.to_arg()];
            if let Some(pattern) = pattern {
                args.extend([Bytes::from_static(b"MATCH"), pattern.to_arg()]);
            }
            if let Some(count) = count {
                args.extend([Bytes::from_static(b"COUNT"), count.to_arg()]);
            }

            convert(self.execute("SCAN", args))
        }

        /// Iterate the whole keyspace with `SCAN`, yielding keys as the server
        /// returns them. The server may yield a key more than once.
        fn iscan(&self, pattern: Option<&str>, count: Option<u64>) -> impl Stream<Item = crate::Result<Bytes>> + '_ {
            let pattern = pattern.map(ToString::to_string);

            try_stream! {
                let mut cursor = 0;
                loop {
                    let (next, keys) = self.scan(cursor, pattern.as_deref(), count).await?;
                    for key in keys {
                        yield key;
                    }

                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
            }
        }
    }
}
