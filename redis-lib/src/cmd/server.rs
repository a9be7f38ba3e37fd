use crate::cmd::{convert, ToArg};
use crate::reply::{pairs, wait_convert, wait_ok, FromFrame};
use crate::Pending;
use bytes::Bytes;
use std::time::Duration;

command_group! {
    /// Server administration.
    pub trait ServerCommands {
        /// Number of keys in the selected database.
        fn dbsize(&self) -> Pending<i64> {
            convert(self.execute("DBSIZE", vec![]))
        }

        fn flushdb(&self) -> Pending<bool> {
            wait_ok(self.execute("FLUSHDB", vec![]))
        }

        fn flushall(&self) -> Pending<bool> {
            wait_ok(self.execute("FLUSHALL", vec![]))
        }

        /// `INFO [section]` as returned by the server.
        fn info(&self, section: Option<&str>) -> Pending<Bytes> {
            let args = section.map(ToArg::to_arg).into_iter().collect();

            convert(self.execute("INFO", args))
        }

        /// Unix time of the last successful save.
        fn lastsave(&self) -> Pending<i64> {
            convert(self.execute("LASTSAVE", vec![]))
        }

        /// Server clock as time since the Unix epoch.
        fn time(&self) -> Pending<Duration> {
            wait_convert(self.execute("TIME", vec![]), |frame| {
                let (secs, micros) = <(u64, u64)>::from_frame(frame)?;
                Ok(Duration::from_secs(secs) + Duration::from_micros(micros))
            })
        }

        fn config_get(&self, pattern: impl ToArg) -> Pending<Vec<(Bytes, Bytes)>> {
            let args = vec![Bytes::from_static(b"GET"), pattern.to_arg()];

            wait_convert(self.execute("CONFIG", args), pairs)
        }

        fn config_set(&self, parameter: impl ToArg, value: impl ToArg) -> Pending<bool> {
            let args = vec![Bytes::from_static(b"SET"), parameter.to_arg(), value.to_arg()];

            wait_ok(self.execute("CONFIG", args))
        }

        fn client_setname(&self, name: impl ToArg) -> Pending<bool> {
            wait_ok(self.execute("CLIENT", vec![Bytes::from_static(b"SETNAME"), name.to_arg()]))
        }

        fn client_getname(&self) -> Pending<Option<Bytes>> {
            convert(self.execute("CLIENT", vec![Bytes::from_static(b"GETNAME")]))
        }
    }
}
