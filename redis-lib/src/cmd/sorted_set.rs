use crate::cmd::{convert, to_args, ToArg};
use crate::reply::{pairs, wait_convert};
use crate::Pending;
use bytes::Bytes;

command_group! {
    /// Commands on sorted sets.
    ///
    /// Score bounds are `f64`; `f64::INFINITY` and `f64::NEG_INFINITY` are sent
    /// as `+inf` / `-inf`.
    pub trait SortedSetCommands {
        /// Add `(score, member)` pairs. Returns how many members are new.
        fn zadd(&self, key: impl ToArg, members: &[(f64, impl ToArg)]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(members.iter().flat_map(|(score, member)| [score.to_arg(), member.to_arg()]));

            convert(self.execute("ZADD", args))
        }

        fn zcard(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("ZCARD", vec![key.to_arg()]))
        }

        /// Number of members with a score in `min..=max`.
        fn zcount(&self, key: impl ToArg, min: f64, max: f64) -> Pending<i64> {
            convert(self.execute("ZCOUNT", vec![key.to_arg(), min.to_arg(), max.to_arg()]))
        }

        /// Returns the new score.
        fn zincrby(&self, key: impl ToArg, increment: f64, member: impl ToArg) -> Pending<f64> {
            convert(self.execute("ZINCRBY", vec![key.to_arg(), increment.to_arg(), member.to_arg()]))
        }

        fn zrange(&self, key: impl ToArg, start: i64, stop: i64) -> Pending<Vec<Bytes>> {
            convert(self.execute("ZRANGE", vec![key.to_arg(), start.to_arg(), stop.to_arg()]))
        }

        fn zrange_withscores(&self, key: impl ToArg, start: i64, stop: i64) -> Pending<Vec<(Bytes, f64)>> {
            let args = vec![key.to_arg(), start.to_arg(), stop.to_arg(), Bytes::from_static(b"WITHSCORES")];

            wait_convert(self.execute("ZRANGE", args), pairs)
        }

        fn zrangebyscore(&self, key: impl ToArg, min: f64, max: f64) -> Pending<Vec<Bytes>> {
            convert(self.execute("ZRANGEBYSCORE", vec![key.to_arg(), min.to_arg(), max.to_arg()]))
        }

        /// Zero-based rank by ascending score, `None` if `member` is absent.
        fn zrank(&self, key: impl ToArg, member: impl ToArg) -> Pending<Option<i64>> {
            convert(self.execute("ZRANK", vec![key.to_arg(), member.to_arg()]))
        }

        fn zrem(&self, key: impl ToArg, members: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(members));

            convert(self.execute("ZREM", args))
        }

        fn zrevrange(&self, key: impl ToArg, start: i64, stop: i64) -> Pending<Vec<Bytes>> {
            convert(self.execute("ZREVRANGE", vec![key.to_arg(), start.to_arg(), stop.to_arg()]))
        }

        fn zscore(&self, key: impl ToArg, member: impl ToArg) -> Pending<Option<f64>> {
            convert(self.execute("ZSCORE", vec![key.to_arg(), member.to_arg()]))
        }
    }
}
