use crate::cmd::{convert, to_args, ToArg};
use crate::Pending;
use bytes::Bytes;

command_group! {
    /// Commands on unordered sets.
    pub trait SetCommands {
        /// Returns how many members were not already in the set.
        fn sadd(&self, key: impl ToArg, members: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(members));

            convert(self.execute("SADD", args))
        }

        fn scard(&self, key: impl ToArg) -> Pending<i64> {
            convert(self.execute("SCARD", vec![key.to_arg()]))
        }

        fn sdiff(&self, keys: &[impl ToArg]) -> Pending<Vec<Bytes>> {
            convert(self.execute("SDIFF", to_args(keys).collect()))
        }

        fn sinter(&self, keys: &[impl ToArg]) -> Pending<Vec<Bytes>> {
            convert(self.execute("SINTER", to_args(keys).collect()))
        }

        fn sismember(&self, key: impl ToArg, member: impl ToArg) -> Pending<bool> {
            convert(self.execute("SISMEMBER", vec![key.to_arg(), member.to_arg()]))
        }

        fn smembers(&self, key: impl ToArg) -> Pending<Vec<Bytes>> {
            convert(self.execute("SMEMBERS", vec![key.to_arg()]))
        }

        fn smove(&self, source: impl ToArg, dest: impl ToArg, member: impl ToArg) -> Pending<bool> {
            convert(self.execute("SMOVE", vec![source.to_arg(), dest.to_arg(), member.to_arg()]))
        }

        /// Remove and return a random member, `None` if the set is empty.
        fn spop(&self, key: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("SPOP", vec![key.to_arg()]))
        }

        fn srandmember(&self, key: impl ToArg) -> Pending<Option<Bytes>> {
            convert(self.execute("SRANDMEMBER", vec![key.to_arg()]))
        }

        fn srem(&self, key: impl ToArg, members: &[impl ToArg]) -> Pending<i64> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(members));

            convert(self.execute("SREM", args))
        }

        fn sunion(&self, keys: &[impl ToArg]) -> Pending<Vec<Bytes>> {
            convert(self.execute("SUNION", to_args(keys).collect()))
        }
    }
}
