use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::Pending;

command_group! {
    /// Approximate cardinality counting.
    pub trait HyperLogLogCommands {
        /// `true` if the estimated cardinality changed.
        fn pfadd(&self, key: impl ToArg, elements: &[impl ToArg]) -> Pending<bool> {
            let mut args = vec![key.to_arg()];
            args.extend(to_args(elements));

            convert(self.execute("PFADD", args))
        }

        /// Estimated cardinality of the union of `keys`.
        fn pfcount(&self, keys: &[impl ToArg]) -> Pending<i64> {
            convert(self.execute("PFCOUNT", to_args(keys).collect()))
        }

        fn pfmerge(&self, dest: impl ToArg, sources: &[impl ToArg]) -> Pending<bool> {
            let mut args = vec![dest.to_arg()];
            args.extend(to_args(sources));

            wait_ok(self.execute("PFMERGE", args))
        }
    }
}
