use crate::cmd::{convert, to_args, ToArg};
use crate::reply::wait_ok;
use crate::{Frame, Pending};
use bytes::Bytes;

command_group! {
    /// Lua scripting.
    pub trait ScriptingCommands {
        /// Run `script` with `keys` and `args`. The reply is returned raw since
        /// its shape depends on the script.
        fn eval(&self, script: impl ToArg, keys: &[impl ToArg], args: &[impl ToArg]) -> Pending<Frame> {
            let mut cmd_args = vec![script.to_arg(), keys.len().to_arg()];
            cmd_args.extend(to_args(keys));
            cmd_args.extend(to_args(args));

            self.execute("EVAL", cmd_args)
        }

        /// Run a script previously loaded with `script_load`.
        fn evalsha(&self, sha: impl ToArg, keys: &[impl ToArg], args: &[impl ToArg]) -> Pending<Frame> {
            let mut cmd_args = vec![sha.to_arg(), keys.len().to_arg()];
            cmd_args.extend(to_args(keys));
            cmd_args.extend(to_args(args));

            self.execute("EVALSHA", cmd_args)
        }

        /// Returns the SHA1 digest of `script`.
        fn script_load(&self, script: impl ToArg) -> Pending<Bytes> {
            convert(self.execute("SCRIPT", vec![Bytes::from_static(b"LOAD"), script.to_arg()]))
        }

        fn script_exists(&self, digests: &[impl ToArg]) -> Pending<Vec<bool>> {
            let mut args = vec![Bytes::from_static(b"EXISTS")];
            args.extend(to_args(digests));

            convert(self.execute("SCRIPT", args))
        }

        fn script_flush(&self) -> Pending<bool> {
            wait_ok(self.execute("SCRIPT", vec![Bytes::from_static(b"FLUSH")]))
        }

        fn script_kill(&self) -> Pending<bool> {
            wait_ok(self.execute("SCRIPT", vec![Bytes::from_static(b"KILL")]))
        }
    }
}
