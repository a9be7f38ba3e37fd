//! Command groups.
//!
//! Each group is a trait of default methods over [`CommandExecutor`] and is
//! blanket implemented for every executor, so a type gains all groups by
//! implementing `execute` once. Method names are disjoint across groups and
//! with the facade's own connection methods; see the test at the bottom.

/// Declare a command group: the trait, its blanket implementation for every
/// [`CommandExecutor`] and the `METHODS` table listing the trait's method
/// names, all from the one list of methods.
macro_rules! command_group {
    (
        $(#[$attr:meta])*
        pub trait $group:ident {
            $(
                $(#[$method_attr:meta])*
                fn $method:ident(&$this:ident $(, $arg:ident: $ty:ty)*) -> $ret:ty $body:block
            )*
        }
    ) => {
        $(#[$attr])*
        pub trait $group: $crate::cmd::CommandExecutor {
            $(
                $(#[$method_attr])*
                fn $method(&$this $(, $arg: $ty)*) -> $ret $body
            )*
        }

        impl<T: $crate::cmd::CommandExecutor + ?Sized> $group for T {}

        #[cfg(test)]
        pub(crate) const METHODS: &[&str] = &[$(stringify!($method)),*];
    };
}

mod generic;
pub use generic::GenericCommands;

mod hash;
pub use hash::HashCommands;

mod hyperloglog;
pub use hyperloglog::HyperLogLogCommands;

mod list;
pub use list::ListCommands;

mod scripting;
pub use scripting::ScriptingCommands;

mod server;
pub use server::ServerCommands;

mod set;
pub use set::SetCommands;

mod sorted_set;
pub use sorted_set::SortedSetCommands;

mod string;
pub use string::StringCommands;

mod transaction;
pub use transaction::TransactionCommands;

use crate::reply::{wait_convert, FromFrame};
use crate::{Frame, Pending};
use bytes::Bytes;

/// Issues raw commands. The only method a type must provide to gain every
/// command group.
pub trait CommandExecutor {
    /// Issue `command` with `args` and return the raw reply.
    fn execute(&self, command: &str, args: Vec<Bytes>) -> Pending<Frame>;
}

#[cfg(test)]
const EXECUTOR_METHODS: &[&str] = &["execute"];

/// Conversion of a command argument into its bulk-string form.
pub trait ToArg {
    fn to_arg(&self) -> Bytes;
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Bytes {
        (**self).to_arg()
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for [u8] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for Bytes {
    fn to_arg(&self) -> Bytes {
        self.clone()
    }
}

macro_rules! display_arg {
    ($($ty:ty),*) => {
        $(
            impl ToArg for $ty {
                fn to_arg(&self) -> Bytes {
                    Bytes::from(self.to_string())
                }
            }
        )*
    };
}

// `f64` renders infinities as `inf` / `-inf`, which the server accepts.
display_arg!(i32, i64, u32, u64, usize, f64);

/// Convert every element of `items`.
pub(crate) fn to_args(items: &[impl ToArg]) -> impl Iterator<Item = Bytes> + '_ {
    items.iter().map(ToArg::to_arg)
}

/// Resolve the reply through `T`'s standard conversion.
pub(crate) fn convert<T: FromFrame + Send + 'static>(fut: Pending<Frame>) -> Pending<T> {
    wait_convert(fut, T::from_frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn command_groups_do_not_share_method_names() {
        let groups: &[(&str, &[&str])] = &[
            ("executor", EXECUTOR_METHODS),
            ("connection", crate::clients::CONNECTION_METHODS),
            ("generic", generic::METHODS),
            ("hash", hash::METHODS),
            ("hyperloglog", hyperloglog::METHODS),
            ("list", list::METHODS),
            ("scripting", scripting::METHODS),
            ("server", server::METHODS),
            ("set", set::METHODS),
            ("sorted_set", sorted_set::METHODS),
            ("string", string::METHODS),
            ("transaction", transaction::METHODS),
        ];

        let mut owners = HashMap::new();
        for (group, methods) in groups {
            for method in *methods {
                if let Some(other) = owners.insert(*method, *group) {
                    panic!("`{method}` is defined by both `{other}` and `{group}`");
                }
            }
        }
    }

    #[test]
    fn method_tables_follow_the_declarations() {
        assert_eq!(generic::METHODS.len(), 15);
        assert!(generic::METHODS.contains(&"iscan"));
        assert!(string::METHODS.contains(&"set_expires"));
        assert!(sorted_set::METHODS.contains(&"zrange_withscores"));
        assert_eq!(transaction::METHODS, ["multi", "exec", "discard", "watch", "unwatch"]);

        for method in ["auth", "select", "db", "ping", "quit", "new", "connection"] {
            assert!(crate::clients::CONNECTION_METHODS.contains(&method), "{method}");
        }
    }

    #[test]
    fn numbers_are_sent_in_decimal() {
        assert_eq!(42_i64.to_arg(), "42");
        assert_eq!((-1_i64).to_arg(), "-1");
        assert_eq!(2.5_f64.to_arg(), "2.5");
        assert_eq!(f64::NEG_INFINITY.to_arg(), "-inf");
    }

    #[test]
    fn references_delegate() {
        let key = String::from("key");
        assert_eq!((&key).to_arg(), "key");
        assert_eq!(to_args(&["a", "b"]).collect::<Vec<_>>(), vec![Bytes::from("a"), Bytes::from("b")]);
    }
}
