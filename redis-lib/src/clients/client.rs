//! Redis client facade.
//!
//! `Redis` gathers the command groups of `crate::cmd` and the connection-level
//! commands in one type. It holds no state besides the connection handle.

use crate::cmd::{convert, CommandExecutor, ToArg};
use crate::connection::{ConnectionHandle, Encoding, RedisConnection};
use crate::reply::wait_ok;
use crate::{Frame, Pending};
use bytes::Bytes;
use std::fmt;
use tracing::instrument;

/// High-level Redis interface.
///
/// Every command group trait (`StringCommands`, `HashCommands`, ...) is
/// implemented for `Redis` through `CommandExecutor`; bring the traits in
/// scope to call their methods.
///
/// Each command method returns a [`Pending`] right away. The command is
/// already queued when the method returns, so commands reach the server in
/// the order the methods were called.
pub struct Redis<C = RedisConnection> {
    conn: C,
}

/// Declare the facade's own methods together with `CONNECTION_METHODS`, the
/// table of their names no command group may reuse.
macro_rules! connection_methods {
    (
        impl<C: ConnectionHandle> Redis<C> {
            $(
                $(#[$attr:meta])*
                pub fn $method:ident($($params:tt)*) $(-> $ret:ty)? $body:block
            )*
        }
    ) => {
        impl<C: ConnectionHandle> Redis<C> {
            $(
                $(#[$attr])*
                pub fn $method($($params)*) $(-> $ret)? $body
            )*
        }

        #[cfg(test)]
        pub(crate) const CONNECTION_METHODS: &[&str] = &[$(stringify!($method)),*];
    };
}

connection_methods! {
    impl<C: ConnectionHandle> Redis<C> {
        pub fn new(conn: C) -> Redis<C> {
            Redis { conn }
        }

        /// Close the underlying connection.
        pub fn close(&self) {
            self.conn.close();
        }

        /// Currently selected db index.
        pub fn db(&self) -> u32 {
            self.conn.db()
        }

        /// Reply encoding, if one was set at connect time.
        pub fn encoding(&self) -> Option<Encoding> {
            self.conn.encoding()
        }

        pub fn connection(&self) -> &C {
            &self.conn
        }

        /// `true` after `MULTI` was issued and before `EXEC` or `DISCARD`.
        pub fn in_transaction(&self) -> bool {
            self.conn.in_transaction()
        }

        /// `true` if the connection is closed.
        pub fn closed(&self) -> bool {
            self.conn.closed()
        }

        /// Authenticate to the server.
        ///
        /// [`ConnectionHandle::auth`]
        #[instrument(skip(self, password))]
        pub fn auth(&self, password: &str) -> Pending<bool> {
            self.conn.auth(password)
        }

        /// Echo the given message; resolves to the same bytes.
        pub fn echo(&self, message: impl ToArg) -> Pending<Bytes> {
            convert(self.conn.execute("ECHO", vec![message.to_arg()]))
        }

        /// Ping the server. Resolves to `PONG`.
        pub fn ping(&self) -> Pending<Bytes> {
            convert(self.conn.execute("PING", vec![]))
        }

        /// Ask the server to close the connection. The connection reports
        /// itself closed once this resolves.
        #[instrument(skip(self))]
        pub fn quit(&self) -> Pending<bool> {
            wait_ok(self.conn.execute("QUIT", vec![]))
        }

        /// Change the selected database.
        ///
        /// [`ConnectionHandle::select`]
        #[instrument(skip(self))]
        pub fn select(&self, db: u32) -> Pending<bool> {
            self.conn.select(db)
        }
    }
}

impl<C: ConnectionHandle> CommandExecutor for Redis<C> {
    fn execute(&self, command: &str, args: Vec<Bytes>) -> Pending<Frame> {
        self.conn.execute(command, args)
    }
}

impl<C: ConnectionHandle> From<C> for Redis<C> {
    fn from(conn: C) -> Redis<C> {
        Redis::new(conn)
    }
}

impl<C: fmt::Debug> fmt::Debug for Redis<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Redis").field(&self.conn).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{GenericCommands, ScriptingCommands, SortedSetCommands, StringCommands};
    use crate::Error;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Records every command and answers from a fixed table.
    #[derive(Debug, Default)]
    struct Recorder {
        sent: Mutex<Vec<Vec<Bytes>>>,
        db: AtomicU32,
        in_transaction: AtomicBool,
        closed: AtomicBool,
    }

    impl Recorder {
        fn sent(&self) -> Vec<Vec<Bytes>> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl ConnectionHandle for Recorder {
        fn execute(&self, command: &str, args: Vec<Bytes>) -> Pending<Frame> {
            if self.closed() {
                return Pending::ready(Err(Error::closed()));
            }

            let reply = match command {
                "PING" => Frame::Simple("PONG".into()),
                "ECHO" => Frame::Bulk(args[0].clone()),
                "QUIT" | "SET" => Frame::Simple("OK".into()),
                "ZADD" => Frame::Integer(1),
                "SCAN" => Frame::Array(vec![Frame::Bulk("0".into()), Frame::Array(vec![])]),
                _ => Frame::Null,
            };

            let mut line = vec![Bytes::from(command.to_string())];
            line.extend(args);
            self.sent.lock().unwrap().push(line);

            Pending::ready(Ok(reply))
        }

        fn auth(&self, password: &str) -> Pending<bool> {
            let accepted = password == "secret";
            Pending::ready(if accepted {
                Ok(true)
            } else {
                Err(Error::Authentication("invalid password".into()))
            })
        }

        fn select(&self, db: u32) -> Pending<bool> {
            self.db.store(db, Ordering::SeqCst);
            Pending::ready(Ok(true))
        }

        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }

        fn db(&self) -> u32 {
            self.db.load(Ordering::SeqCst)
        }

        fn encoding(&self) -> Option<Encoding> {
            None
        }

        fn in_transaction(&self) -> bool {
            self.in_transaction.load(Ordering::SeqCst)
        }

        fn closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn connection_commands_use_protocol_keywords() {
        let redis = Redis::new(Recorder::default());

        assert_eq!(redis.ping().await.unwrap(), "PONG");
        assert_eq!(redis.echo("").await.unwrap(), "");
        assert!(redis.quit().await.unwrap());

        let sent = redis.connection().sent();
        assert_eq!(sent[0], vec![Bytes::from("PING")]);
        assert_eq!(sent[1], vec![Bytes::from("ECHO"), Bytes::new()]);
        assert_eq!(sent[2], vec![Bytes::from("QUIT")]);
    }

    #[tokio::test]
    async fn state_is_read_through_on_every_access() {
        let redis = Redis::new(Recorder::default());
        assert_eq!(redis.db(), 0);
        assert!(!redis.in_transaction());

        assert!(redis.select(3).await.unwrap());
        assert_eq!(redis.db(), 3);

        redis.connection().in_transaction.store(true, Ordering::SeqCst);
        assert!(redis.in_transaction());
        assert_eq!(redis.encoding(), None);
    }

    #[tokio::test]
    async fn auth_errors_pass_through_unchanged() {
        let redis = Redis::new(Recorder::default());
        assert!(redis.auth("secret").await.unwrap());
        assert!(matches!(redis.auth("wrong").await, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn close_delegates_to_the_handle() {
        let redis = Redis::new(Recorder::default());
        redis.close();

        assert!(redis.closed());
        assert!(matches!(redis.ping().await, Err(Error::Connection(_))));
    }

    #[tokio::test]
    async fn command_groups_encode_their_arguments() {
        let redis = Redis::from(Recorder::default());

        assert!(redis.set("key", 10_i64).await.unwrap());
        assert_eq!(redis.zadd("z", &[(1.5, "a"), (2.0, "b")]).await.unwrap(), 1);
        let (cursor, keys) = redis.scan(0, Some("user:*"), Some(100)).await.unwrap();
        assert_eq!(cursor, 0);
        assert!(keys.is_empty());
        let _ = redis.eval("return 1", &["k1", "k2"], &["a1"]).await.unwrap();

        let as_text = |line: &Vec<Bytes>| {
            line.iter()
                .map(|arg| String::from_utf8_lossy(arg).into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let sent: Vec<String> = redis.connection().sent().iter().map(as_text).collect();
        assert_eq!(
            sent,
            vec![
                "SET key 10",
                "ZADD z 1.5 a 2 b",
                "SCAN 0 MATCH user:* COUNT 100",
                "EVAL return 1 2 k1 k2 a1",
            ]
        );
    }
}
