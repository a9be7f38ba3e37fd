//! The major components are:
//! * `clients`: the `Redis` facade and the `create_redis` factory.
//! * `connection`: the connection handle contract and its TCP implementation.
//! * `cmd`: command-group traits composed into the facade.
//! * `reply`: helpers normalizing raw replies into typed values.
//! * `frame`: represents a single Redis protocol frame.
//! * `stream`: reads and writes frames on a `TcpStream`.

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod clients;
pub use clients::{create_client, create_redis, Redis};

pub mod cmd;
pub use cmd::{
    CommandExecutor, GenericCommands, HashCommands, HyperLogLogCommands, ListCommands,
    ScriptingCommands, ServerCommands, SetCommands, SortedSetCommands, StringCommands, ToArg,
    TransactionCommands,
};

pub mod connection;
pub use connection::{create_connection, ConnectOptions, ConnectionHandle, Encoding, RedisConnection};

mod error;
pub use error::Error;

pub mod frame;
pub use frame::Frame;

mod pending;
pub use pending::Pending;

pub mod reply;
pub use reply::{wait_convert, wait_ok, FromFrame};

mod shutdown;
use shutdown::Shutdown;

mod stream;
pub use stream::FrameStream;

/// Default port that a redis server listens on.
pub const DEFAULT_PORT: u16 = 6379;

pub type Result<T> = std::result::Result<T, Error>;
