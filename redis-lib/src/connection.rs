//! The connection handle the facade is built on.
//!
//! `ConnectionHandle` is the contract every command goes through.
//! `RedisConnection` implements it over TCP: requests are queued on an
//! unbounded channel at call time and a background task writes them and
//! matches replies to waiters in FIFO order.

use crate::frame::parse_decimal;
use crate::reply::wait_ok;
use crate::{Error, Frame, FrameStream, Pending, Shutdown};
use bytes::Bytes;
use std::collections::VecDeque;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument, warn};

/// Operations the facade needs from a live session.
///
/// Command methods return immediately with a [`Pending`]; state reads are
/// plain reads of the current value and never fail.
pub trait ConnectionHandle: Send + Sync {
    /// Issue `command` with `args`. Error replies fail the pending result
    /// with [`Error::Reply`].
    fn execute(&self, command: &str, args: Vec<Bytes>) -> Pending<Frame>;

    /// Send `AUTH`. A rejected password fails with [`Error::Authentication`].
    fn auth(&self, password: &str) -> Pending<bool>;

    /// Send `SELECT`. On success `db()` returns `db`; a rejected index fails
    /// with [`Error::InvalidDatabase`].
    fn select(&self, db: u32) -> Pending<bool>;

    /// Close the session. Queued and later commands fail with
    /// [`Error::Connection`].
    fn close(&self);

    /// Currently selected database index.
    fn db(&self) -> u32;

    /// Reply encoding chosen at connect time.
    fn encoding(&self) -> Option<Encoding>;

    /// `true` between issuing `MULTI` and issuing `EXEC` / `DISCARD`.
    fn in_transaction(&self) -> bool;

    /// `true` once the session is closed. Never reverts.
    fn closed(&self) -> bool;
}

/// Encoding bulk replies must be valid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(src: &str) -> crate::Result<Encoding> {
        match src.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            other => Err(Error::Protocol(format!("unsupported encoding `{other}`"))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf-8"),
        }
    }
}

/// Optional settings applied while connecting.
///
/// The password is sent before the database is selected.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub db: Option<u32>,
    pub password: Option<String>,
    pub encoding: Option<Encoding>,
}

impl ConnectOptions {
    pub fn new() -> ConnectOptions {
        ConnectOptions::default()
    }

    #[must_use]
    pub fn db(mut self, db: u32) -> ConnectOptions {
        self.db = Some(db);
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> ConnectOptions {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn encoding(mut self, encoding: Encoding) -> ConnectOptions {
        self.encoding = Some(encoding);
        self
    }
}

/// Open a connection to the server at `addr`.
///
/// Connects, then authenticates if a password is set, then selects the
/// database if one is set. Any failure closes the socket and is returned as
/// is: [`Error::Connection`], [`Error::Authentication`] or
/// [`Error::InvalidDatabase`].
#[instrument(skip(addr, options), fields(db = ?options.db, encoding = ?options.encoding))]
pub async fn create_connection<A: ToSocketAddrs>(
    addr: A,
    options: &ConnectOptions,
) -> crate::Result<RedisConnection> {
    let socket = TcpStream::connect(addr).await?;
    let address = socket.peer_addr()?;
    debug!(%address, "connected");

    let conn = RedisConnection::spawn(FrameStream::new(socket), address, options.encoding);

    if let Some(password) = &options.password {
        if !conn.auth(password).await? {
            conn.close();
            return Err(Error::Authentication("password was not accepted".to_string()));
        }
    }

    if let Some(db) = options.db {
        if !conn.select(db).await? {
            conn.close();
            return Err(Error::InvalidDatabase(format!("server did not select db {db}")));
        }
    }

    Ok(conn)
}

/// A single TCP session with the server.
///
/// Dropping the connection without calling `close` lets the requests already
/// issued complete; the socket is closed once their replies are read.
pub struct RedisConnection {
    address: SocketAddr,
    encoding: Option<Encoding>,
    state: Arc<State>,
    requests: mpsc::UnboundedSender<Request>,
    close_tx: watch::Sender<bool>,
}

/// Handle state shared with the driver task.
#[derive(Debug, Default)]
struct State {
    db: AtomicU32,
    in_transaction: AtomicBool,
    closed: AtomicBool,
}

/// Bookkeeping applied when the reply to a request arrives.
#[derive(Debug, Clone, Copy)]
enum OnReply {
    Nothing,
    Select(u32),
    Quit,
}

struct Request {
    frame: Frame,
    on_reply: OnReply,
    reply_tx: oneshot::Sender<crate::Result<Frame>>,
}

impl RedisConnection {
    fn spawn(stream: FrameStream, address: SocketAddr, encoding: Option<Encoding>) -> RedisConnection {
        let (requests, requests_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = watch::channel(false);
        let state = Arc::new(State::default());

        let driver = Driver {
            address,
            stream,
            requests: requests_rx,
            waiters: VecDeque::new(),
            state: state.clone(),
            encoding,
            shutdown: Shutdown::new(close_rx),
        };
        tokio::spawn(driver.run());

        RedisConnection {
            address,
            encoding,
            state,
            requests,
            close_tx,
        }
    }

    /// Address of the server this connection is attached to.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    fn send(&self, frame: Frame, on_reply: OnReply) -> crate::Result<oneshot::Receiver<crate::Result<Frame>>> {
        if self.closed() {
            return Err(Error::closed());
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let request = Request {
            frame,
            on_reply,
            reply_tx,
        };
        self.requests.send(request).map_err(|_| Error::closed())?;

        Ok(reply_rx)
    }
}

impl ConnectionHandle for RedisConnection {
    fn execute(&self, command: &str, args: Vec<Bytes>) -> Pending<Frame> {
        let command = command.to_ascii_uppercase();
        let on_reply = match command.as_str() {
            "SELECT" if self.in_transaction() => {
                return Pending::ready(Err(Error::Transaction(
                    "SELECT is refused while MULTI is open".to_string(),
                )));
            }
            "SELECT" => args
                .first()
                .and_then(|db| parse_decimal::<u32>(db))
                .map_or(OnReply::Nothing, OnReply::Select),
            "QUIT" => OnReply::Quit,
            _ => OnReply::Nothing,
        };

        let mut frame = Vec::with_capacity(args.len() + 1);
        frame.push(Frame::Bulk(Bytes::from(command.clone())));
        frame.extend(args.into_iter().map(Frame::Bulk));

        let reply_rx = match self.send(Frame::Array(frame), on_reply) {
            Ok(reply_rx) => reply_rx,
            Err(err) => return Pending::ready(Err(err)),
        };

        match command.as_str() {
            "MULTI" => self.state.in_transaction.store(true, Ordering::SeqCst),
            "EXEC" | "DISCARD" => self.state.in_transaction.store(false, Ordering::SeqCst),
            _ => {}
        }

        Pending::new(async move { reply_rx.await.unwrap_or_else(|_| Err(Error::closed())) })
    }

    fn auth(&self, password: &str) -> Pending<bool> {
        let reply = self.execute("AUTH", vec![Bytes::copy_from_slice(password.as_bytes())]);

        wait_ok(Pending::new(async move {
            reply.await.map_err(|err| match err {
                Error::Reply(msg) => Error::Authentication(msg),
                err => err,
            })
        }))
    }

    fn select(&self, db: u32) -> Pending<bool> {
        let reply = self.execute("SELECT", vec![Bytes::from(db.to_string())]);

        wait_ok(Pending::new(async move {
            reply.await.map_err(|err| match err {
                Error::Reply(msg) => Error::InvalidDatabase(msg),
                err => err,
            })
        }))
    }

    fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
        // The driver may already be gone; the flag above is what matters.
        let _ = self.close_tx.send(true);
    }

    fn db(&self) -> u32 {
        self.state.db.load(Ordering::SeqCst)
    }

    fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    fn in_transaction(&self) -> bool {
        self.state.in_transaction.load(Ordering::SeqCst)
    }

    fn closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for RedisConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConnection")
            .field("address", &self.address)
            .field("db", &self.db())
            .field("closed", &self.closed())
            .finish()
    }
}

/// Owns the socket. Writes queued requests and resolves waiters in order.
struct Driver {
    address: SocketAddr,
    stream: FrameStream,
    requests: mpsc::UnboundedReceiver<Request>,
    waiters: VecDeque<Waiter>,
    state: Arc<State>,
    encoding: Option<Encoding>,
    shutdown: Shutdown,
}

struct Waiter {
    on_reply: OnReply,
    reply_tx: oneshot::Sender<crate::Result<Frame>>,
}

impl Driver {
    #[instrument(name = "connection", skip(self), fields(address = %self.address))]
    async fn run(mut self) {
        if let Err(err) = self.process().await {
            warn!(cause = %err, "connection failed");
        }

        self.state.closed.store(true, Ordering::SeqCst);

        // Nothing more will be written or read; fail whoever is still waiting.
        for waiter in self.waiters.drain(..) {
            let _ = waiter.reply_tx.send(Err(Error::closed()));
        }
        self.requests.close();
        while let Ok(request) = self.requests.try_recv() {
            let _ = request.reply_tx.send(Err(Error::closed()));
        }

        debug!("connection closed");
    }

    async fn process(&mut self) -> crate::Result<()> {
        // `false` once every handle was dropped.
        let mut accepting = true;

        while !self.shutdown.is_shutdown() {
            if !accepting && self.waiters.is_empty() {
                return Ok(());
            }

            tokio::select! {
                request = self.requests.recv(), if accepting => match request {
                    Some(request) => {
                        debug!(request = ?request.frame);
                        self.stream.write_frame(&request.frame).await?;
                        self.waiters.push_back(Waiter {
                            on_reply: request.on_reply,
                            reply_tx: request.reply_tx,
                        });
                    }
                    // Replies to requests already written are still owed.
                    None => accepting = false,
                },
                response = self.stream.read_frame() => {
                    let Some(response) = response? else {
                        debug!("connection closed by server");
                        return Ok(());
                    };

                    debug!(?response);
                    let Some(waiter) = self.waiters.pop_front() else {
                        return Err(Error::Protocol(format!("reply without a request: {response}")));
                    };

                    if self.resolve(waiter, response) {
                        return Ok(());
                    }
                }
                () = self.shutdown.recv() => {}
            }
        }

        Ok(())
    }

    /// Hand `response` to `waiter`. Returns `true` when the session ends.
    fn resolve(&mut self, waiter: Waiter, response: Frame) -> bool {
        let result = match response {
            Frame::Error(msg) => Err(Error::Reply(msg)),
            frame => self.check_encoding(&frame).map(|()| frame),
        };

        let quit = match waiter.on_reply {
            OnReply::Select(db) => {
                if matches!(result, Ok(Frame::Simple(ref status)) if status == "OK") {
                    self.state.db.store(db, Ordering::SeqCst);
                }
                false
            }
            OnReply::Quit => {
                self.state.closed.store(true, Ordering::SeqCst);
                true
            }
            OnReply::Nothing => false,
        };

        // The caller may have dropped its `Pending`.
        let _ = waiter.reply_tx.send(result);

        quit
    }

    fn check_encoding(&self, frame: &Frame) -> crate::Result<()> {
        let Some(encoding) = self.encoding else {
            return Ok(());
        };

        match frame {
            Frame::Bulk(data) => std::str::from_utf8(data)
                .map(|_| ())
                .map_err(|_| Error::Protocol(format!("bulk reply is not valid {encoding}"))),
            Frame::Array(items) => items.iter().try_for_each(|item| self.check_encoding(item)),
            _ => Ok(()),
        }
    }
}
