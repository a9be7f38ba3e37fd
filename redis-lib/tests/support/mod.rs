//! A small in-process server speaking just enough of the protocol for the
//! client tests. Every accepted socket gets its own session; keys are shared.

#![allow(dead_code)]

use bytes::Bytes;
use redis_facade::{Frame, FrameStream};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

type Store = Arc<Mutex<HashMap<(u32, Bytes), Bytes>>>;

const DATABASES: u32 = 16;

/// Start a server, optionally requiring `password`.
pub async fn start(password: Option<&'static str>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = Store::default();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(serve(FrameStream::new(socket), store.clone(), password));
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve(mut stream: FrameStream, store: Store, password: Option<&'static str>) {
    let mut session = Session {
        store,
        password,
        authenticated: password.is_none(),
        db: 0,
        queued: None,
    };

    while let Ok(Some(frame)) = stream.read_frame().await {
        let Frame::Array(items) = frame else {
            return;
        };
        let args: Vec<Bytes> = items
            .into_iter()
            .map(|item| match item {
                Frame::Bulk(arg) => arg,
                other => panic!("client sent a non-bulk argument: {other:?}"),
            })
            .collect();

        let name = String::from_utf8_lossy(&args[0]).to_uppercase();
        // Drops the socket without answering.
        if name == "CRASH" {
            return;
        }

        let reply = session.apply(&name, &args[1..]);
        if stream.write_frame(&reply).await.is_err() || name == "QUIT" {
            return;
        }
    }
}

struct Session {
    store: Store,
    password: Option<&'static str>,
    authenticated: bool,
    db: u32,
    queued: Option<Vec<(String, Vec<Bytes>)>>,
}

fn ok() -> Frame {
    Frame::Simple("OK".to_string())
}

fn error(msg: &str) -> Frame {
    Frame::Error(msg.to_string())
}

impl Session {
    fn apply(&mut self, name: &str, args: &[Bytes]) -> Frame {
        if name == "AUTH" {
            return if self.password.is_some_and(|pw| args[0] == pw) {
                self.authenticated = true;
                ok()
            } else {
                error("ERR invalid password")
            };
        }
        if !self.authenticated {
            return error("NOAUTH Authentication required.");
        }

        if let Some(queue) = &mut self.queued {
            if !matches!(name, "EXEC" | "DISCARD" | "MULTI" | "QUIT") {
                queue.push((name.to_string(), args.to_vec()));
                return Frame::Simple("QUEUED".to_string());
            }
        }

        match name {
            "PING" => Frame::Simple("PONG".to_string()),
            "ECHO" => Frame::Bulk(args[0].clone()),
            "QUIT" => ok(),
            "SELECT" => match std::str::from_utf8(&args[0]).ok().and_then(|s| s.parse::<u32>().ok()) {
                Some(db) if db < DATABASES => {
                    self.db = db;
                    ok()
                }
                _ => error("ERR DB index is out of range"),
            },
            "SET" => {
                self.store.lock().unwrap().insert((self.db, args[0].clone()), args[1].clone());
                ok()
            }
            "GET" => match self.store.lock().unwrap().get(&(self.db, args[0].clone())) {
                Some(value) => Frame::Bulk(value.clone()),
                None => Frame::Null,
            },
            "DEL" => {
                let mut store = self.store.lock().unwrap();
                let removed = args.iter().filter(|key| store.remove(&(self.db, (*key).clone())).is_some()).count();
                Frame::Integer(removed as i64)
            }
            "INCR" => {
                let mut store = self.store.lock().unwrap();
                let entry = store.entry((self.db, args[0].clone())).or_insert_with(|| Bytes::from("0"));
                match std::str::from_utf8(entry).ok().and_then(|s| s.parse::<i64>().ok()) {
                    Some(value) => {
                        *entry = Bytes::from((value + 1).to_string());
                        Frame::Integer(value + 1)
                    }
                    None => error("ERR value is not an integer or out of range"),
                }
            }
            "DBSIZE" => Frame::Integer(self.keys().len() as i64),
            "SCAN" => self.scan(args),
            "MULTI" => {
                self.queued = Some(Vec::new());
                ok()
            }
            "EXEC" => match self.queued.take() {
                Some(queue) => Frame::Array(queue.iter().map(|(name, args)| self.apply(name, args)).collect()),
                None => error("ERR EXEC without MULTI"),
            },
            "DISCARD" => match self.queued.take() {
                Some(_) => ok(),
                None => error("ERR DISCARD without MULTI"),
            },
            _ => error(&format!("ERR unknown command '{name}'")),
        }
    }

    fn keys(&self) -> Vec<Bytes> {
        let store = self.store.lock().unwrap();
        let mut keys: Vec<Bytes> = store.keys().filter(|(db, _)| *db == self.db).map(|(_, key)| key.clone()).collect();
        keys.sort();
        keys
    }

    /// Pages of two keys; the cursor is the index of the next page.
    fn scan(&self, args: &[Bytes]) -> Frame {
        let cursor: usize = std::str::from_utf8(&args[0]).unwrap().parse().unwrap();
        let keys = self.keys();
        let end = (cursor + 2).min(keys.len());
        let next = if end == keys.len() { 0 } else { end };

        Frame::Array(vec![
            Frame::Bulk(Bytes::from(next.to_string())),
            Frame::Array(keys[cursor.min(end)..end].iter().cloned().map(Frame::Bulk).collect()),
        ])
    }
}
