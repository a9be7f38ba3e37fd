use bytes::Bytes;
use clap::{Parser, Subcommand};
use redis_facade::{
    create_redis, ConnectOptions, Encoding, GenericCommands, ServerCommands, StringCommands, DEFAULT_PORT,
};
use std::num::ParseIntError;
use std::str;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "redis-cli", version, author, about = "Issue Redis commands")]
struct CliCommand {
    #[clap(subcommand)]
    sub_cmd: Command,

    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database selected after connecting.
    #[clap(long)]
    db: Option<u32>,

    /// Password sent with `AUTH` before anything else.
    #[clap(long)]
    password: Option<String>,

    /// Reject replies that are not valid in this encoding, e.g. `utf-8`.
    #[clap(long, value_parser = str::parse::<Encoding>)]
    encoding: Option<Encoding>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Echo {
        message: Bytes,
    },
    Get {
        key: String,
    },
    Set {
        key: String,
        value: Bytes,
        /// Expiration in milliseconds.
        #[clap(long, value_parser = duration_from)]
        expires: Option<Duration>,
    },
    Del {
        #[clap(required = true)]
        keys: Vec<String>,
    },
    Dbsize,
    Info {
        section: Option<String>,
    },
}

fn duration_from(src: &str) -> Result<Duration, ParseIntError> {
    let ms = src.parse::<u64>()?;
    Ok(Duration::from_millis(ms))
}

fn set_up_logging() -> Result<(), Error> {
    // `RUST_LOG` picks the level; warnings only by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::default().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn print_bytes(bytes: &Bytes) {
    if let Ok(string) = str::from_utf8(bytes) {
        println!("\"{string}\"");
    } else {
        println!("{bytes:?}");
    }
}

/// `flavor = "current_thread"` is used here to make CLI lighter instead of multi-threads.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    set_up_logging()?;

    let cmd = CliCommand::parse();

    let mut options = ConnectOptions::new();
    options.db = cmd.db;
    options.password = cmd.password;
    options.encoding = cmd.encoding;

    let addr = format!("{}:{}", cmd.host, cmd.port);
    debug!(%addr, db = ?options.db, command = ?cmd.sub_cmd, "connecting");
    let redis = create_redis(addr, options).await?;

    match cmd.sub_cmd {
        Command::Ping => print_bytes(&redis.ping().await?),
        Command::Echo { message } => print_bytes(&redis.echo(message).await?),
        Command::Get { key } => match redis.get(&key).await? {
            Some(bytes) => print_bytes(&bytes),
            None => println!("(nil)"),
        },
        Command::Set { key, value, expires } => {
            let ok = match expires {
                Some(expires) => redis.set_expires(&key, value, expires).await?,
                None => redis.set(&key, value).await?,
            };
            if !ok {
                return Err(format!("SET {key} was not acknowledged").into());
            }
            println!("OK");
        }
        Command::Del { keys } => println!("(integer) {}", redis.del(&keys).await?),
        Command::Dbsize => println!("(integer) {}", redis.dbsize().await?),
        Command::Info { section } => {
            let info = redis.info(section.as_deref()).await?;
            println!("{}", String::from_utf8_lossy(&info));
        }
    }

    let _ = redis.quit().await;

    Ok(())
}
