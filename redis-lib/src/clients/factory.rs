use crate::clients::Redis;
use crate::connection::{create_connection, ConnectOptions, RedisConnection};
use tokio::net::ToSocketAddrs;

/// Connect to the server at `addr` and wrap the connection in a [`Redis`].
///
/// ```no_run
/// use redis_facade::{create_redis, ConnectOptions, StringCommands};
///
/// # async fn run() -> redis_facade::Result<()> {
/// let redis = create_redis("127.0.0.1:6379", ConnectOptions::new().db(1)).await?;
/// redis.set("hello", "world").await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_redis<A: ToSocketAddrs>(addr: A, options: ConnectOptions) -> crate::Result<Redis> {
    create_client(addr, options).await
}

/// Connect to the server at `addr` and build the facade type `F` around the
/// connection.
///
/// Authentication and database selection from `options` complete before the
/// facade is built. Errors from connecting, `AUTH` or `SELECT` are returned
/// unchanged and no facade is produced.
pub async fn create_client<F, A>(addr: A, options: ConnectOptions) -> crate::Result<F>
where
    F: From<RedisConnection>,
    A: ToSocketAddrs,
{
    let conn = create_connection(addr, &options).await?;

    Ok(F::from(conn))
}
