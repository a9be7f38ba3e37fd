use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// The outcome of one issued command.
///
/// A `Pending` is returned as soon as a command method is called; the request
/// has already been queued on the connection at that point, so the order in
/// which pendings are awaited does not change the order in which commands
/// reach the server. Awaiting it yields the reply once. Dropping it abandons
/// the wait but not the request.
#[must_use = "the reply is lost unless the pending result is awaited"]
pub struct Pending<T> {
    inner: Pin<Box<dyn Future<Output = crate::Result<T>> + Send + 'static>>,
}

impl<T> Pending<T> {
    /// Wrap a future resolving to the reply.
    pub fn new<F>(fut: F) -> Pending<T>
    where
        F: Future<Output = crate::Result<T>> + Send + 'static,
    {
        Pending { inner: Box::pin(fut) }
    }

    /// A pending result that is already resolved, e.g. a command refused
    /// before it reached the connection.
    pub fn ready(result: crate::Result<T>) -> Pending<T>
    where
        T: Send + 'static,
    {
        Pending::new(std::future::ready(result))
    }

    /// Chain a fallible conversion on top of the reply.
    pub fn and_then<U, F>(self, f: F) -> Pending<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnOnce(T) -> crate::Result<U> + Send + 'static,
    {
        Pending::new(async move { f(self.await?) })
    }
}

impl<T> Future for Pending<T> {
    type Output = crate::Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}
