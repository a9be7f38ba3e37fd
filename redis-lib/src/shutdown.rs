use tokio::sync::watch;

/// Observes the close signal of one connection.
///
/// The driver task owns a `Shutdown`; `RedisConnection::close` flips the
/// paired `watch::Sender` to `true`. A `watch` channel is used so that a
/// close issued before the driver starts waiting is not lost.
#[derive(Debug)]
pub(crate) struct Shutdown {
    /// `true` once the close signal has been observed
    is_shutdown: bool,

    notify: watch::Receiver<bool>,
}

impl Shutdown {
    pub(crate) fn new(notify: watch::Receiver<bool>) -> Shutdown {
        let is_shutdown = *notify.borrow();

        Shutdown { is_shutdown, notify }
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.is_shutdown
    }

    /// Wait for the close signal.
    ///
    /// A dropped sender is not a close: the driver then finishes the replies
    /// it still owes and stops on its own.
    pub(crate) async fn recv(&mut self) {
        if self.is_shutdown {
            return;
        }

        let signalled = self.notify.wait_for(|closed| *closed).await.is_ok();
        if !signalled {
            std::future::pending::<()>().await;
        }

        self.is_shutdown = true;
    }
}
