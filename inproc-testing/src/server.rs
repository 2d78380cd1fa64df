use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::{Channel, Endpoint, Server};
use tracing::{debug, info};

use crate::error::FixtureError;

/// Options for an ephemeral server.
#[derive(Clone, Debug)]
pub struct FixtureOptions {
    /// Maximum number of requests processed concurrently on one connection.
    pub concurrency: usize,
    /// Bounded wait applied to graceful shutdown.
    pub grace: Duration,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            grace: Duration::from_secs(1),
        }
    }
}

/// An in-process gRPC server bound to an OS-assigned loopback port.
///
/// The listener is bound before `start` returns, so the address is
/// connectable as soon as the fixture exists. Dropping the fixture signals
/// shutdown without waiting; [`ServerFixture::shutdown`] waits up to the
/// grace period.
pub struct ServerFixture {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), tonic::transport::Error>>,
    grace: Duration,
}

impl ServerFixture {
    /// Starts a server with default options. `register` receives a
    /// preconfigured [`Server`] builder and attaches services to it, e.g.
    /// `|mut s| s.add_service(EchoServiceServer::new(Echo))`.
    pub async fn start<F>(register: F) -> Result<Self, FixtureError>
    where
        F: FnOnce(Server) -> Router,
    {
        Self::start_with(register, FixtureOptions::default()).await
    }

    pub async fn start_with<F>(
        register: F,
        options: FixtureOptions,
    ) -> Result<Self, FixtureError>
    where
        F: FnOnce(Server) -> Router,
    {
        let listener =
            TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let builder = Server::builder()
            .concurrency_limit_per_connection(options.concurrency);
        let router = register(builder);
        let incoming = TcpListenerStream::new(listener);
        let handle = tokio::spawn(async move {
            router
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = shutdown_rx.await;
                })
                .await
        });
        info!(port = local_addr.port(), "ephemeral server listening");
        Ok(Self {
            local_addr,
            shutdown: Some(shutdown_tx),
            handle,
            grace: options.grace,
        })
    }

    /// Connection address in the form `localhost:<port>`.
    pub fn address(&self) -> String {
        format!("localhost:{}", self.local_addr.port())
    }

    /// `http://` URI for opening an insecure channel.
    pub fn uri(&self) -> String {
        format!("http://{}", self.address())
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Opens an insecure channel to the running server.
    pub async fn channel(&self) -> Result<Channel, FixtureError> {
        let channel = Endpoint::from_shared(self.uri())?.connect().await?;
        Ok(channel)
    }

    /// Requests graceful shutdown and waits for the server task, bounded
    /// by the grace period. A grace overrun is tolerated silently; the
    /// server task keeps draining in the background.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let grace = self.grace;
        match tokio::time::timeout(grace, &mut self.handle).await {
            Ok(Ok(Ok(()))) => debug!("ephemeral server stopped"),
            Ok(Ok(Err(e))) => {
                debug!(error = %e, "ephemeral server exited with error")
            }
            Ok(Err(e)) => debug!(error = %e, "ephemeral server task failed"),
            Err(_) => debug!(
                grace_ms = grace.as_millis() as u64,
                "shutdown grace period elapsed"
            ),
        }
    }
}

impl Drop for ServerFixture {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Scoped form of [`ServerFixture`]: starts a server, runs `body` with the
/// connection address, and always shuts the server down before returning
/// the body's output. Errors produced by the body pass through unmodified.
pub async fn with_ephemeral_server<F, B, Fut, T>(
    register: F,
    body: B,
) -> Result<T, FixtureError>
where
    F: FnOnce(Server) -> Router,
    B: FnOnce(String) -> Fut,
    Fut: Future<Output = T>,
{
    with_ephemeral_server_opts(register, FixtureOptions::default(), body)
        .await
}

pub async fn with_ephemeral_server_opts<F, B, Fut, T>(
    register: F,
    options: FixtureOptions,
    body: B,
) -> Result<T, FixtureError>
where
    F: FnOnce(Server) -> Router,
    B: FnOnce(String) -> Fut,
    Fut: Future<Output = T>,
{
    let fixture = ServerFixture::start_with(register, options).await?;
    let out = body(fixture.address()).await;
    fixture.shutdown().await;
    Ok(out)
}
