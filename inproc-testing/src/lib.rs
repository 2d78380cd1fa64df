//! In-process gRPC servers for testing clients.
//!
//! Spins up a real tonic server on an OS-assigned loopback port, yields
//! the connection address, and tears the server down when the scope ends.
//! Not for use anywhere in production: the listener is insecure and the
//! shutdown wait is best effort.
//!
//! ```no_run
//! # use inproc_pb::echo_service_server::{EchoService, EchoServiceServer};
//! # use inproc_pb::echo_service_client::EchoServiceClient;
//! # use inproc_pb::{DelayedEchoRequest, EchoRequest, EchoResponse};
//! # use tonic::{Request, Response, Status};
//! # #[derive(Default)]
//! # struct Echo;
//! # #[tonic::async_trait]
//! # impl EchoService for Echo {
//! #     async fn echo(
//! #         &self,
//! #         request: Request<EchoRequest>,
//! #     ) -> Result<Response<EchoResponse>, Status> {
//! #         let req = request.into_inner();
//! #         Ok(Response::new(EchoResponse { message: req.message }))
//! #     }
//! #     async fn delayed_echo(
//! #         &self,
//! #         request: Request<DelayedEchoRequest>,
//! #     ) -> Result<Response<EchoResponse>, Status> {
//! #         let req = request.into_inner();
//! #         Ok(Response::new(EchoResponse { message: req.message }))
//! #     }
//! # }
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use inproc_testing::with_ephemeral_server;
//!
//! let reply = with_ephemeral_server(
//!     |mut server| server.add_service(EchoServiceServer::new(Echo)),
//!     |address| async move {
//!         let mut client =
//!             EchoServiceClient::connect(format!("http://{address}"))
//!                 .await?;
//!         let resp = client
//!             .echo(EchoRequest { message: "hi".into() })
//!             .await?
//!             .into_inner();
//!         Ok::<_, Box<dyn std::error::Error>>(resp.message)
//!     },
//! )
//! .await??;
//! assert_eq!(reply, "hi");
//! # Ok(())
//! # }
//! ```

mod error;
mod server;

pub use error::FixtureError;
pub use server::{
    FixtureOptions, ServerFixture, with_ephemeral_server,
    with_ephemeral_server_opts,
};
