use std::{
    error::Error,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use envconfig::Envconfig;
use inproc_dev::Config;
use inproc_pb::{
    DelayedEchoRequest, EchoRequest, EchoResponse,
    echo_service_server::{EchoService, EchoServiceServer},
};
use tonic::{Request, Response, Status, transport::Server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let conf = Config::init_from_env()?;
    let socket =
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), conf.http_port);
    let echo_service: EchoServiceServer<DevEcho> =
        EchoServiceServer::new(DevEcho {});
    tracing::info!("start server on port {}", conf.http_port);
    let (reflection_server_v1a, reflection_server_v1) =
        inproc_dev::create_reflection();
    Server::builder()
        .add_service(echo_service)
        .add_service(reflection_server_v1a)
        .add_service(reflection_server_v1)
        .serve(socket)
        .await?;
    Ok(())
}

struct DevEcho {}

#[tonic::async_trait]
impl EchoService for DevEcho {
    async fn echo(
        &self,
        request: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let echo_request = request.into_inner();
        info!("echo: {:?}", echo_request);
        Ok(Response::new(EchoResponse {
            message: echo_request.message,
        }))
    }

    async fn delayed_echo(
        &self,
        request: Request<DelayedEchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let echo_request = request.into_inner();
        info!("delayed_echo: {:?}", echo_request);
        tokio::time::sleep(Duration::from_millis(echo_request.delay_ms)).await;
        Ok(Response::new(EchoResponse {
            message: echo_request.message,
        }))
    }
}
