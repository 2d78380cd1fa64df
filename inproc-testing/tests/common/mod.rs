use std::time::Duration;

use inproc_pb::echo_service_server::{EchoService, EchoServiceServer};
use inproc_pb::{DelayedEchoRequest, EchoRequest, EchoResponse};
use tonic::{Request, Response, Status};

#[derive(Default)]
pub struct Echo;

#[tonic::async_trait]
impl EchoService for Echo {
    async fn echo(
        &self,
        request: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let req = request.into_inner();
        Ok(Response::new(EchoResponse {
            message: req.message,
        }))
    }

    async fn delayed_echo(
        &self,
        request: Request<DelayedEchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let req = request.into_inner();
        tokio::time::sleep(Duration::from_millis(req.delay_ms)).await;
        Ok(Response::new(EchoResponse {
            message: req.message,
        }))
    }
}

pub fn echo_service() -> EchoServiceServer<Echo> {
    EchoServiceServer::new(Echo)
}
