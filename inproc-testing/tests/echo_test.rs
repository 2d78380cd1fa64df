mod common;

use inproc_pb::EchoRequest;
use inproc_pb::echo_service_client::EchoServiceClient;
use inproc_testing::with_ephemeral_server;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_echo_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let address = with_ephemeral_server(
        |mut server| server.add_service(common::echo_service()),
        |address| async move {
            let mut client =
                EchoServiceClient::connect(format!("http://{address}"))
                    .await?;
            let resp = client
                .echo(EchoRequest {
                    message: "hi".to_string(),
                })
                .await?
                .into_inner();
            assert_eq!(resp.message, "hi");
            Ok::<_, Box<dyn std::error::Error>>(address)
        },
    )
    .await??;
    // The port is released once the scope ends.
    let port = address.rsplit(':').next().unwrap();
    let refused =
        tokio::net::TcpStream::connect(format!("127.0.0.1:{port}")).await;
    assert!(refused.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_address_shape() -> Result<(), Box<dyn std::error::Error>> {
    with_ephemeral_server(
        |mut server| server.add_service(common::echo_service()),
        |address| async move {
            let port = address.strip_prefix("localhost:").unwrap();
            assert_ne!(port.parse::<u16>().unwrap(), 0);
        },
    )
    .await?;
    Ok(())
}
