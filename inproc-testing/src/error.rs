#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("bind error: {0}")]
    Bind(#[from] std::io::Error),
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
