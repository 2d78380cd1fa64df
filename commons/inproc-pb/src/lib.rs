tonic::include_proto!("inproc");
#[allow(dead_code)]
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("inproc_descriptor");
