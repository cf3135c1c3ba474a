//! Generates the gRPC server and client for the pickup-point listing.
//!
//! Messages are hand-written prost structs in `src/grpc/proto.rs`, so only the
//! service stubs are generated here and no `protoc` is needed.

fn main() {
    let get_pvz_list = tonic_build::manual::Method::builder()
        .name("get_pvz_list")
        .route_name("GetPVZList")
        .input_type("crate::grpc::proto::GetPvzListRequest")
        .output_type("crate::grpc::proto::GetPvzListResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("PvzService")
        .package("pvz.v1")
        .method(get_pvz_list)
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
