//! Read-only gRPC listing of pickup points.

pub mod proto;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use store::Store;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use crate::state::AppState;
use proto::pvz_service_server::{PvzService, PvzServiceServer};
use proto::{GetPvzListRequest, GetPvzListResponse};

/// gRPC handler backed by the same services as the REST API.
pub struct PvzGrpcService<S: Store> {
    state: Arc<AppState<S>>,
}

impl<S: Store> PvzGrpcService<S> {
    pub fn new(state: Arc<AppState<S>>) -> Self {
        Self { state }
    }

    pub fn into_server(self) -> PvzServiceServer<Self> {
        PvzServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl<S: Store> PvzService for PvzGrpcService<S> {
    async fn get_pvz_list(
        &self,
        _request: Request<GetPvzListRequest>,
    ) -> Result<Response<GetPvzListResponse>, Status> {
        let started = Instant::now();

        let result = self
            .state
            .pvz
            .list_all_pvz()
            .await
            .map(|pvzs| {
                Response::new(GetPvzListResponse {
                    pvzs: pvzs.into_iter().map(to_proto).collect(),
                })
            })
            .map_err(|e| {
                tracing::error!(error = %e, "failed to list pickup points");
                Status::internal(e.to_string())
            });

        let code = match &result {
            Ok(_) => tonic::Code::Ok,
            Err(status) => status.code(),
        };
        let elapsed = started.elapsed();
        tracing::info!(
            method = "GetPVZList",
            code = ?code,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "gRPC request"
        );
        metrics::histogram!("grpc_request_duration_seconds", "method" => "GetPVZList")
            .record(elapsed.as_secs_f64());

        result
    }
}

fn to_proto(pvz: common::Pvz) -> proto::Pvz {
    proto::Pvz {
        id: pvz.id.into_inner(),
        registration_date: Some(to_timestamp(pvz.registration_date)),
        city: pvz.city.as_str().to_string(),
    }
}

fn to_timestamp(at: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: at.timestamp(),
        nanos: i32::try_from(at.timestamp_subsec_nanos()).unwrap_or(0),
    }
}

/// Serves the gRPC API on `listener` until `shutdown` resolves, then lets
/// in-flight calls finish.
pub async fn serve<S: Store>(
    state: Arc<AppState<S>>,
    listener: TcpListener,
    shutdown: impl Future<Output = ()>,
) -> Result<(), tonic::transport::Error> {
    tonic::transport::Server::builder()
        .add_service(PvzGrpcService::new(state).into_server())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
