//! Messages and generated stubs for `pvz.v1.PvzService`.
//!
//! ```proto
//! service PvzService {
//!   rpc GetPVZList(GetPVZListRequest) returns (GetPVZListResponse);
//! }
//! message PVZ {
//!   string id = 1;
//!   google.protobuf.Timestamp registration_date = 2;
//!   string city = 3;
//! }
//! message GetPVZListRequest {}
//! message GetPVZListResponse { repeated PVZ pvzs = 1; }
//! ```

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pvz {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub registration_date: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(string, tag = "3")]
    pub city: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPvzListRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPvzListResponse {
    #[prost(message, repeated, tag = "1")]
    pub pvzs: ::prost::alloc::vec::Vec<Pvz>,
}

include!(concat!(env!("OUT_DIR"), "/pvz.v1.PvzService.rs"));
