#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetReq {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
}
/// A never-written key is indistinguishable from an empty value, same as the
/// HTTP surface.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetResult {
    #[prost(bytes = "vec", tag = "1")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPutReq {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPutResult {
    #[prost(oneof = "proto_put_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_put_result::Result>,
}
/// Nested message and enum types in `ProtoPutResult`.
pub mod proto_put_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoPutSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoPutError),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPutSuccess {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPutError {
    #[prost(oneof = "proto_put_error::Err", tags = "1, 2")]
    pub err: ::core::option::Option<proto_put_error::Err>,
}
/// Nested message and enum types in `ProtoPutError`.
pub mod proto_put_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        ReadOnly(super::ProtoReadOnlyNode),
        #[prost(message, tag = "2")]
        Fault(super::ProtoServerFault),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoReadOnlyNode {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoServerFault {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNextLogEntryReq {
    /// Index of the last entry the caller has applied, -1 if none.
    #[prost(int64, tag = "1")]
    pub after_index: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNextLogEntryResult {
    #[prost(oneof = "proto_next_log_entry_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_next_log_entry_result::Result>,
}
/// Nested message and enum types in `ProtoNextLogEntryResult`.
pub mod proto_next_log_entry_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Entry(super::ProtoLogEntry),
        #[prost(message, tag = "2")]
        CaughtUp(super::ProtoNoNewEntries),
    }
}
/// Empty. Normal "caught up" condition, not a fault.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNoNewEntries {}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLastLogEntryReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLastLogEntryResult {
    #[prost(oneof = "proto_last_log_entry_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_last_log_entry_result::Result>,
}
/// Nested message and enum types in `ProtoLastLogEntryResult`.
pub mod proto_last_log_entry_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Entry(super::ProtoLogEntry),
        #[prost(message, tag = "2")]
        Empty(super::ProtoEmptyLog),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoEmptyLog {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLogEntry {
    #[prost(int64, tag = "1")]
    pub index: i64,
    #[prost(string, tag = "2")]
    pub key: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "3")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[doc = r" Generated client implementations."]
pub mod grpc_shard_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Inter-node RPC surface exposed by every node's ShardService. Consumed by"]
    #[doc = " other nodes' dispatchers (Get/Put forwarding) and by replicas' replication"]
    #[doc = " loops (log export)."]
    pub struct GrpcShardClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcShardClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcShardClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn get(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoGetReq>,
        ) -> Result<tonic::Response<super::ProtoGetResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/shardkv.GrpcShard/Get");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn put(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoPutReq>,
        ) -> Result<tonic::Response<super::ProtoPutResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/shardkv.GrpcShard/Put");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_next_log_entry(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoNextLogEntryReq>,
        ) -> Result<tonic::Response<super::ProtoNextLogEntryResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/shardkv.GrpcShard/GetNextLogEntry");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_last_log_entry(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoLastLogEntryReq>,
        ) -> Result<tonic::Response<super::ProtoLastLogEntryResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/shardkv.GrpcShard/GetLastLogEntry");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcShardClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcShardClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcShardClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_shard_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcShardServer."]
    #[async_trait]
    pub trait GrpcShard: Send + Sync + 'static {
        async fn get(
            &self,
            request: tonic::Request<super::ProtoGetReq>,
        ) -> Result<tonic::Response<super::ProtoGetResult>, tonic::Status>;
        async fn put(
            &self,
            request: tonic::Request<super::ProtoPutReq>,
        ) -> Result<tonic::Response<super::ProtoPutResult>, tonic::Status>;
        async fn get_next_log_entry(
            &self,
            request: tonic::Request<super::ProtoNextLogEntryReq>,
        ) -> Result<tonic::Response<super::ProtoNextLogEntryResult>, tonic::Status>;
        async fn get_last_log_entry(
            &self,
            request: tonic::Request<super::ProtoLastLogEntryReq>,
        ) -> Result<tonic::Response<super::ProtoLastLogEntryResult>, tonic::Status>;
    }
    #[doc = " Inter-node RPC surface exposed by every node's ShardService. Consumed by"]
    #[doc = " other nodes' dispatchers (Get/Put forwarding) and by replicas' replication"]
    #[doc = " loops (log export)."]
    #[derive(Debug)]
    pub struct GrpcShardServer<T: GrpcShard> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcShard> GrpcShardServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcShardServer<T>
    where
        T: GrpcShard,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/shardkv.GrpcShard/Get" => {
                    #[allow(non_camel_case_types)]
                    struct GetSvc<T: GrpcShard>(pub Arc<T>);
                    impl<T: GrpcShard> tonic::server::UnaryService<super::ProtoGetReq> for GetSvc<T> {
                        type Response = super::ProtoGetResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/shardkv.GrpcShard/Put" => {
                    #[allow(non_camel_case_types)]
                    struct PutSvc<T: GrpcShard>(pub Arc<T>);
                    impl<T: GrpcShard> tonic::server::UnaryService<super::ProtoPutReq> for PutSvc<T> {
                        type Response = super::ProtoPutResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoPutReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).put(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = PutSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/shardkv.GrpcShard/GetNextLogEntry" => {
                    #[allow(non_camel_case_types)]
                    struct GetNextLogEntrySvc<T: GrpcShard>(pub Arc<T>);
                    impl<T: GrpcShard> tonic::server::UnaryService<super::ProtoNextLogEntryReq>
                        for GetNextLogEntrySvc<T>
                    {
                        type Response = super::ProtoNextLogEntryResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoNextLogEntryReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_next_log_entry(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetNextLogEntrySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/shardkv.GrpcShard/GetLastLogEntry" => {
                    #[allow(non_camel_case_types)]
                    struct GetLastLogEntrySvc<T: GrpcShard>(pub Arc<T>);
                    impl<T: GrpcShard> tonic::server::UnaryService<super::ProtoLastLogEntryReq>
                        for GetLastLogEntrySvc<T>
                    {
                        type Response = super::ProtoLastLogEntryResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoLastLogEntryReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_last_log_entry(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetLastLogEntrySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcShard> Clone for GrpcShardServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcShard> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcShard> tonic::transport::NamedService for GrpcShardServer<T> {
        const NAME: &'static str = "shardkv.GrpcShard";
    }
}
