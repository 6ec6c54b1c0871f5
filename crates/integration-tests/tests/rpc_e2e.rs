// End-to-End RPC Tests
// Real JSON-RPC server on an ephemeral port, driven by the jsonrpsee HTTP client

use std::sync::Arc;

use clinicq_api_rpc::error::code;
use clinicq_api_rpc::{RpcServer, RpcServerConfig};
use clinicq_core::application::{QueueRegistry, QueueService, RegistryConfig};
use clinicq_core::port::time_provider::SystemTimeProvider;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::server::ServerHandle;
use serde_json::Value;

async fn start_server() -> (HttpClient, ServerHandle) {
    let time_provider = Arc::new(SystemTimeProvider);
    let registry =
        Arc::new(QueueRegistry::new(RegistryConfig::default(), time_provider.clone()).unwrap());
    let service = Arc::new(QueueService::new(registry, time_provider));

    let config = RpcServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let (addr, handle) = RpcServer::new(config, service).start().await.unwrap();

    let client = HttpClientBuilder::default()
        .build(format!("http://{}", addr))
        .unwrap();
    (client, handle)
}

fn params(pairs: &[(&str, Value)]) -> ObjectParams {
    let mut p = ObjectParams::new();
    for (k, v) in pairs {
        p.insert(k, v.clone()).unwrap();
    }
    p
}

fn error_code(err: ClientError) -> i32 {
    match err {
        ClientError::Call(obj) => obj.code(),
        other => panic!("expected call error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rpc_check_in_call_next_status() {
    let (client, handle) = start_server().await;

    for (id, priority) in [("A", "medium"), ("B", "emergency"), ("C", "medium")] {
        let res: Value = client
            .request(
                "queue.check_in.v1",
                params(&[
                    ("department", "cardiology".into()),
                    ("entity_id", id.into()),
                    ("priority", priority.into()),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(res["already_checked_in"], false);
    }

    let next: Value = client
        .request(
            "queue.call_next.v1",
            params(&[("department", "cardiology".into())]),
        )
        .await
        .unwrap();
    assert_eq!(next["entity_id"], "B");
    assert_eq!(next["ticket_number"], 2);
    assert_eq!(next["priority"], "emergency");

    let status: Value = client
        .request(
            "queue.status.v1",
            params(&[
                ("department", "cardiology".into()),
                ("entity_id", "C".into()),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(status["status"], "waiting");
    assert_eq!(status["position"], 1);
    assert_eq!(status["estimated_wait_time"], 15);

    let list: Value = client
        .request("queue.list.v1", params(&[]))
        .await
        .unwrap();
    assert_eq!(list[0]["department"], "cardiology");
    assert_eq!(list[0]["stats"]["in_progress"], 1);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_rpc_error_codes() {
    let (client, handle) = start_server().await;

    let err = client
        .request::<Value, _>(
            "queue.check_in.v1",
            params(&[
                ("department", "er".into()),
                ("entity_id", "p1".into()),
                ("priority", "urgent".into()),
            ]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::VALIDATION_ERROR);

    let err = client
        .request::<Value, _>("queue.call_next.v1", params(&[("department", "er".into())]))
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::NOT_FOUND);

    let err = client
        .request::<Value, _>(
            "queue.configure.v1",
            params(&[
                ("department", "er".into()),
                ("average_wait_time", (-5).into()),
            ]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::VALIDATION_ERROR);

    // Fractional minutes decode fine and fail validation
    let err = client
        .request::<Value, _>(
            "queue.configure.v1",
            params(&[
                ("department", "er".into()),
                ("average_wait_time", 15.5.into()),
            ]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::VALIDATION_ERROR);

    let _: Value = client
        .request(
            "queue.configure.v1",
            params(&[
                ("department", "er".into()),
                ("average_wait_time", 20.into()),
            ]),
        )
        .await
        .unwrap();

    let err = client
        .request::<Value, _>("queue.call_next.v1", params(&[("department", "er".into())]))
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::EMPTY_QUEUE);

    let _: Value = client
        .request(
            "queue.check_in.v1",
            params(&[("department", "er".into()), ("entity_id", "p1".into())]),
        )
        .await
        .unwrap();
    let _: Value = client
        .request(
            "queue.update_status.v1",
            params(&[
                ("department", "er".into()),
                ("entity_id", "p1".into()),
                ("status", "completed".into()),
            ]),
        )
        .await
        .unwrap();

    let err = client
        .request::<Value, _>(
            "queue.update_status.v1",
            params(&[
                ("department", "er".into()),
                ("entity_id", "p1".into()),
                ("status", "waiting".into()),
            ]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::CONFLICT);

    handle.stop().unwrap();
}
