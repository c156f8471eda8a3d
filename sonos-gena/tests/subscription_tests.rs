//! End-to-end subscription tests against a mock device
//!
//! The controller runs with its real `HttpTransport`, pointed at a mockito
//! server that plays the speaker's AVTransport event endpoint.

use mockito::{Matcher, Server, ServerGuard};
use proptest::prelude::*;
use rstest::rstest;
use sonos_gena::{
    GenaError, Headers, SubscriptionController, SubscriptionResult, Transport, TransportError,
    TransportRequest, TransportResponse, EVENT_PATH,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn controller_for(server: &ServerGuard) -> SubscriptionController {
    let host_with_port = server.host_with_port();
    let (host, port) = host_with_port
        .rsplit_once(':')
        .expect("mock server address has a port");
    SubscriptionController::new(host).with_port(port.parse().expect("numeric port"))
}

#[test]
fn test_subscribe_against_device() {
    let mut server = Server::new();
    let mock = server
        .mock("SUBSCRIBE", EVENT_PATH)
        .match_header("callback", "<http://192.168.1.50:8080/notify>")
        .match_header("nt", "upnp:event")
        .match_header("sid", Matcher::Missing)
        .with_status(200)
        .with_header("SID", "uuid:RINCON_000E58A0123456_sub0000000042")
        .with_header("TIMEOUT", "Second-1800")
        .create();

    let result = controller_for(&server)
        .subscribe("http://192.168.1.50:8080/notify")
        .expect("subscribe should succeed");

    mock.assert();
    assert_eq!(
        result,
        SubscriptionResult {
            sid: Some("uuid:RINCON_000E58A0123456_sub0000000042".to_string()),
            timeout: Some(1800),
        }
    );
}

#[test]
fn test_renew_against_device() {
    let mut server = Server::new();
    let mock = server
        .mock("SUBSCRIBE", EVENT_PATH)
        .match_header("sid", "uuid:123")
        .match_header("timeout", "Second-43200000")
        .match_header("callback", Matcher::Missing)
        .match_header("nt", Matcher::Missing)
        .with_status(200)
        .with_header("SID", "uuid:123")
        .with_header("TIMEOUT", "Second-86400")
        .create();

    let result = controller_for(&server).renew("uuid:123", None).unwrap();

    mock.assert();
    assert_eq!(result.sid.as_deref(), Some("uuid:123"));
    assert_eq!(result.timeout, Some(86400));
}

#[test]
fn test_unparseable_timeout_is_omitted() {
    let mut server = Server::new();
    let _mock = server
        .mock("SUBSCRIBE", EVENT_PATH)
        .with_status(200)
        .with_header("SID", "uuid:abc")
        .with_header("TIMEOUT", "Second-notanumber")
        .create();

    let result = controller_for(&server).subscribe("http://cb/notify").unwrap();

    assert_eq!(result.sid.as_deref(), Some("uuid:abc"));
    assert_eq!(result.timeout, None);
}

#[rstest]
#[case(400, Some("Incompatible header fields"))]
#[case(404, None)]
#[case(412, Some("Precondition failed"))]
#[case(500, Some("Unable to accept renewal"))]
#[case(503, Some("Unable to accept renewal"))]
fn test_device_rejection(#[case] status: usize, #[case] message: Option<&str>) {
    let mut server = Server::new();
    let _mock = server
        .mock("SUBSCRIBE", EVENT_PATH)
        .with_status(status)
        .with_header("X-Reason", "rejected")
        .create();

    match controller_for(&server).renew("uuid:stale", Some(1800)) {
        Err(GenaError::Protocol(error)) => {
            assert_eq!(error.status_code as usize, status);
            assert_eq!(error.message, message);
            assert_eq!(error.headers.get("x-reason"), Some("rejected"));
        }
        other => panic!("Expected GenaError::Protocol, got {:?}", other),
    }
}

#[test]
fn test_unreachable_device_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let controller = SubscriptionController::new("127.0.0.1").with_port(port);
    match controller.subscribe("http://cb/notify") {
        Err(GenaError::Transport(TransportError::Network(_))) => {}
        other => panic!("Expected GenaError::Transport, got {:?}", other),
    }
}

#[test]
fn test_concurrent_calls_share_one_controller() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let transport = move |request: &TransportRequest| -> Result<TransportResponse, TransportError> {
        counter.fetch_add(1, Ordering::SeqCst);
        let sid = request
            .headers
            .get("SID")
            .unwrap_or("uuid:new")
            .to_string();
        let headers: Headers = [("sid", sid), ("timeout", "Second-1800".to_string())]
            .into_iter()
            .collect();
        Ok(TransportResponse::new(200, headers))
    };
    let controller = SubscriptionController::new("192.168.1.100").with_transport(Arc::new(transport));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let controller = controller.clone();
            thread::spawn(move || controller.renew(&format!("uuid:{}", i), None))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap().unwrap();
        assert_eq!(result.sid, Some(format!("uuid:{}", i)));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

/// Transport that fails the test if it is ever called
fn no_network() -> Arc<dyn Transport> {
    Arc::new(|request: &TransportRequest| -> Result<TransportResponse, TransportError> {
        panic!("unexpected request: {:?}", request)
    })
}

proptest! {
    #[test]
    fn prop_subscribe_wraps_callback_url(url in "[a-z0-9:/._-]{1,64}") {
        let captured = Arc::new(std::sync::Mutex::new(None));
        let sink = captured.clone();
        let transport = move |request: &TransportRequest| -> Result<TransportResponse, TransportError> {
            *sink.lock().unwrap() = Some(request.headers.clone());
            Ok(TransportResponse::new(200, Headers::new()))
        };

        SubscriptionController::new("192.168.1.100")
            .with_transport(Arc::new(transport))
            .subscribe(&url)
            .unwrap();

        let headers = captured.lock().unwrap().clone().unwrap();
        let expected_callback = format!("<{}>", url);
        prop_assert_eq!(headers.get("CALLBACK"), Some(expected_callback.as_str()));
        prop_assert_eq!(headers.get("NT"), Some("upnp:event"));
    }

    #[test]
    fn prop_non_numeric_timeout_is_rejected(timeout in "[a-zA-Z][a-zA-Z0-9 ]{0,16}") {
        let controller = SubscriptionController::new("192.168.1.100").with_transport(no_network());
        let result = controller.renew_with_timeout_arg("uuid:123", &timeout);
        prop_assert!(matches!(result, Err(GenaError::InvalidArgument(_))));
    }

    #[test]
    fn prop_success_status_never_errors(sid in "uuid:[A-Za-z0-9_]{1,32}", timeout in ".{0,24}") {
        let headers: Headers = [("sid", sid.clone()), ("timeout", timeout)].into_iter().collect();
        let transport = move |_: &TransportRequest| -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(200, headers.clone()))
        };

        let result = SubscriptionController::new("192.168.1.100")
            .with_transport(Arc::new(transport))
            .renew(&sid, None);
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.unwrap().sid, Some(sid));
    }
}

#[rstest]
#[case(301)]
#[case(302)]
#[case(303)]
fn test_redirect_is_a_protocol_error(#[case] status: usize) {
    let mut server = Server::new();
    let _subscribe = server
        .mock("SUBSCRIBE", EVENT_PATH)
        .with_status(status)
        .with_header("Location", "/elsewhere")
        .create();
    let elsewhere = server
        .mock("GET", "/elsewhere")
        .with_status(200)
        .with_header("SID", "uuid:other")
        .with_header("TIMEOUT", "Second-60")
        .expect(0)
        .create();

    let result = controller_for(&server).subscribe("http://cb/notify");

    elsewhere.assert();
    match result {
        Err(GenaError::Protocol(error)) => {
            assert_eq!(error.status_code as usize, status);
            assert_eq!(error.message, None);
            assert_eq!(error.headers.get("location"), Some("/elsewhere"));
        }
        other => panic!("Expected GenaError::Protocol, got {:?}", other),
    }
}
