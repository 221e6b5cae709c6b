mod common;

use std::time::Duration;

use common::{ScriptedConnector, ScriptedDevice, closed_port, init_logging, listening_port};
use netprompt::error::{Error, SessionError};
use netprompt::{Session, SessionBuilder, SessionState};
use tokio_test::{assert_err, assert_ok};

fn session(port: u16, device: &ScriptedDevice) -> Session<ScriptedConnector> {
    SessionBuilder::new("127.0.0.1")
        .port(port)
        .username("netops")
        .password("secret")
        .timeout(Duration::from_secs(3))
        .probe_timeout(Duration::from_millis(500))
        .build_with_connector(device.connector())
        .unwrap()
}

fn session_error(err: Error) -> SessionError {
    match err {
        Error::Session(e) => e,
        other => panic!("expected a session error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_exec_disconnect() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("KHONEMDCRRR01#");
    let mut session = session(port, &device);
    assert_eq!(session.state(), SessionState::Disconnected);

    assert_ok!(session.connect().await);
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.prompt(), Some("KHONEMDCRRR01"));
    assert_eq!(session.device_type(), Some("cisco"));

    let response = assert_ok!(session.exec("show version").await);
    assert!(response.is_complete());
    assert_eq!(response.body(), "output of show version");

    assert_ok!(session.disconnect().await);
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(session.prompt().is_none());

    let state = device.state();
    assert_eq!(state.writes.last().map(String::as_str), Some("exit\n"));
    assert!(state.closed);
    assert!(state.timeouts.iter().all(|t| *t == Duration::from_secs(3)));
}

#[tokio::test]
async fn test_reconnect_after_disconnect() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("(Stupid-Preferred-Master) #");
    let mut session = session(port, &device);

    assert_ok!(session.connect().await);
    assert_ok!(session.disconnect().await);
    assert_ok!(session.connect().await);

    assert!(session.is_ready());
    assert_eq!(session.device_type(), Some("aruba"));
    assert_eq!(device.state().opens, 2);
}

#[tokio::test]
async fn test_connect_twice_rejected() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("core1#");
    let mut session = session(port, &device);
    assert_ok!(session.connect().await);

    let err = assert_err!(session.connect().await);

    assert!(matches!(session_error(err), SessionError::AlreadyConnected));
    assert_eq!(device.state().opens, 1);
    assert!(session.is_ready());
}

#[tokio::test]
async fn test_unreachable_host_fails_probe() {
    init_logging();
    let port = closed_port().await;
    let device = ScriptedDevice::with_prompt("core1#");
    let mut session = session(port, &device);

    let err = assert_err!(session.connect().await);

    match session_error(err) {
        SessionError::ProbeFailed { host, port: p } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(p, port);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(device.state().opens, 0);
}

#[tokio::test]
async fn test_rejected_credentials() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("core1#").reject_login();
    let mut session = session(port, &device);

    let err = assert_err!(session.connect().await);

    match session_error(err) {
        SessionError::AuthFailed { user } => assert_eq!(user, "netops"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Disconnected);
    let state = device.state();
    assert_eq!(state.logins, 1);
    assert!(state.closed);
    assert!(state.writes.is_empty());
}

#[tokio::test]
async fn test_transport_failure_leaves_session_disconnected() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("core1#").fail_open();
    let mut session = session(port, &device);

    let err = assert_err!(session.connect().await);

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(device.state().logins, 0);
}

#[tokio::test]
async fn test_prompt_not_found_keeps_transport() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("Welcome, please wait...");
    let mut session = session(port, &device);

    let err = assert_err!(session.connect().await);
    assert!(matches!(
        session_error(err),
        SessionError::PromptNotFound { attempts: 5 }
    ));
    assert_eq!(session.state(), SessionState::PromptUnknown);
    assert!(session.is_connected());

    let err = assert_err!(session.exec("show version").await);
    assert!(matches!(session_error(err), SessionError::PromptUnknown));

    assert_ok!(session.disconnect().await);
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(device.state().closed);
}

#[tokio::test]
async fn test_exec_before_connect() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::with_prompt("core1#");
    let mut session = session(port, &device);

    let err = assert_err!(session.exec("show version").await);
    assert!(matches!(session_error(err), SessionError::NotConnected));

    let err = assert_err!(session.disconnect().await);
    assert!(matches!(session_error(err), SessionError::NotConnected));
    assert!(device.state().writes.is_empty());
}

#[tokio::test]
async fn test_exec_budget_through_session() {
    init_logging();
    let (_listener, port) = listening_port().await;
    let device = ScriptedDevice::new("\r\nKHONEMDCRRR01#", |input: &str| match input {
        "\n" => b"\r\nKHONEMDCRRR01#".to_vec(),
        _ => b"show version\r\nCisco IOS Software\r\n".to_vec(),
    });
    let mut session = session(port, &device);
    assert_ok!(session.connect().await);
    let reads_before = device.state().reads;

    let response = assert_ok!(session.exec_with_tries("show version", 2).await);

    assert!(!response.is_complete());
    assert_eq!(device.state().reads - reads_before, 3);
    assert!(response.contains("Cisco IOS Software"));
    assert!(session.is_ready());
}
