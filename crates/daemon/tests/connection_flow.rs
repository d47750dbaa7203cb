//! Full connection flows over in-memory pipes and a real TCP listener.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use daemon::{ListenerConfig, Server, Session, SessionConfig, drive_connection};
use logging_sink::RecordingSink;
use protocol::{LogLevel, POLICY_FILE_REQUEST, encode_access_request, encode_log_record};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn single_credential() -> SessionConfig {
    SessionConfig::new().credentials(HashMap::from([("app".to_owned(), "sec".to_owned())]))
}

fn spawn_driver(
    config: SessionConfig,
) -> (
    tokio::io::DuplexStream,
    Arc<RecordingSink>,
    tokio::task::JoinHandle<std::io::Result<()>>,
) {
    let (client, server_end) = tokio::io::duplex(256);
    let sink = Arc::new(RecordingSink::new());
    let session = Session::new(Arc::new(config), sink.clone());
    let driver = tokio::spawn(drive_connection(server_end, session, TEST_TIMEOUT));
    (client, sink, driver)
}

/// A policy-file exchange doubles as a sequencing barrier: once the NUL
/// terminator comes back, every message written before the request has
/// been handled.
async fn policy_barrier(client: &mut tokio::io::DuplexStream) {
    client.write_all(POLICY_FILE_REQUEST).await.expect("write");
    let mut nul = [0u8; 1];
    client.read_exact(&mut nul).await.expect("read");
    assert_eq!(nul, [0x00]);
}

#[tokio::test]
async fn authenticates_and_forwards_over_a_pipe() {
    let (mut client, sink, driver) = spawn_driver(single_credential());

    let mut bytes = Vec::new();
    encode_access_request(&mut bytes, "app", "sec").expect("encode");
    client.write_all(&bytes).await.expect("write");

    let mut response = [0u8; 2];
    client.read_exact(&mut response).await.expect("read");
    assert_eq!(response, [0x02, 0x01]);

    let mut bytes = Vec::new();
    encode_log_record(&mut bytes, "x", LogLevel::Info, "hi").expect("encode");
    client.write_all(&bytes).await.expect("write");
    policy_barrier(&mut client).await;

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "slf4fx.app.x");
    assert_eq!(records[0].level, LogLevel::Info);
    assert_eq!(records[0].message, "hi");

    drop(client);
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn messages_split_across_writes_are_reassembled() {
    let (mut client, sink, driver) = spawn_driver(SessionConfig::new());

    let mut bytes = Vec::new();
    encode_access_request(&mut bytes, "app", "").expect("encode");
    encode_log_record(&mut bytes, "net", LogLevel::Warn, "slow").expect("encode");

    for byte in bytes {
        client.write_all(&[byte]).await.expect("write");
        client.flush().await.expect("flush");
    }

    let mut response = [0u8; 2];
    client.read_exact(&mut response).await.expect("read");
    assert_eq!(response, [0x02, 0x01]);
    policy_barrier(&mut client).await;

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "slf4fx.app.net");
    assert_eq!(records[0].message, "slow");

    drop(client);
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn rejected_session_discards_log_records() {
    let (mut client, sink, driver) = spawn_driver(single_credential());

    let mut bytes = Vec::new();
    encode_access_request(&mut bytes, "app", "wrong").expect("encode");
    client.write_all(&bytes).await.expect("write");

    let mut response = [0u8; 2];
    client.read_exact(&mut response).await.expect("read");
    assert_eq!(response, [0x02, 0x00]);

    let mut bytes = Vec::new();
    encode_log_record(&mut bytes, "x", LogLevel::Error, "boom").expect("encode");
    client.write_all(&bytes).await.expect("write");
    policy_barrier(&mut client).await;

    assert!(sink.records().is_empty());

    drop(client);
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn configured_policy_text_is_served_before_authentication() {
    let (mut client, _, driver) =
        spawn_driver(single_credential().policy_file_response(Some("<ok/>".to_owned())));

    client.write_all(POLICY_FILE_REQUEST).await.expect("write");
    let mut response = [0u8; 6];
    client.read_exact(&mut response).await.expect("read");
    assert_eq!(&response, b"<ok/>\0");

    drop(client);
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn unrecognized_tag_closes_the_connection() {
    let (mut client, _, driver) = spawn_driver(SessionConfig::new());

    client.write_all(&[0xFF]).await.expect("write");

    let mut buf = [0u8; 1];
    let read = client.read(&mut buf).await.expect("read");
    assert_eq!(read, 0, "server must close without writing anything");
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn malformed_policy_request_closes_the_connection() {
    let (mut client, _, driver) = spawn_driver(SessionConfig::new());

    let mut bogus = POLICY_FILE_REQUEST.to_vec();
    bogus[5] ^= 0x20;
    client.write_all(&bogus).await.expect("write");

    let mut buf = [0u8; 1];
    let read = client.read(&mut buf).await.expect("read");
    assert_eq!(read, 0, "server must close without writing anything");
    driver.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn serves_a_tcp_client_end_to_end() {
    let sink = Arc::new(RecordingSink::new());
    let session_config =
        Arc::new(single_credential().policy_file_response(Some("<ok/>".to_owned())));
    let server = Server::bind(
        ListenerConfig::new().bind_address("127.0.0.1:0".parse().expect("address")),
        session_config,
        sink.clone(),
    )
    .await
    .expect("bind");
    let address = server.local_addr().expect("local addr");
    let serving = tokio::spawn(server.serve());

    let mut client = tokio::net::TcpStream::connect(address).await.expect("connect");

    let mut bytes = Vec::new();
    encode_access_request(&mut bytes, "app", "sec").expect("encode");
    client.write_all(&bytes).await.expect("write");
    let mut response = [0u8; 2];
    client.read_exact(&mut response).await.expect("read");
    assert_eq!(response, [0x02, 0x01]);

    let mut bytes = Vec::new();
    encode_log_record(&mut bytes, "x", LogLevel::Info, "hi").expect("encode");
    client.write_all(&bytes).await.expect("write");

    client.write_all(POLICY_FILE_REQUEST).await.expect("write");
    let mut policy = [0u8; 6];
    client.read_exact(&mut policy).await.expect("read");
    assert_eq!(&policy, b"<ok/>\0");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "slf4fx.app.x");
    assert_eq!(records[0].level, LogLevel::Info);
    assert_eq!(records[0].message, "hi");

    drop(client);
    serving.abort();
}
