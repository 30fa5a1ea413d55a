#![cfg(unix)]

use modemprobe_core::bridge::{BridgeError, ModemBridge};

#[tokio::test]
async fn write_command_appends_a_single_cr() {
    let mut bridge = ModemBridge::spawn("cat").unwrap();
    let _rx = bridge.start_reader().unwrap();

    // Caller-supplied terminators are stripped, then one CR is appended.
    let wire = bridge.write_command("AT\r\n").await.unwrap();
    assert_eq!(wire, b"AT\r");

    let wire = bridge.write_command("ATZ").await.unwrap();
    assert_eq!(wire, b"ATZ\r");

    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_command_line_is_rejected() {
    assert!(matches!(
        ModemBridge::spawn("   ").err(),
        Some(BridgeError::EmptyCommand)
    ));
}

#[tokio::test]
async fn reader_can_only_start_once() {
    let mut bridge = ModemBridge::spawn("cat").unwrap();
    let _rx = bridge.start_reader().unwrap();
    assert!(matches!(
        bridge.start_reader().err(),
        Some(BridgeError::ReaderTaken)
    ));
    bridge.shutdown().await.unwrap();
}

#[tokio::test]
async fn broken_pipe_reports_stream_closed() {
    let mut bridge = ModemBridge::spawn("true").unwrap();
    let mut rx = bridge.start_reader().unwrap();

    // Channel closing means the child exited and its pipes are gone.
    assert!(rx.recv().await.is_none());

    let err = bridge.write_command("AT").await.unwrap_err();
    assert!(matches!(err, BridgeError::StreamClosed));
}

#[tokio::test]
async fn liveness_follows_the_child() {
    let mut bridge = ModemBridge::spawn("cat").unwrap();
    assert!(bridge.child_is_alive());
    bridge.shutdown().await.unwrap();
}
