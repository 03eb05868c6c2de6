//! End-to-end tests for the typed client against a mocked device
//!
//! A mockito server stands in for the router's web interface; each test
//! mounts the login endpoint plus whatever `_request.xml` responses the
//! operation under test needs. Run with `RUST_LOG=debug` to watch the
//! retry layer work.

use std::time::Duration;

use mockito::Matcher;
use rstest::rstest;
use wf830_api::{ApiError, Band, ClientRegistry, RouterClient, RetryPolicy, TransferStatus};

const SIGNAL_QUERY: &str = "N_8_49;N_8_45;N_8_25;N_8_26;N_8_22;N_8_35;N_8_46;N_3_45";

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_reauth_attempts: 2,
        max_transient_attempts: 2,
        transient_delay: Duration::from_millis(1),
    }
}

fn login_ok(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("POST", "/action/login")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "smartadmin".into()),
            Matcher::UrlEncoded("password".into(), "hunter2".into()),
        ]))
        .with_header("set-cookie", "-goahead-session-=abc123; path=/")
        .with_body("<html>welcome</html>")
        .create()
}

fn connect(server: &mockito::Server) -> RouterClient {
    RouterClient::connect_with_policy(server.host_with_port(), "hunter2", fast_policy())
        .expect("login against mock device")
}

#[test]
fn test_connect_rejected_credentials() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/action/login")
        .with_body(r#"<html><script>var errString = "password incorrect";</script></html>"#)
        .create();

    let result = RouterClient::connect(server.host_with_port(), "wrong");
    assert!(matches!(result, Err(ApiError::Auth)));
}

#[test]
fn test_get_signal_params() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_GET".into()),
            Matcher::UrlEncoded("node".into(), SIGNAL_QUERY.into()),
        ]))
        .with_body(
            "<data>\
                <N_8_49>2;</N_8_49>\
                <N_8_45>LTE;</N_8_45>\
                <N_8_25>-90;</N_8_25>\
                <N_8_26>-91;</N_8_26>\
                <N_8_22>-10;</N_8_22>\
                <N_8_35>15;</N_8_35>\
                <N_8_46>Connected;</N_8_46>\
                <N_3_45>10.0.0.5;</N_3_45>\
            </data>",
        )
        .create();

    let mut client = connect(&server);
    let signal = client.get_signal_params().unwrap();

    assert_eq!(signal.strength, 2);
    assert_eq!(signal.network_type, "LTE");
    assert_eq!(signal.rsrp0, -90);
    assert_eq!(signal.rsrp1, -91);
    assert_eq!(signal.rsrq, -10);
    assert_eq!(signal.sinr, 15);
    assert_eq!(signal.network_status, "Connected");
    assert_eq!(signal.wan_ip_addr, "10.0.0.5");
    mock.assert();
}

#[rstest]
#[case("1;3;", vec![Band::Band1, Band::Band3])]
#[case("20;", vec![Band::Band20])]
#[case("7;", vec![Band::Band7])]
fn test_get_active_bands(#[case] raw: &str, #[case] expected: Vec<Band>) {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let _mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_GET".into()),
            Matcher::UrlEncoded("node".into(), "N_8_38".into()),
        ]))
        .with_body(format!("<data><N_8_38>{raw}</N_8_38></data>"))
        .create();

    let mut client = connect(&server);
    assert_eq!(client.get_active_bands().unwrap(), expected);
}

#[test]
fn test_get_active_bands_unknown_index() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let _mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::Any)
        .with_body("<data><N_8_38>1;12;</N_8_38></data>")
        .create();

    let mut client = connect(&server);
    assert!(matches!(
        client.get_active_bands(),
        Err(ApiError::InvalidBand(12))
    ));
}

#[test]
fn test_get_transfer_status_makes_both_calls() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let totals_mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_LIST_FULL".into()),
            Matcher::UrlEncoded("list".into(), "0".into()),
        ]))
        .with_body("<data><list><L_1>1048576</L_1><L_5>524288</L_5></list></data>")
        .create();
    let rates_mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_GET".into()),
            Matcher::UrlEncoded("node".into(), "N_5_58;N_5_61".into()),
        ]))
        .with_body("<data><N_5_58>2048;</N_5_58><N_5_61>1024;</N_5_61></data>")
        .create();

    let mut client = connect(&server);
    let status = client.get_transfer_status().unwrap();

    assert_eq!(
        status,
        TransferStatus {
            current_download: 2048,
            current_upload: 1024,
            total_download: 1048576,
            total_upload: 524288,
        }
    );
    totals_mock.assert();
    rates_mock.assert();
}

#[test]
fn test_set_band_sends_device_code() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODEM_SET".into()),
            Matcher::UrlEncoded("node".into(), "N_8_36".into()),
            Matcher::UrlEncoded("value".into(), "0031003B".into()),
        ]))
        .with_body("<data><result>success</result></data>")
        .create();

    let mut client = connect(&server);
    let result = client.set_band(Band::Band1).unwrap();

    assert_eq!(result, "success");
    mock.assert();
}

#[test]
fn test_get_serial_number() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let _mock = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_GET".into()),
            Matcher::UrlEncoded("node".into(), "N_5_54".into()),
        ]))
        .with_body("<data><N_5_54>WF830A1B2C3;</N_5_54></data>")
        .create();

    let mut client = connect(&server);
    assert_eq!(client.get_serial_number().unwrap(), "WF830A1B2C3");
}

#[test]
fn test_reboot_issues_both_triggers() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);
    let first = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_SET".into()),
            Matcher::UrlEncoded("node".into(), "N_5_66".into()),
            Matcher::UrlEncoded("value".into(), "1".into()),
        ]))
        .with_body("<data><result>success</result></data>")
        .create();
    // by the second trigger the device is already going down and answers
    // with a garbled non-XML page; that must not surface as a failure
    let second = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cmd".into(), "OAM_MIDWARE_NODE_SET".into()),
            Matcher::UrlEncoded("node".into(), "N_5_67".into()),
            Matcher::UrlEncoded("value".into(), "1".into()),
        ]))
        .with_body("<ht")
        .create();

    let mut client = connect(&server);
    client.reboot().unwrap();

    first.assert();
    second.assert();
}

#[test]
fn test_count_mismatch_reauthenticates_until_bound() {
    init_tracing();
    let mut server = mockito::Server::new();
    // initial login plus one per allowed reauthentication cycle
    let login = server
        .mock("POST", "/action/login")
        .with_header("set-cookie", "-goahead-session-=abc123; path=/")
        .with_body("<html>welcome</html>")
        .expect(3)
        .create();
    // device keeps answering the 8-node signal read with a single value
    let node = server
        .mock("GET", "/_request.xml")
        .match_query(Matcher::Any)
        .with_body("<data><N_8_49>2;</N_8_49></data>")
        .expect(3)
        .create();

    let mut client = connect(&server);
    let result = client.get_signal_params();

    match result {
        Err(ApiError::Protocol(msg)) => assert!(msg.contains("reauthentication")),
        other => panic!("expected Protocol error, got {other:?}"),
    }
    login.assert();
    node.assert();
}

#[test]
fn test_explicit_reauthentication_replaces_session() {
    init_tracing();
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/action/login")
        .with_header("set-cookie", "-goahead-session-=abc123; path=/")
        .with_body("<html>welcome</html>")
        .expect(2)
        .create();

    let mut client = connect(&server);
    client.authenticate().unwrap();
    login.assert();
}

#[test]
fn test_registry_owns_clients_per_entry() {
    init_tracing();
    let mut server = mockito::Server::new();
    let _login = login_ok(&mut server);

    let mut registry = ClientRegistry::new();
    assert!(registry.is_empty());

    registry.insert("entry-1", connect(&server));
    assert!(registry.contains("entry-1"));
    assert_eq!(registry.len(), 1);

    let client = registry.get_mut("entry-1").expect("registered client");
    assert_eq!(client.host(), server.host_with_port());

    let removed = registry.remove("entry-1");
    assert!(removed.is_some());
    assert!(registry.is_empty());
}
