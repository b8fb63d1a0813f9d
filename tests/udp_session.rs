//! Full sessions against a simulated logger on the loopback interface

use std::net::SocketAddr;
use std::time::Duration;

use logger_assist::{
    AssistError, Command, ExchangeTiming, Session, SessionConfig, SessionReport, SessionState,
};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Answer for a request, `None` for commands the stick does not answer
fn answer(request: &str) -> Option<&'static str> {
    match request {
        "WIFIKIT-214028-READ" => Some("10.10.100.254,ACCF23A1B2C3,HF-LPB100"),
        "AT+WAP\n" => Some("+ok=APSTA,10000123456,CH1\r\n"),
        "AT+WAKEY\n" => Some("+ok=WPA2PSK,AES,12345678\r\n"),
        "AT+WSSSID\n" => Some("+ok=HomeNet\r\n"),
        "AT+WSKEY\n" => Some("+ok=WPA2PSK,AES,secret\r\n"),
        "AT+WANN\n" => Some("+ok=DHCP,192.168.1.50,255.255.255.0,192.168.1.1\r\n"),
        "AT+WEBU\n" => Some("+ok=admin,admin\r\n"),
        "AT+VER\n" => Some("+ok=4.01.51\r\n"),
        r if r.starts_with("AT+INVDATA=8,") => Some("+ok=\u{10}0103020064b9af\u{10}\r\n"),
        _ => None,
    }
}

/// Spawn a logger that records every datagram until it sees `AT+Q`.
async fn spawn_logger() -> (SocketAddr, JoinHandle<Vec<String>>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        let mut buf = [0u8; 1500];
        loop {
            let (n, peer) = socket.recv_from(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            if let Some(reply) = answer(&request) {
                socket.send_to(reply.as_bytes(), peer).await.unwrap();
            }
            let done = request == "AT+Q\n";
            received.push(request);
            if done {
                return received;
            }
        }
    });

    (addr, handle)
}

fn fast_timing() -> ExchangeTiming {
    ExchangeTiming::new()
        .with_pacing(Duration::from_millis(5))
        .with_response_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_credentials_over_udp() {
    let (addr, logger) = spawn_logger().await;
    let config = SessionConfig::new(addr.to_string()).with_timing(fast_timing());

    let mut session = Session::connect(config).await.unwrap();
    let report = session.run().await.unwrap();
    assert_eq!(session.state(), SessionState::Done);

    let received = logger.await.unwrap();
    assert_eq!(received.len(), 9);
    assert_eq!(received[1], "+ok");

    let SessionReport::Credentials(creds) = report else {
        panic!("Expected credentials");
    };
    // trailing CRLF is trimmed by the exchange
    assert_eq!(creds.station_ssid, "HomeNet");
    assert_eq!(creds.web_login, "admin,admin");

    let text = SessionReport::Credentials(creds).to_string();
    assert!(text.starts_with("AP settings\n"));
    assert!(text.contains("Station settings\n"));
    assert!(text.contains("Web settings\n"));
}

#[tokio::test]
async fn test_modbus_read_over_udp() {
    let (addr, logger) = spawn_logger().await;
    let command = Command::from_options(None, Some("00120001"), None).unwrap();
    let config = SessionConfig::new(addr.to_string())
        .with_command(command)
        .with_verbose(true)
        .with_timing(fast_timing());

    let mut session = Session::connect(config).await.unwrap();
    let report = session.run().await.unwrap();

    let received = logger.await.unwrap();
    assert_eq!(received[2], "AT+INVDATA=8,010300120001240f\n");
    assert_eq!(
        report,
        SessionReport::ModbusResponse {
            request: "AT+INVDATA=8,010300120001240f".into(),
            response: "+ok=0103020064b9af".into(),
        }
    );

    let stats = session.get_stats();
    assert_eq!(stats.requests_sent, 4);
    assert_eq!(stats.responses_received, 2);
}

#[tokio::test]
async fn test_no_logger_at_address() {
    // bound but silent
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = SessionConfig::new(silent.local_addr().unwrap().to_string()).with_timing(
        ExchangeTiming::new()
            .with_pacing(Duration::ZERO)
            .with_response_timeout(Duration::from_millis(100)),
    );

    let mut session = Session::connect(config).await.unwrap();
    let err = session.run().await.unwrap_err();

    assert_eq!(err, AssistError::EmptyResponse);
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_unresolvable_target() {
    let config = SessionConfig::new("10.10.100.254:notaport");
    let err = Session::connect(config).await.err().unwrap();
    assert!(matches!(err, AssistError::AddressResolution { .. }));
}
