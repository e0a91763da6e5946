//! `HttpTransport` against a loopback server that records what it receives.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use existline::repl::utils::{build_get, build_query, build_store, interpret_response};
use existline::{HttpTransport, HttpTransportConfig, Transport, TransportError};

#[derive(Debug)]
struct ReceivedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ReceivedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accept one connection, record the request and answer with `status` and `body`
fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, JoinHandle<ReceivedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (key, value) = line.split_once(':').unwrap();
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.parse::<usize>().unwrap())
            .unwrap_or(0);
        let mut request_body = vec![0; length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();

        ReceivedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: request_body,
        }
    });

    (host, handle)
}

fn transport(config: HttpTransportConfig) -> HttpTransport {
    HttpTransport::new(config).unwrap()
}

#[test]
fn query_should_post_envelope_to_root() {
    let (host, server) = serve_once(
        "200 OK",
        "text/xml",
        b"<exist:result hitCount=\"1\" queryTime=\"12\"/>".to_vec(),
    );
    let request = build_query("//a < 3", true, 15, 1, true);

    let response = transport(HttpTransportConfig::default())
        .send(&host, &request)
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "<exist:result hitCount=\"1\" queryTime=\"12\"/>");

    let received = server.join().unwrap();
    assert_eq!(received.request_line, "POST / HTTP/1.1");
    assert_eq!(received.header("content-type"), Some("text/xml"));
    let expected = request.xml().unwrap();
    assert_eq!(
        received.header("content-length"),
        Some(expected.len().to_string().as_str())
    );
    assert_eq!(received.body, expected.as_bytes());
}

#[test]
fn store_should_put_raw_body_to_target_path() {
    let (host, server) = serve_once("200 OK", "text/xml", b"stored".to_vec());
    let request = build_store(b"<PLAY>Hamlet</PLAY>".to_vec(), "shakespeare/hamlet.xml");

    let response = transport(HttpTransportConfig::default())
        .send(&host, &request)
        .unwrap();

    assert_eq!(response.body, "stored");
    let received = server.join().unwrap();
    assert_eq!(received.request_line, "PUT /shakespeare/hamlet.xml HTTP/1.1");
    assert_eq!(received.body, b"<PLAY>Hamlet</PLAY>");
    assert_eq!(received.header("content-length"), Some("19"));
}

#[test]
fn error_status_should_surface_server_message() {
    let (host, server) = serve_once(
        "404 Not Found",
        "text/xml",
        b"<exist:result errcode=\"3\"><exist:message>document x.xml not found!</exist:message></exist:result>".to_vec(),
    );

    let response = transport(HttpTransportConfig::default())
        .send(&host, &build_get("x.xml", None, true))
        .unwrap();
    server.join().unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.reason.as_deref(), Some("Not Found"));
    let err = interpret_response(response).unwrap_err();
    assert_eq!(err.message, "document x.xml not found!");
}

#[test]
fn body_should_be_decoded_with_declared_charset() {
    let (host, server) = serve_once(
        "200 OK",
        "text/xml; charset=ISO-8859-1",
        vec![0x3c, 0x61, 0x3e, 0xe9, 0x3c, 0x2f, 0x61, 0x3e],
    );

    let response = transport(HttpTransportConfig::default())
        .send(&host, &build_get("x.xml", None, true))
        .unwrap();
    server.join().unwrap();

    assert_eq!(response.body, "<a>é</a>");
}

#[test]
fn credentials_should_be_sent_as_basic_auth() {
    let (host, server) = serve_once("200 OK", "text/xml", b"ok".to_vec());

    transport(HttpTransportConfig {
        user: Some("admin".to_string()),
        password: Some("secret".to_string()),
        ..HttpTransportConfig::default()
    })
    .send(&host, &build_get("x.xml", None, true))
    .unwrap();

    let received = server.join().unwrap();
    assert_eq!(received.header("authorization"), Some("Basic YWRtaW46c2VjcmV0"));
}

#[test]
fn refused_connection_should_be_a_transport_error() {
    let host = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let err = transport(HttpTransportConfig::default())
        .send(&host, &build_get("x.xml", None, true))
        .unwrap_err();

    assert!(matches!(err, TransportError::Connect { .. }), "{err:?}");
}

#[test]
fn stalled_server_should_time_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = listener.local_addr().unwrap().to_string();
    let _server = thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
    });

    let err = transport(HttpTransportConfig {
        timeout: Some(Duration::from_millis(300)),
        ..HttpTransportConfig::default()
    })
    .send(&host, &build_get("x.xml", None, true))
    .unwrap_err();

    assert!(matches!(err, TransportError::Timeout { .. }), "{err:?}");
}
