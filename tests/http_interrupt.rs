//! Ctrl-C handling of `HttpTransport`. Kept in its own test binary because
//! SIGINT is delivered to the whole process.
#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;
use std::time::Duration;

use existline::repl::utils::build_get;
use existline::{HttpTransport, HttpTransportConfig, Transport, TransportError};

fn interrupt_self() {
    let status = Command::new("kill")
        .args(["-INT", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

/// Answer `count` requests with `200 OK`, optionally stalling before each answer
fn serve(count: usize, stall: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = listener.local_addr().unwrap().to_string();
    thread::spawn(move || {
        for _ in 0..count {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            let mut length = 0;
            loop {
                line.clear();
                reader.read_line(&mut line).unwrap();
                let header = line.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((key, value)) = header.split_once(':') {
                    if key.eq_ignore_ascii_case("content-length") {
                        length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; length];
            std::io::Read::read_exact(&mut reader, &mut body).unwrap();

            thread::sleep(stall);
            let mut stream = stream;
            // the client may have gone away after a cancel
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: 4\r\nConnection: close\r\n\r\n<r/>",
            );
        }
    });
    host
}

#[test]
fn ctrl_c_should_cancel_only_the_request_in_flight() {
    let mut transport = HttpTransport::new(HttpTransportConfig {
        cancel_on_interrupt: true,
        ..HttpTransportConfig::default()
    })
    .unwrap();

    // Ctrl-C at an idle prompt, before any request: the process survives
    interrupt_self();
    thread::sleep(Duration::from_millis(100));

    let host = serve(2, Duration::ZERO);
    let request = build_get("hamlet.xml", None, true);
    assert_eq!(transport.send(&host, &request).unwrap().body, "<r/>");

    // Ctrl-C between requests does not cancel the next one
    interrupt_self();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(transport.send(&host, &request).unwrap().body, "<r/>");

    // Ctrl-C during a request cancels it
    let host = serve(1, Duration::from_secs(2));
    let interrupter = thread::spawn(|| {
        thread::sleep(Duration::from_millis(300));
        interrupt_self();
    });
    let err = transport.send(&host, &request).unwrap_err();
    interrupter.join().unwrap();
    assert!(matches!(err, TransportError::Cancelled { .. }), "{err:?}");
}
