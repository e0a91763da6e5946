//! End-to-end scenarios driving the interpreter and the benchmark runner
//! through the public API with a scripted transport.

use existline::repl::utils::{build_get, build_remove};
use existline::{
    BenchmarkRunner, DisplayMode, MockTransport, QueryTiming, ReplController, ReplState,
    RequestEnvelope, SessionState, TransportError, TransportResponse,
};

fn run_script(
    transport: MockTransport,
    script: &str,
) -> (ReplController<MockTransport>, String) {
    let mut repl = ReplController::new(SessionState::new("repo:8088"), transport);
    let mut out = Vec::new();
    repl.run(script.as_bytes(), &mut out, false).unwrap();
    (repl, String::from_utf8(out).unwrap())
}

#[test]
fn failed_remove_should_leave_session_running() {
    let mut mock = MockTransport::always(TransportResponse::ok("<PLAY/>"));
    mock.push_response(TransportResponse::with_status(404, ""));

    let mut repl = ReplController::new(SessionState::default(), mock);
    let mut out = Vec::new();

    let state = repl.dispatch_line("remove missing.xml", &mut out).unwrap();
    assert_eq!(state, ReplState::Running);

    let state = repl.dispatch_line("get hamlet.xml", &mut out).unwrap();
    assert_eq!(state, ReplState::Running);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("error: request failed with status 404: Not Found"));
    assert!(printed.ends_with("<PLAY/>\n"));

    let sent = repl.transport().requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].request, build_remove("missing.xml"));
    assert_eq!(sent[1].request, build_get("hamlet.xml", None, true));
}

#[test]
fn transport_failure_should_be_reported_and_survived() {
    let mut mock = MockTransport::new();
    mock.push_error(TransportError::Connect {
        url: "http://repo:8088/".to_string(),
        message: "connection refused".to_string(),
    });

    let (repl, printed) = run_script(mock, "find //a\ndisplay s\n");

    assert!(printed.contains("error: cannot connect to http://repo:8088/"));
    assert_eq!(repl.session().display_mode(), DisplayMode::Summary);
    assert_eq!(repl.state(), ReplState::Terminated);
}

#[test]
fn session_settings_should_shape_later_queries() {
    let (repl, _) = run_script(
        MockTransport::always(TransportResponse::ok("<exist:result hitCount=\"0\"/>")),
        "url other:8080\ndisplay summary 10\nf //SPEECH[SPEAKER & LINE]\nd all 3\nfind //LINE\nquit\n",
    );

    let sent = repl.transport().requests();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|s| s.host == "other:8080"));
    assert_eq!(
        sent[0].request,
        RequestEnvelope::Query {
            text: "//SPEECH[SPEAKER & LINE]".to_string(),
            mode: DisplayMode::Summary,
            result_window: 10,
            start: 1,
            indent: true,
        }
    );
    let xml = sent[1].request.xml().unwrap();
    assert!(xml.contains("<exist:display indent=\"true\" howmany=\"3\" start=\"1\"/>"));
    assert!(sent[0]
        .request
        .xml()
        .unwrap()
        .contains("<exist:query>//SPEECH[SPEAKER &amp; LINE]</exist:query>"));
}

#[test]
fn unknown_commands_should_be_diagnosed_and_skipped() {
    let (repl, printed) = run_script(MockTransport::new(), "xyz foo\nhelp\n");

    assert!(printed.contains("unknown command: xyz"));
    assert!(printed.contains("quit | q"));
    assert_eq!(repl.session(), &SessionState::new("repo:8088"));
}

#[test]
fn output_redirection_should_capture_next_get() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("hamlet.xml");
    let script = format!("output {}\nget hamlet.xml\nget hamlet.xml\n", target.display());

    let (_, printed) = run_script(
        MockTransport::always(TransportResponse::ok("<PLAY>Hamlet</PLAY>")),
        &script,
    );

    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "<PLAY>Hamlet</PLAY>"
    );
    assert!(printed.contains("wrote 19 bytes"));
    assert_eq!(printed.matches("<PLAY>Hamlet</PLAY>").count(), 1);
}

#[test]
fn parse_should_store_file_under_its_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("macbeth.xml");
    std::fs::write(&file, "<PLAY>Macbeth</PLAY>").unwrap();

    let (repl, _) = run_script(
        MockTransport::new(),
        &format!("parse {}\np {} db/plays\n", file.display(), file.display()),
    );

    let sent = repl.transport().requests();
    assert_eq!(sent[0].request.path(), "/macbeth.xml");
    assert_eq!(sent[1].request.path(), "/db/plays/macbeth.xml");
    assert_eq!(sent[1].request.method(), reqwest::Method::PUT);
    assert_eq!(&sent[1].request.body()[..], b"<PLAY>Macbeth</PLAY>");
}

#[test]
fn benchmark_should_report_server_query_time_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let queries = dir.path().join("queries.txt");
    let report = dir.path().join("report.txt");
    std::fs::write(&queries, "//SPEECH\n//LINE[. &= 'love']\n").unwrap();

    let mut mock = MockTransport::always(TransportResponse::ok("<result queryTime=\"37\"/>"));
    let mut out = Vec::new();

    let records = BenchmarkRunner::new()
        .with_report_path(Some(report.clone()))
        .run(&mut mock, "repo:8088", queries.to_str().unwrap(), &mut out)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.query_time == QueryTiming::Measured(37) && r.retrieval_time == 0));
    assert_eq!(records[0].query, "//SPEECH");
    assert_eq!(records[1].query, "//LINE[. &= 'love']");

    let printed = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = printed.lines().skip(1).take(2).collect();
    assert!(rows[0].starts_with("//SPEECH "));
    assert!(rows[0].contains(" 37 "));
    assert!(rows[1].starts_with("//LINE[. &= 'love']"));
    assert_eq!(std::fs::read_to_string(report).unwrap(), printed);
}

#[test]
fn benchmark_should_keep_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let queries = dir.path().join("queries.txt");
    std::fs::write(&queries, "q1\nq2\nq3").unwrap();

    let mut mock = MockTransport::new();
    mock.push_response(TransportResponse::ok("<r queryTime=\"900\"/>"))
        .push_response(TransportResponse::ok("<r queryTime=\"5\"/>"))
        .push_response(TransportResponse::ok("<r/>"));
    let mut out = Vec::new();

    let records = BenchmarkRunner::new()
        .with_report_path(None)
        .run(&mut mock, "repo:8088", queries.to_str().unwrap(), &mut out)
        .unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(texts, ["q1", "q2", "q3"]);
    assert_eq!(records[2].query_time, QueryTiming::Unmeasured);

    let sent: Vec<String> = mock
        .requests()
        .into_iter()
        .map(|s| match s.request {
            RequestEnvelope::Query { text, .. } => text,
            other => panic!("unexpected request {other:?}"),
        })
        .collect();
    assert_eq!(sent, ["q1", "q2", "q3"]);
}
