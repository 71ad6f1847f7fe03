use reqparse::{
    ErrorKind, HttpMethod, InputMode, ParseError, ParseReport, ParserConfig, RequestTextParser,
    format_debug, format_http, format_json, parse_curl, parse_input, parse_input_with_config,
    parse_request_bytes, parse_request_text, validate_request_text,
};

// =========================================================================
// Request-line parsing
// =========================================================================

#[test]
fn simple_get_request() {
    let raw = "GET /api/data HTTP/1.1\nHost: localhost:8000\n\n";
    let req = parse_request_text(raw).expect("should parse");
    assert_eq!(req.method, HttpMethod::GET);
    assert_eq!(req.path, "/api/data");
    assert_eq!(req.url, "http://localhost:8000/api/data");
    assert_eq!(req.protocol, "HTTP/1.1");
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.headers[0].name, "Host");
    assert_eq!(req.headers[0].value, "localhost:8000");
    assert!(req.body.is_empty());
}

#[test]
fn browser_copy_without_trailing_blank_line() {
    let raw = "GET /admin/inspection.Report/getInspectionData HTTP/1.1
Accept: application/json, text/plain, */*
Accept-Encoding: gzip, deflate, br, zstd
Cache-Control: no-cache
Connection: keep-alive
Host: localhost:8000
Origin: http://localhost:1818
Referer: http://localhost:1818/
sec-ch-ua: \"Chromium\";v=\"142\", \"Not_A Brand\";v=\"99\"
think-lang: zh-cn";
    let req = parse_request_text(raw).expect("should parse");
    assert_eq!(req.path, "/admin/inspection.Report/getInspectionData");
    assert_eq!(
        req.url,
        "http://localhost:8000/admin/inspection.Report/getInspectionData"
    );
    assert_eq!(req.headers.len(), 9);
    assert_eq!(req.header_value("Referer"), Some("http://localhost:1818/"));
    assert_eq!(
        req.header_value("sec-ch-ua"),
        Some("\"Chromium\";v=\"142\", \"Not_A Brand\";v=\"99\"")
    );
    assert!(req.body.is_empty());
}

#[test]
fn lowercase_method_is_normalized() {
    let req = parse_request_text("patch /items/1 HTTP/2\n\n").expect("should parse");
    assert_eq!(req.method, HttpMethod::PATCH);
    assert_eq!(req.protocol, "HTTP/2");
}

#[test]
fn missing_protocol_defaults_to_http11() {
    let req = parse_request_text("DELETE /items/1").expect("should parse");
    assert_eq!(req.protocol, "HTTP/1.1");
    assert_eq!(req.url, "/items/1");
}

#[test]
fn all_allowed_methods() {
    let methods = [
        ("GET", HttpMethod::GET),
        ("POST", HttpMethod::POST),
        ("PUT", HttpMethod::PUT),
        ("DELETE", HttpMethod::DELETE),
        ("PATCH", HttpMethod::PATCH),
        ("HEAD", HttpMethod::HEAD),
        ("OPTIONS", HttpMethod::OPTIONS),
        ("CONNECT", HttpMethod::CONNECT),
        ("TRACE", HttpMethod::TRACE),
    ];

    for (name, expected) in methods {
        let raw = format!("{name} / HTTP/1.1\nHost: h\n\n");
        let req = parse_request_text(&raw).unwrap_or_else(|e| panic!("method {name}: {e}"));
        assert_eq!(req.method, expected, "mismatch for method {name}");
    }
}

#[test]
fn path_is_kept_verbatim() {
    let req = parse_request_text("GET /search?q=a%20b&x=1#top HTTP/1.1\n\n").unwrap();
    assert_eq!(req.path, "/search?q=a%20b&x=1#top");
    assert_eq!(req.query(), Some("q=a%20b&x=1"));
}

// =========================================================================
// Headers
// =========================================================================

#[test]
fn post_with_json_body() {
    let raw = "POST /api/users HTTP/1.1\nHost: api.example.com\nContent-Type: application/json\n\n{\"a\":1}";
    let req = parse_request_text(raw).expect("should parse");
    assert_eq!(req.method, HttpMethod::POST);
    assert_eq!(req.header_value("Content-Type"), Some("application/json"));
    assert_eq!(req.body, "{\"a\":1}");
}

#[test]
fn duplicate_header_last_wins_in_first_position() {
    let raw = "GET / HTTP/1.1\nK: A\nOther: x\nK: B\n\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.headers.len(), 2);
    assert_eq!(req.headers[0].name, "K");
    assert_eq!(req.headers[0].value, "B");
}

#[test]
fn header_names_differing_in_case_are_distinct() {
    let raw = "GET / HTTP/1.1\nX-Token: a\nx-token: b\n\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.headers.len(), 2);
}

#[test]
fn header_value_keeps_colons_after_the_first() {
    let raw = "GET / HTTP/1.1\nReferer:   http://localhost:1818/  \n\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.header_value("referer"), Some("http://localhost:1818/"));
}

#[test]
fn malformed_and_empty_name_lines_are_skipped() {
    let raw = "GET / HTTP/1.1\nno colon here\n: orphan value\n   \nX-Ok: 1\n\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.headers[0].name, "X-Ok");
    assert!(req.headers.iter().all(|h| !h.name.is_empty()));
}

#[test]
fn empty_header_value() {
    let req = parse_request_text("GET / HTTP/1.1\nX-Empty:\n\n").unwrap();
    assert_eq!(req.header_value("X-Empty"), Some(""));
}

#[test]
fn header_rows_are_enabled() {
    let req = parse_request_text("GET / HTTP/1.1\nA: 1\nB: 2\n\n").unwrap();
    let rows = req.header_rows();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.enabled));
    assert_eq!(rows[1].name, "B");
}

// =========================================================================
// URL reconstruction
// =========================================================================

#[test]
fn port_443_means_https() {
    let req = parse_request_text("GET /secure HTTP/1.1\nHost: secure.example.com:443\n\n").unwrap();
    assert!(req.url.starts_with("https://"));
    assert_eq!(req.url, "https://secure.example.com:443/secure");
}

#[test]
fn https_in_host_means_https() {
    let req = parse_request_text("GET / HTTP/1.1\nHost: HTTPS.example.com\n\n").unwrap();
    assert!(req.url.starts_with("https://"));
}

#[test]
fn lowercase_host_header_is_recognized() {
    let req = parse_request_text("GET /x HTTP/1.1\nhost: example.com\n\n").unwrap();
    assert_eq!(req.url, "http://example.com/x");
}

#[test]
fn empty_host_keeps_path_as_url() {
    let req = parse_request_text("GET /x HTTP/1.1\nHost:\n\n").unwrap();
    assert_eq!(req.url, "/x");
    assert_eq!(req.header_value("Host"), Some(""));

    let req = parse_request_text("GET /x HTTP/1.1\nHost: h.com\nhost:   \n\n").unwrap();
    assert_eq!(req.url, "http://h.com/x");
}

#[test]
fn no_host_url_is_path() {
    let req = parse_request_text("GET /only/path HTTP/1.1\nAccept: */*\n\n").unwrap();
    assert_eq!(req.url, "/only/path");
}

// =========================================================================
// Body
// =========================================================================

#[test]
fn crlf_request_splits_body() {
    let raw = "POST /submit HTTP/1.1\r\nHost: example.com\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nname=John&age=30\r\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.headers.len(), 2);
    assert_eq!(req.header_value("host"), Some("example.com"));
    assert_eq!(req.body, "name=John&age=30");
}

#[test]
fn body_is_trimmed_but_interior_whitespace_kept() {
    let raw = "PUT /r HTTP/1.1\nHost: h\n\n\n  line one\n\n  line two  \n\n";
    let req = parse_request_text(raw).unwrap();
    assert_eq!(req.body, "line one\n\n  line two");
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn invalid_request_is_rejected() {
    let err = parse_request_text("Invalid Request").unwrap_err();
    assert_eq!(err, ParseError::InvalidRequestLine);
    assert_eq!(err.kind(), ErrorKind::Structural);

    let report = ParseReport::from(parse_request_text("Invalid Request"));
    assert!(!report.success);
    assert_eq!(report.method, "");
    assert_eq!(report.error, "cannot parse request line");
}

#[test]
fn single_token_request_line_is_rejected() {
    assert_eq!(
        parse_request_text("GET\nHost: h\n\n"),
        Err(ParseError::InvalidRequestLine)
    );
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(parse_request_text(""), Err(ParseError::EmptyRequest));
    assert_eq!(parse_request_text(" \n\n body"), Err(ParseError::EmptyRequest));
}

#[test]
fn invalid_utf8_bytes_are_unexpected_errors() {
    let err = parse_request_bytes(b"GET /\xFF HTTP/1.1\n\n").unwrap_err();
    assert!(matches!(err, ParseError::Request(_)));
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().starts_with("parse failed: "));
}

#[test]
fn bytes_entry_point_parses_valid_utf8() {
    let req = parse_request_bytes(b"GET / HTTP/1.1\r\nHost: h\r\n\r\n").unwrap();
    assert_eq!(req.url, "http://h/");
}

#[test]
fn input_limit_from_config() {
    let parser = RequestTextParser::with_config(ParserConfig {
        max_input_len: 8,
        ..ParserConfig::default()
    });
    let err = parser.parse("GET /long HTTP/1.1\n\n").unwrap_err();
    assert!(matches!(err, ParseError::InputTooLarge { limit: 8, .. }));
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn validate_accepts_request() {
    assert_eq!(validate_request_text("get /x\nHost: h"), Ok(()));
}

#[test]
fn validate_reports_specific_failures() {
    assert_eq!(validate_request_text("   "), Err(ParseError::EmptyRequest));
    assert_eq!(validate_request_text("GET"), Err(ParseError::InvalidRequestLine));
    assert_eq!(
        validate_request_text("FETCH /x HTTP/1.1"),
        Err(ParseError::UnsupportedMethod("FETCH".into()))
    );
}

// =========================================================================
// Mode detection
// =========================================================================

#[test]
fn auto_mode_routes_curl_commands() {
    let req = parse_input("  curl https://api.example.com/users").unwrap();
    assert_eq!(req.url, "https://api.example.com/users");

    let req = parse_input("GET /users HTTP/1.1\nHost: api.example.com\n\n").unwrap();
    assert_eq!(req.url, "http://api.example.com/users");
}

#[test]
fn explicit_mode_overrides_detection() {
    let result = parse_input_with_config(
        "curl https://a.com/",
        InputMode::Http,
        ParserConfig::default(),
    );
    assert_eq!(result, Err(ParseError::InvalidRequestLine));
}

#[test]
fn words_starting_with_curl_are_not_commands() {
    assert_eq!(InputMode::Auto.resolve("curling /x HTTP/1.1"), InputMode::Http);
    assert_eq!(
        parse_input("curlx https://a.com/"),
        Err(ParseError::InvalidRequestLine)
    );
}

#[test]
fn mode_resolution() {
    assert_eq!(InputMode::Auto.resolve("CURL x"), InputMode::Curl);
    assert_eq!(InputMode::Auto.resolve("GET / HTTP/1.1"), InputMode::Http);
    assert_eq!(InputMode::Curl.resolve("GET / HTTP/1.1"), InputMode::Curl);
}

// =========================================================================
// Output formatting
// =========================================================================

#[test]
fn json_report_compact() {
    let report = ParseReport::from(parse_request_text("GET / HTTP/1.1\nHost: h\n\n"));
    let json = format_json(&report, false);
    assert!(json.contains("\"method\":\"GET\""));
    assert!(json.contains("\"url\":\"http://h/\""));
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("\"error\":\"\""));
}

#[test]
fn json_descriptor_pretty() {
    let req = parse_request_text("GET /pretty HTTP/1.1\nHost: h\n\n").unwrap();
    let json = format_json(&req, true);
    assert!(json.contains('\n'));
    assert!(json.contains("\"path\": \"/pretty\""));
}

#[test]
fn debug_output_contains_sections() {
    let req = parse_request_text("GET /test?a=1&b=x+y HTTP/1.1\nHost: h\n\n").unwrap();
    let dbg = format_debug(&req, true);
    assert!(dbg.contains("=== HTTP Request ==="));
    assert!(dbg.contains("Method:   GET"));
    assert!(dbg.contains("URL:      http://h/test?a=1&b=x+y"));
    assert!(dbg.contains("--- Headers (1) ---"));
    assert!(dbg.contains("--- Query (2) ---"));
    assert!(dbg.contains("  b = x y\n"));
    assert!(dbg.contains("--- No Body ---"));
}

#[test]
fn debug_output_decodes_form_body() {
    let raw = "POST /f HTTP/1.1\nContent-Type: application/x-www-form-urlencoded\n\nname=John%20Doe&age=25";
    let req = parse_request_text(raw).unwrap();
    let dbg = format_debug(&req, true);
    assert!(dbg.contains("--- Form Fields (2) ---"));
    assert!(dbg.contains("  name = John Doe\n"));

    let plain = format_debug(&req, false);
    assert!(!plain.contains("Form Fields"));
}

#[test]
fn http_output_parses_back() {
    let raw = "POST /api?x=1 HTTP/1.1\nHost: api.example.com\nX-A: 1\n\n{\"k\":true}";
    let req = parse_request_text(raw).unwrap();
    let text = format_http(&req);
    assert!(text.starts_with("POST /api?x=1 HTTP/1.1\n"));

    let again = parse_request_text(&text).unwrap();
    assert_eq!(again, req);
}

#[test]
fn http_output_body_comes_back_trimmed() {
    let req = parse_curl("curl -d '  padded  ' http://h.com/p").unwrap();
    let again = parse_request_text(&format_http(&req)).unwrap();
    assert_eq!(again.method, req.method);
    assert_eq!(again.path, req.path);
    assert_eq!(again.body, "padded");
}
