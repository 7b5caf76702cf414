use pennant::http::error::WriteError;
use pennant::http::response::{Response, ResponseBuilder, StatusCode, default_headers};
use pennant::http::writer::ResponseWriter;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::BadGateway.as_u16(), 502);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::BadGateway.reason_phrase(), "Bad Gateway");
}

#[test]
fn test_status_code_table_round_trips() {
    for status in [
        StatusCode::Ok,
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::InternalServerError,
        StatusCode::BadGateway,
    ] {
        assert_eq!(StatusCode::from_u16(status.as_u16()).unwrap(), status);
    }
}

#[test]
fn test_status_code_outside_table() {
    for code in [0u16, 100, 201, 204, 301, 418, 503, 999] {
        assert!(matches!(
            StatusCode::from_u16(code),
            Err(WriteError::UnrecognizedStatusCode(c)) if c == code
        ));
    }
}

#[test]
fn test_default_headers() {
    let headers = default_headers(42);
    let entries: Vec<(&str, &str)> = headers.iter().collect();

    assert_eq!(
        entries,
        vec![
            ("content-length", "42"),
            ("connection", "close"),
            ("content-type", "text/plain"),
        ]
    );
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(
        response.headers.get("Content-Length"),
        Some(body.len().to_string().as_str())
    );
}

#[test]
fn test_response_builder_overrides_defaults() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("X-Custom", "value")
        .body(b"<p/>".to_vec())
        .build();

    assert_eq!(response.headers.get("content-type"), Some("text/html"));
    assert_eq!(response.headers.get("x-custom"), Some("value"));
    assert_eq!(response.headers.get("connection"), Some("close"));
    assert_eq!(response.headers.len(), 4);
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::BadRequest).build();

    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length"), Some("0"));
}

#[test]
fn test_response_helpers() {
    let ok = Response::ok(b"test content".to_vec());
    assert_eq!(ok.status, StatusCode::Ok);
    assert_eq!(ok.body, b"test content".to_vec());

    let bad = Response::bad_request();
    assert_eq!(bad.status, StatusCode::BadRequest);
    assert!(bad.body.is_empty());

    let err = Response::internal_error();
    assert_eq!(err.status, StatusCode::InternalServerError);
    assert_eq!(err.body, b"500 Internal Server Error".to_vec());
}

#[tokio::test]
async fn test_response_write_to() {
    let mut writer = ResponseWriter::new(Vec::new());

    Response::ok("hi").write_to(&mut writer).await.unwrap();

    assert_eq!(
        String::from_utf8(writer.into_inner()).unwrap(),
        "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\nhi"
    );
}
