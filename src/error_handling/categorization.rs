//! Error categorization.
//!
//! Maps transport errors into the `FetchError` taxonomy so that every failure
//! path is classified rather than stringified.

use std::error::Error as StdError;

use super::types::FetchError;

/// Categorizes a `reqwest::Error` into a `FetchError`.
///
/// HTTP status codes are checked first, then TLS failures anywhere in the
/// source chain, then reqwest's own error kinds.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchError {
    if let Some(status) = error.status() {
        return FetchError::HttpStatus(status.as_u16());
    }

    let detail = error_chain_message(error);

    if error.is_timeout() {
        FetchError::Timeout(detail)
    } else if is_tls_error(error) {
        FetchError::Tls(detail)
    } else if error.is_connect() {
        FetchError::Connect(detail)
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(detail)
    } else {
        FetchError::Other(detail)
    }
}

/// Returns true if a rustls error appears anywhere in the source chain.
///
/// `std::io::Error::source` skips over the error it wraps, so wrapped io errors
/// are unpacked with `get_ref` explicitly.
fn is_tls_error(error: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        if err.is::<rustls::Error>() {
            return true;
        }
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            if io_err
                .get_ref()
                .is_some_and(|inner| inner.is::<rustls::Error>())
            {
                return true;
            }
        }
        current = err.source();
    }
    false
}

/// Joins the error and its sources into one line (`outer: inner: root`).
pub fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(err) = current {
        let text = err.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = err.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain_message_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(
            error_chain_message(&err),
            "outer failure: connection refused"
        );
    }

    #[test]
    fn test_is_tls_error_through_io_wrapper() {
        let tls = rustls::Error::General("handshake failure".into());
        let io = std::io::Error::new(std::io::ErrorKind::Other, tls);
        let err = Outer(io);
        assert!(is_tls_error(&err));
    }

    #[test]
    fn test_is_tls_error_false_for_plain_io() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(!is_tls_error(&err));
    }

    #[tokio::test]
    async fn test_categorize_connection_refused() {
        // Bind then drop a listener to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = reqwest::Client::new();
        let err = client
            .get(format!("http://{}/favicon.ico", addr))
            .send()
            .await
            .expect_err("nothing is listening");
        assert!(matches!(
            categorize_reqwest_error(&err),
            FetchError::Connect(_)
        ));
    }
}
