//! HTTP client for the roster table endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use staffdir_core::RawTable;
use tracing::info;

use crate::{EmployeeSource, FetchError};

/// Path of the table endpoint, relative to the API base URL.
pub const TABLE_PATH: &str = "gettabledata.php";

/// Static service credentials sent in every request body.
///
/// These are configured out of band and are unrelated to the user's login.
#[derive(Clone, Serialize)]
pub struct ServiceCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TableResponse {
    #[serde(rename = "TABLE_DATA")]
    table_data: TableData,
}

#[derive(Deserialize)]
struct TableData {
    data: RawTable,
}

/// Fetches the roster table with a single `POST`.
pub struct TableClient {
    client: reqwest::Client,
    base_url: String,
    credentials: ServiceCredentials,
}

impl TableClient {
    /// `base_url` is the API root, e.g. `https://backend.jotish.in/backend_dev`.
    /// A trailing slash is ignored.
    pub fn new(base_url: String, credentials: ServiceCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}/{TABLE_PATH}", self.base_url)
    }
}

#[async_trait]
impl EmployeeSource for TableClient {
    async fn fetch_table(&self) -> Result<RawTable, FetchError> {
        let url = self.table_url();

        info!(url = %url, "fetching employee table");
        let resp = self
            .client
            .post(&url)
            .json(&self.credentials)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: TableResponse = serde_json::from_str(&body)?;
        let rows = parsed.table_data.data;
        info!(rows = rows.len(), "fetched employee table");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn credentials() -> ServiceCredentials {
        ServiceCredentials {
            username: "svc".into(),
            password: "s3cret".into(),
        }
    }

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/backend_dev/"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[test]
    fn table_client_trims_trailing_slash() {
        let client = TableClient::new("http://localhost:8080/api/".into(), credentials());
        assert_eq!(client.table_url(), "http://localhost:8080/api/gettabledata.php");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("svc"));
        assert!(!debug.contains("s3cret"));
    }

    #[tokio::test]
    async fn posts_credentials_and_parses_table() {
        let body = r#"{"TABLE_DATA":{"data":[
            ["Tiger Nixon","System Architect","Edinburgh","5421","2011/04/25","$320,800"],
            ["Garrett Winters","Accountant","Tokyo","8422","2011/07/25","$170,750"]
        ]}}"#;
        let (base, server) = serve_once("200 OK", body).await;

        let client = TableClient::new(base, credentials());
        let rows = client.fetch_table().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Garrett Winters");
        assert_eq!(rows[0][5], "$320,800");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /backend_dev/gettabledata.php "));
        let (_, sent_body) = request.split_once("\r\n\r\n").unwrap();
        let sent: serde_json::Value = serde_json::from_str(sent_body).unwrap();
        assert_eq!(sent["username"], "svc");
        assert_eq!(sent["password"], "s3cret");
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let (base, server) = serve_once("503 Service Unavailable", "maintenance").await;

        let err = TableClient::new(base, credentials())
            .fetch_table()
            .await
            .unwrap_err();
        match err {
            FetchError::Server { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected server error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn missing_wrapper_is_json_error() {
        let (base, server) = serve_once("200 OK", r#"{"data":[]}"#).await;

        let err = TableClient::new(base, credentials())
            .fetch_table()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Json(_)), "got {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TableClient::new(format!("http://{addr}"), credentials())
            .fetch_table()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)), "got {err:?}");
    }
}
