use reqwest::Client;
use tracing::{debug, info};

use super::{parse_postings, ListingError, Posting};

/// Downloads the job board page and hands the markup to the posting parser.
#[derive(Debug, Clone, Default)]
pub struct ListingFetcher {
    client: Client,
}

impl ListingFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<Posting>, ListingError> {
        info!(%url, "fetching job listings");
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = html.len(), "listing page downloaded");

        let postings = parse_postings(&html)?;
        info!(count = postings.len(), "parsed postings");
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves a single canned response on a loopback port and returns the board URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("loopback bind");
        let addr = listener.local_addr().expect("listener address");

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(read) => request.extend_from_slice(&chunk[..read]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{addr}/acme")
    }

    fn fetcher() -> ListingFetcher {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .expect("client builds");
        ListingFetcher::new(client)
    }

    #[tokio::test]
    async fn successful_response_is_parsed_into_postings() {
        let url = serve_once(
            "200 OK",
            r#"<div class="posting" data-qa-posting-id="9"><h5>Frontend Engineer</h5></div>"#,
        );

        let postings = fetcher().fetch(&url).await.expect("fetch succeeds");

        assert_eq!(postings, vec![Posting::new("Frontend Engineer", "9", "None")]);
    }

    #[tokio::test]
    async fn server_error_status_is_a_fetch_error() {
        let url = serve_once("500 Internal Server Error", "boom");

        match fetcher().fetch(&url).await {
            Err(ListingError::Http(err)) => {
                assert_eq!(err.status().map(|status| status.as_u16()), Some(500));
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let result = fetcher().fetch("http://127.0.0.1:1/acme").await;

        assert!(matches!(result, Err(ListingError::Http(_))));
    }

    #[tokio::test]
    async fn malformed_page_surfaces_parse_error() {
        let url = serve_once("200 OK", r#"<div class="posting"><h5>No id</h5></div>"#);

        let result = fetcher().fetch(&url).await;

        assert!(matches!(
            result,
            Err(ListingError::MalformedPosting { index: 0, .. })
        ));
    }
}
