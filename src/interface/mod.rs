//! Terminal client for the `/search` endpoint: sends a question, prints the answer and its sources.

pub mod render;

use std::io::Write;
use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};
use url::Url;

use crate::answer::SourcedAnswer;
use crate::server::params::{ErrorBody, QueryRequest};
use render::{render_answer, render_error};

pub const SEARCHING_STATUS: &str = "Searching the web and analyzing results...";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Long enough to outlast both provider calls on the server side.
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("{detail} (HTTP {code})")]
    Status { code: u16, detail: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: Client,
    search_url: Url,
}

impl EndpointClient {
    pub fn new(endpoint: &str) -> Result<Self, InterfaceError> {
        let http = Client::builder()
            .user_agent(crate::USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Self::with_client(http, endpoint)
    }

    fn with_client(http: Client, endpoint: &str) -> Result<Self, InterfaceError> {
        let search_url = Url::parse(endpoint)?.join("search")?;
        Ok(Self { http, search_url })
    }

    pub async fn ask(&self, query: &str) -> Result<SourcedAnswer, InterfaceError> {
        if query.trim().is_empty() {
            return Err(InterfaceError::EmptyQuery);
        }

        debug!(url = %self.search_url, "sending query");
        let response = self
            .http
            .post(self.search_url.clone())
            .json(&QueryRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.detail)
                .unwrap_or(text);
            warn!(status = %status, "search endpoint returned an error");
            return Err(InterfaceError::Status {
                code: status.as_u16(),
                detail,
            });
        }

        Ok(response.json().await?)
    }

    /// Asks one question and returns the text to show for it, success or not.
    pub async fn ask_and_render(&self, query: &str) -> String {
        match self.ask(query).await {
            Ok(answer) => render_answer(&answer),
            Err(e) => render_error(&e),
        }
    }
}

/// Reads one question per line and answers them in order. A line is only
/// read after the previous answer has been printed.
pub async fn run_interactive<R, W>(
    client: &EndpointClient,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(out, "? ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };

        let query = line.trim();
        if !query.is_empty() {
            writeln!(out, "{SEARCHING_STATUS}")?;
            out.flush()?;
        }
        let output = client.ask_and_render(query).await;
        writeln!(out, "{output}")?;
    }
}
