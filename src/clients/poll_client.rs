use std::time::Duration;

use serenity::async_trait;

use crate::clients::page;
use crate::error::PollError;
use crate::models::date::DateToken;
use crate::models::poll::{DateId, PollSnapshot, UserId};

/// Per-request timeout so one unresponsive remote call cannot hang a whole
/// mutation batch. Timed-out requests surface as failed outcomes; there is
/// no automatic retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const CHANGE_POLL_PATH: &str = "/pc/poll-change-poll";
const CHANGE_POLL_AJAX_PATH: &str = "/pc/poll-change-poll-ajax";

/// The remote poll as the core sees it: one snapshot read plus three
/// fire-and-observe mutations judged by status code only. The service layer
/// and the executor are generic over this trait so tests can run against
/// synthetic snapshots without any markup or network.
#[async_trait]
pub trait PollApi: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<PollSnapshot, PollError>;
    async fn add_date(&self, date: &DateToken) -> Result<(), PollError>;
    async fn delete_date(&self, id: &DateId) -> Result<(), PollError>;
    async fn delete_user(&self, user: &UserId) -> Result<(), PollError>;
}

/// HTTP client for a Xoyondo date poll. The poll's identity and write
/// secret both live in the configured URL, which must look like
/// `<scheme>://<host>/dp/<poll-id>/<secret>`; mutations replay the site's
/// own form posts against the same host.
#[derive(Debug)]
pub struct XoyondoClient {
    http: reqwest::Client,
    url: String,
    origin: String,
    poll_id: String,
    secret: String,
}

impl XoyondoClient {
    pub fn new(url: &str) -> Result<Self, PollError> {
        let (origin, poll_id, secret) = parse_poll_url(url)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(XoyondoClient {
            http,
            url: url.to_string(),
            origin,
            poll_id,
            secret,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    /// Points this client at another poll, re-deriving id and secret.
    pub fn set_url(&mut self, url: &str) -> Result<(), PollError> {
        let (origin, poll_id, secret) = parse_poll_url(url)?;
        self.url = url.to_string();
        self.origin = origin;
        self.poll_id = poll_id;
        self.secret = secret;
        Ok(())
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<(), PollError> {
        let response = self
            .http
            .post(format!("{}{}", self.origin, path))
            .form(form)
            .send()
            .await?;
        ensure_success(response.status())
    }
}

#[async_trait]
impl PollApi for XoyondoClient {
    async fn fetch_snapshot(&self) -> Result<PollSnapshot, PollError> {
        let response = self.http.get(&self.url).send().await?;
        ensure_success(response.status())?;
        let body = response.text().await?;
        Ok(page::parse_snapshot(&body))
    }

    async fn add_date(&self, date: &DateToken) -> Result<(), PollError> {
        let date = date.to_string();
        self.post_form(
            CHANGE_POLL_PATH,
            &[
                ("newdates", date.as_str()),
                ("ID", &self.poll_id),
                ("product", "d"),
                ("operation", "date_add_cal"),
                ("pass", &self.secret),
                ("times_selected", "0"),
            ],
        )
        .await
    }

    async fn delete_date(&self, id: &DateId) -> Result<(), PollError> {
        self.post_form(
            CHANGE_POLL_PATH,
            &[
                ("ID", &self.poll_id),
                ("product", "d"),
                ("dateID", &id.0),
                ("operation", "date_delete"),
                ("pass", &self.secret),
            ],
        )
        .await
    }

    async fn delete_user(&self, user: &UserId) -> Result<(), PollError> {
        self.post_form(
            CHANGE_POLL_AJAX_PATH,
            &[
                ("u", &user.0),
                ("ID", &self.poll_id),
                ("product", "d"),
                ("operation", "delete-user"),
                ("pass", &self.secret),
            ],
        )
        .await
    }
}

fn ensure_success(status: reqwest::StatusCode) -> Result<(), PollError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PollError::Status {
            status: status.as_u16(),
        })
    }
}

/// Splits a poll URL into (origin, poll id, secret). Anything that is not
/// exactly `<scheme>://<host>/dp/<id>/<secret>` is rejected.
fn parse_poll_url(url: &str) -> Result<(String, String, String), PollError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or(PollError::InvalidUrl)?;
    let (host, path) = rest.split_once('/').ok_or(PollError::InvalidUrl)?;
    if host.is_empty() {
        return Err(PollError::InvalidUrl);
    }
    let mut segments = path.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some("dp"), Some(id), Some(secret), None) if !id.is_empty() && !secret.is_empty() => {
            let origin = url[..url.len() - path.len() - 1].to_string();
            Ok((origin, id.to_string(), secret.to_string()))
        }
        _ => Err(PollError::InvalidUrl),
    }
}
