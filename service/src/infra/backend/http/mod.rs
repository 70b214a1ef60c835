//! HTTP [`Backend`] implementation.

mod impls;

use std::collections::BTreeMap;

use derive_more::{Display, Error as StdError, From};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use tracerr::Traced;
use tracing as log;
use url::Url;

use crate::infra::backend::{self, Rejection};
#[cfg(doc)]
use crate::infra::Backend;

/// [`Http`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST API.
    pub url: String,

    /// Bearer token authenticating the requests.
    pub token: SecretString,
}

/// REST API [`Backend`] client.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Base URL every endpoint is resolved against.
    base: Url,

    /// Bearer token authenticating the requests.
    token: SecretString,
}

impl Http {
    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config::url`] is invalid, or the HTTP client fails to
    /// initialize.
    pub fn new(conf: Config) -> Result<Self, Traced<InitError>> {
        let mut base = Url::parse(&conf.url)
            .map_err(tracerr::from_and_wrap!(=> InitError))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(tracerr::from_and_wrap!(=> InitError))?;

        Ok(Self {
            client,
            base,
            token: conf.token,
        })
    }

    /// Returns the URL of the provided `endpoint`.
    fn endpoint(&self, endpoint: &str) -> Result<Url, Traced<backend::Error>> {
        self.base.join(endpoint).map_err(|e| {
            tracerr::new!(backend::Error::InvalidRequest(e.to_string()))
        })
    }

    /// Prepares an authenticated `GET` request to the `endpoint`.
    fn get(
        &self,
        endpoint: &str,
    ) -> Result<RequestBuilder, Traced<backend::Error>> {
        Ok(self.authorized(self.client.get(self.endpoint(endpoint)?)))
    }

    /// Prepares an authenticated `POST` request to the `endpoint`.
    fn post(
        &self,
        endpoint: &str,
    ) -> Result<RequestBuilder, Traced<backend::Error>> {
        Ok(self.authorized(self.client.post(self.endpoint(endpoint)?)))
    }

    /// Authenticates the provided request.
    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(self.token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends the provided request, decoding the JSON body of a successful
    /// response.
    async fn send<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<T, Traced<backend::Error>> {
        let resp = Self::dispatch(req).await?;
        decode(ensure_success(resp).await?).await
    }

    /// Sends the provided request, regardless of the response status.
    async fn dispatch(
        req: RequestBuilder,
    ) -> Result<Response, Traced<backend::Error>> {
        req.send()
            .await
            .map_err(|e| tracerr::new!(transport(&e)))
    }
}

/// Decodes the JSON body of the provided [`Response`].
async fn decode<T: DeserializeOwned>(
    resp: Response,
) -> Result<T, Traced<backend::Error>> {
    resp.json::<T>()
        .await
        .map_err(|e| tracerr::new!(transport(&e)))
}

/// Converts a transport-level [`reqwest::Error`] into a [`backend::Error`].
fn transport(e: &reqwest::Error) -> backend::Error {
    if e.is_timeout() {
        backend::Error::Timeout
    } else if e.is_decode() {
        backend::Error::Decode(e.to_string())
    } else if e.is_builder() {
        backend::Error::InvalidRequest(e.to_string())
    } else {
        backend::Error::Connectivity(e.to_string())
    }
}

/// Ensures the provided [`Response`] is successful, converting it into a
/// [`backend::Error`] otherwise.
async fn ensure_success(
    resp: Response,
) -> Result<Response, Traced<backend::Error>> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_owned());
    log::debug!("`{status}` response: {body}");
    Err(tracerr::new!(rejection(status, body)))
}

/// Converts a non-successful response into a [`backend::Error`].
///
/// Bodies carrying field-level errors become a [`Rejection`].
fn rejection(status: StatusCode, body: String) -> backend::Error {
    match serde_json::from_str::<RejectionBody>(&body) {
        Ok(rejected) => backend::Error::Rejected(rejected.into()),
        Err(_) => backend::Error::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Response body wrapping its payload into a `data` field.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// Wrapped payload.
    data: T,
}

/// Response body of a listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    /// All the items wrapped into a `data` field.
    Flat(Envelope<Vec<T>>),

    /// A page of items along with pagination metadata.
    Paginated(Envelope<Envelope<Vec<T>>>),

    /// Bare array of items.
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    /// Returns the listed items.
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Flat(Envelope { data })
            | Self::Paginated(Envelope {
                data: Envelope { data },
            })
            | Self::Bare(data) => data,
        }
    }
}

/// Response body of a rejected request.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    /// Summary message.
    #[serde(default)]
    message: String,

    /// Field-level errors.
    errors: BTreeMap<String, OneOrMany>,
}

impl From<RejectionBody> for Rejection {
    fn from(body: RejectionBody) -> Self {
        Self {
            message: body.message,
            errors: body
                .errors
                .into_iter()
                .map(|(field, messages)| (field, messages.into_vec()))
                .collect(),
        }
    }
}

/// Either a single error message or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    /// Single message.
    One(String),

    /// List of messages.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Returns all the messages.
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(msg) => vec![msg],
            Self::Many(msgs) => msgs,
        }
    }
}

/// Error of creating a new [`Http`] client.
#[derive(Debug, Display, From, StdError)]
pub enum InitError {
    /// [`Config::url`] is not a valid URL.
    #[display("Invalid base URL: {_0}")]
    Url(url::ParseError),

    /// HTTP client failed to initialize.
    #[display("Failed to build HTTP client: {_0}")]
    Client(reqwest::Error),
}

#[cfg(test)]
mod spec {
    use reqwest::StatusCode;

    use crate::{
        domain::{
            installment,
            project::{self, ExpenseKind},
            Project,
        },
        infra::backend,
    };

    use super::{rejection, Listing};

    #[test]
    fn decodes_flat_and_paginated_listings() {
        let flat = r#"{"data": [{"id": 1, "name": "Palm Hills"}]}"#;
        let paged = r#"{
            "data": {
                "current_page": 1,
                "data": [{"id": 2, "name": "Zed", "active": true}],
                "total": 1
            }
        }"#;

        let flat = serde_json::from_str::<Listing<Project>>(flat)
            .unwrap()
            .into_items();
        let paged = serde_json::from_str::<Listing<Project>>(paged)
            .unwrap()
            .into_items();

        assert_eq!(flat[0].id, project::Id::from(1));
        assert_eq!(paged[0].id, project::Id::from(2));
        assert!(paged[0].is_active);
    }

    #[test]
    fn decodes_project_terms() {
        let body = r#"[{
            "id": 1,
            "name": "Palm Hills",
            "installment_types": ["monthly", "quarterly", "monthly"],
            "deposit_percentage": "10.00",
            "additional_expenses": [
                {"name": "Maintenance", "type": "fixed", "value": 5000},
                {"name": "Club", "type": "percentage", "value": "10"}
            ]
        }]"#;

        let projects = serde_json::from_str::<Listing<Project>>(body)
            .unwrap()
            .into_items();

        assert_eq!(projects[0].installment_kinds.len(), 2);
        assert_eq!(projects[0].additional_expenses.len(), 2);
        assert_eq!(projects[0].deposit_percentage.to_string(), "10.00");
    }

    #[test]
    fn decodes_kinds_ignoring_case() {
        let body = r#"{"data": [{
            "id": 1,
            "name": "Palm Hills",
            "installment_types": ["MONTHLY", "Quarterly", "weekly"],
            "additional_expenses": [
                {"name": "Club", "type": "PERCENTAGE", "value": 10}
            ]
        }]}"#;

        let projects = serde_json::from_str::<Listing<Project>>(body)
            .unwrap()
            .into_items();

        assert_eq!(
            projects[0].installment_kinds,
            [installment::Kind::Monthly, installment::Kind::Quarterly],
        );
        assert_eq!(
            projects[0].additional_expenses[0].kind,
            ExpenseKind::Percentage,
        );
    }

    #[test]
    fn recognizes_rejections() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": {
                "client.phone": "The phone has already been taken.",
                "unit_id": ["The unit is already reserved."]
            }
        }"#;
        let backend::Error::Rejected(rejected) =
            rejection(StatusCode::UNPROCESSABLE_ENTITY, body.into())
        else {
            panic!("expected rejection");
        };

        assert_eq!(rejected.message, "The given data was invalid.");
        assert_eq!(
            rejected.errors,
            [
                (
                    "client.phone".to_owned(),
                    vec!["The phone has already been taken.".to_owned()],
                ),
                (
                    "unit_id".to_owned(),
                    vec!["The unit is already reserved.".to_owned()],
                ),
            ],
        );

        assert!(matches!(
            rejection(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"message": "Server Error"}"#.into(),
            ),
            backend::Error::Status { status: 500, .. },
        ));
    }
}
