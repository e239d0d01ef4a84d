//! Gateway HTTP client
//!
//! Blocking client the console uses to talk to the gateway: login, the
//! first-login registration calls, and operation submission.

use reqwest::blocking::Response;

use crate::gateway::types::{InvokeRequest, InvokeResponse, LoginResponse};
use crate::gateway::ErrorResponse;
use crate::network::{self, Org};

use super::error::{ConsoleError, ConsoleResult};
use super::menu::{self, HttpMethod};

/// Opening balance granted to newly registered users
pub const OPENING_BALANCE: &str = "10000";

/// Blocking HTTP client for one gateway
pub struct ConsoleClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ConsoleClient {
    /// Client for the gateway at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Log in and return the issued token
    pub fn login(&self, username: &str, password: &str, org: Org) -> ConsoleResult<String> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .form(&[
                ("username", username),
                ("password", password),
                ("orgName", org.name()),
            ])
            .send()?;

        let body: LoginResponse = parse_response(response)?;
        Ok(body.token)
    }

    /// First-login registration
    ///
    /// Non-admin identities are written into the ledger right after login:
    /// users with the opening balance, repairers by id. Returns the
    /// confirmation message, or `None` when no registration applies.
    pub fn register_first_login(
        &self,
        token: &str,
        username: &str,
        org: Org,
    ) -> ConsoleResult<Option<String>> {
        if username == "admin" {
            return Ok(None);
        }

        match org {
            Org::User => self
                .invoke(
                    token,
                    "registerUser",
                    &[username.to_string(), OPENING_BALANCE.to_string()],
                )
                .map(Some),
            Org::Repairer => self
                .invoke(token, "registerRepairer", &[username.to_string()])
                .map(Some),
            Org::Provider => Ok(None),
        }
    }

    /// Submit a menu operation, dispatching on the `get` prefix rule
    pub fn submit(
        &self,
        token: &str,
        org: Org,
        name: &str,
        args: &[String],
    ) -> ConsoleResult<String> {
        let operation = menu::find(org, name).ok_or_else(|| ConsoleError::UnknownOperation {
            org: org.to_string(),
            name: name.to_string(),
        })?;

        match menu::method_for(operation.name) {
            HttpMethod::Get => self.query(token, operation.name, args.first()),
            HttpMethod::Post => self.invoke(token, operation.name, args),
        }
    }

    /// POST a chaincode invocation
    pub fn invoke(&self, token: &str, function: &str, args: &[String]) -> ConsoleResult<String> {
        let response = self
            .http
            .post(format!("{}/chaincode/{}", self.base_url, function))
            .bearer_auth(token)
            .json(&InvokeRequest {
                ccversion: network::CHAINCODE_VERSION.to_string(),
                args: args.to_vec(),
            })
            .send()?;

        let body: InvokeResponse = parse_response(response)?;
        Ok(body.message)
    }

    /// GET a chaincode query; at most one argument goes into the query string
    pub fn query(&self, token: &str, function: &str, arg: Option<&String>) -> ConsoleResult<String> {
        let empty = String::new();
        let arg = arg.unwrap_or(&empty);

        let response = self
            .http
            .get(format!("{}/chaincode/{}", self.base_url, function))
            .bearer_auth(token)
            .query(&[
                ("ccversion", network::CHAINCODE_VERSION),
                ("args", arg.as_str()),
            ])
            .send()?;

        let body: InvokeResponse = parse_response(response)?;
        Ok(body.message)
    }
}

/// Decode a success body, or surface the gateway's error message
fn parse_response<T: serde::de::DeserializeOwned>(response: Response) -> ConsoleResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let message = match response.json::<ErrorResponse>() {
        Ok(body) => body.details.unwrap_or(body.message),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ConsoleError::Gateway {
        status: status.as_u16(),
        message,
    })
}
