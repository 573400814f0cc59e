use std::time::Duration;
use serde_json::Value;
use crate::error::Error;
use super::reqwest::ReqwestClient;

/// Request client.
pub trait Client {
    /// Send JSON payload with POST and receive JSON response.
    fn make_json_request(&self, url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error>;

    /// Send GET request and receive JSON response.
    fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, Error>;

    /// Send GET request and receive response body as text.
    fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, Error>;
}

/// Create reqwest client, every request is bounded by `timeout`.
pub fn get_reqwest_client(timeout: Duration) -> Result<Box<dyn Client>, Error> {
    Ok(Box::new(ReqwestClient::new(timeout)?))
}
