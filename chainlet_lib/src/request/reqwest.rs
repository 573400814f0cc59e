use std::time::Duration;
use reqwest::blocking::Client as BlockingClient;
use serde_json::Value;
use crate::error::Error;
use crate::request::client::Client;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; chainlet/", env!("CARGO_PKG_VERSION"), ")");

pub struct ReqwestClient {
    client: BlockingClient,
}

impl ReqwestClient {

    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = BlockingClient::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(ReqwestClient {
            client,
        })
    }
}

impl Client for ReqwestClient {

    fn make_json_request(&self, url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {

        let mut request = self.client
            .post(url)
            .query(params)
            .json(&payload);

        for (k, v) in headers {
            request = request.header(*k, *v);
        }

        tracing::trace!(url, "POST");

        // Providers report failures in the JSON body, so the status is not checked here.
        let response = request.send()?;

        let ret = response.json()?;
        Ok(ret)
    }

    fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        tracing::trace!(url, "GET");

        let response = self.client
            .get(url)
            .query(params)
            .send()?
            .error_for_status()?;

        Ok(response.json()?)
    }

    fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        tracing::trace!(url, "GET");

        let response = self.client
            .get(url)
            .query(params)
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }
}
