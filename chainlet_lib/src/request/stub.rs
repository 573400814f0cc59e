//! Only for tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use serde_json::Value;
use crate::error::Error;
use crate::request::client::Client;

/// Scripted reply of the stub.
pub enum Reply {
    /// JSON body.
    Json(Value),
    /// Text body.
    Text(String),
    /// Transport failure.
    Fail(&'static str),
}

struct Exchange {
    expected_headers: Vec<(String, String)>,
    expected_params: Vec<(String, String)>,
    expected_payload: Option<Value>,
    reply: Reply,
}

/// Client for tests, answers requests in the order they were scripted.
#[derive(Default)]
pub struct StubClient {
    exchanges: RefCell<VecDeque<Exchange>>,
}

impl StubClient {

    /// Create client without scripted exchanges.
    pub fn new() -> Self {
        StubClient::default()
    }

    /// Expect a JSON POST; `expected_payload` is compared when given.
    pub fn expect_post(self,
        expected_headers: Vec<(String, String)>,
        expected_payload: Option<Value>,
        response_body: Value) -> Self
    {
        self.exchanges.borrow_mut().push_back(Exchange {
            expected_headers,
            expected_params: vec![],
            expected_payload,
            reply: Reply::Json(response_body),
        });
        self
    }

    /// Expect a GET with the given query parameters.
    pub fn expect_get(self, expected_params: Vec<(String, String)>, reply: Reply) -> Self {
        self.exchanges.borrow_mut().push_back(Exchange {
            expected_headers: vec![],
            expected_params,
            expected_payload: None,
            reply,
        });
        self
    }

    fn next(&self, payload: Option<&Value>, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Reply {
        let exchange = self.exchanges.borrow_mut().pop_front().expect("scripted exchange");

        assert_eq!(headers.len(), exchange.expected_headers.len(), "headers count");
        for (actual, expected) in headers.iter().zip(exchange.expected_headers.iter()) {
            assert_eq!(actual.0, expected.0, "headers keys");
            assert_eq!(actual.1, expected.1, "headers values");
        }

        assert_eq!(params.len(), exchange.expected_params.len(), "params count");
        for (actual, expected) in params.iter().zip(exchange.expected_params.iter()) {
            assert_eq!(actual.0, expected.0, "params keys");
            assert_eq!(actual.1, expected.1, "params values");
        }

        if let (Some(actual), Some(expected)) = (payload, &exchange.expected_payload) {
            assert_eq!(actual, expected);
        }

        exchange.reply
    }
}

impl Client for StubClient {

    fn make_json_request(&self, _url: &str, payload: Value, headers: &[(&str, &str)], params: &[(&str, &str)]) -> Result<Value, Error> {
        match self.next(Some(&payload), headers, params) {
            Reply::Json(v) => Ok(v),
            Reply::Text(_) => panic!("text reply scripted for a JSON request"),
            Reply::Fail(e) => Err(Error::Error(e.to_owned())),
        }
    }

    fn get_json(&self, _url: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        match self.next(None, &[], params) {
            Reply::Json(v) => Ok(v),
            Reply::Text(_) => panic!("text reply scripted for a JSON request"),
            Reply::Fail(e) => Err(Error::Error(e.to_owned())),
        }
    }

    fn get_text(&self, _url: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        match self.next(None, &[], params) {
            Reply::Text(t) => Ok(t),
            Reply::Json(v) => Ok(v.to_string()),
            Reply::Fail(e) => Err(Error::Error(e.to_owned())),
        }
    }
}
