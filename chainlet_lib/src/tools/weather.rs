use serde_json::Value;
use crate::error::Error;
use crate::request::Client;
use super::Tool;

const WEATHERSTACK_URL: &str = "https://api.weatherstack.com/current";

/// Current weather for a city from the weatherstack API.
pub struct Weather {
    client: Box<dyn Client>,
    access_key: String,
}

impl Weather {

    /// Create an instance, `access_key` is the weatherstack API key.
    pub fn new(client: Box<dyn Client>, access_key: String) -> Self {
        Weather {
            client,
            access_key,
        }
    }

    fn check_for_error(response: &Value) -> Result<(), Error> {
        if let Some(error) = response.get("error") {
            let info = error["info"].as_str()
                .or_else(|| error["type"].as_str())
                .unwrap_or("unknown error");
            return Err(Error::ToolError(format!("weatherstack: {info}")));
        }
        Ok(())
    }
}

impl Tool for Weather {
    fn name(&self) -> &str {
        "get_weather_data"
    }

    fn description(&self) -> &str {
        "This function fetches the current weather data for a given city. Input should be a city name."
    }

    fn invoke(&self, input: &str) -> Result<String, Error> {
        let city = input.trim().trim_matches(['"', '\'']);
        if city.is_empty() {
            return Err(Error::ToolError("city is empty".to_owned()));
        }

        let response = self.client.get_json(WEATHERSTACK_URL, &[
            ("access_key", self.access_key.as_str()),
            ("query", city),
        ])?;

        Self::check_for_error(&response)?;

        tracing::debug!(city, "weather lookup");

        Ok(response.to_string())
    }
}
