use serde_json::{json, Number, Value};
use crate::{error::Error, tools::ParamSpec};
use super::{Argument, Message, Role};

/// Role name used by chat completion style APIs.
pub fn role_to_llm(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Model => "assistant",
        Role::User => "user",
    }
}

/// Get logical role by model role.
pub fn llm_to_role(role: &str) -> Result<Role, Error> {
    match role {
        "system" => Ok(Role::System),
        "model" | "assistant" => Ok(Role::Model),
        "user" => Ok(Role::User),
        _ => Err(Error::LLMResponseError("LLM returned message with an unknown role."))
    }
}

/// Interpret value as str
#[macro_export(local_inner_macros)]
macro_rules! val_as_str {
    ($val:expr, $element:literal) => {
        $val
            .as_str()
            .ok_or(Error::LLMResponseError(std::concat!("can't extract ", $element, " from LLM API response.")))?
    }
}

pub fn set_i64_param(payload: &mut Value, key: &str, val: &Option<i64>) {
    if let Some(v) = val {
        payload[key] = Value::Number(Number::from(*v));
    }
}

pub fn set_f64_param(payload: &mut Value, key: &str, val: &Option<f64>) {
    if let Some(n) = val.and_then(Number::from_f64) {
        payload[key] = Value::Number(n);
    }
}

/// JSON schema of tool parameters.
pub fn tool_params_to_value(params: &[ParamSpec]) -> Value {
    let mut required = Vec::with_capacity(params.len());

    let mut result = json!({
        "type": "object",
        "properties": {},
    });

    for param in params {
        result["properties"][&param.name] = json!({
            "type": param.data_type,
            "description": param.description,
        });
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    result["required"] = Value::Array(required);
    result["additionalProperties"] = Value::Bool(false);

    result
}

/// Split JSON object of call arguments into named arguments.
pub fn split_arguments(args: &Value) -> Result<Vec<Argument>, Error> {
    let obj = args
        .as_object()
        .ok_or(Error::LLMResponseError("can't enumerate arguments."))?;

    Ok(obj.iter()
        .map(|(k, v)| Argument { name: k.clone(), value: v.clone() })
        .collect())
}

/// Text content of model messages, in order.
pub fn collect_text(messages: &[Message]) -> Option<String> {
    let mut text: Option<String> = None;
    for message in messages {
        if let Message::Text(txt) = message {
            if txt.role == Role::Model {
                text.get_or_insert_with(String::new).push_str(&txt.content);
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ParamType;

    fn param(name: &str, data_type: ParamType, required: bool) -> ParamSpec {
        ParamSpec { name: name.to_owned(), description: format!("{name} value"), data_type, required }
    }

    #[test]
    fn test_tool_params_to_value() {
        let params = [
            param("city", ParamType::String, true),
            param("days", ParamType::Integer, true),
            param("threshold", ParamType::Number, false),
            param("metric", ParamType::Boolean, false),
        ];

        assert_eq!(tool_params_to_value(&params), json!({
            "type": "object",
            "properties": {
                "city": { "type": "string", "description": "city value" },
                "days": { "type": "integer", "description": "days value" },
                "threshold": { "type": "number", "description": "threshold value" },
                "metric": { "type": "boolean", "description": "metric value" }
            },
            "required": ["city", "days"],
            "additionalProperties": false
        }));
    }

    #[test]
    fn test_split_arguments() {
        let args = split_arguments(&json!({ "input": "Delhi" })).expect("arguments");
        assert_eq!(args, vec![Argument { name: "input".to_owned(), value: json!("Delhi") }]);

        assert!(matches!(split_arguments(&json!("Delhi")), Err(Error::LLMResponseError(_))));
    }
}
