use toml::Table;
use toml::Value;
use crate::options::{ModelOptions, Options};
use crate::error::AppError;
use crate::util::{parse_colors, ColorPair};

fn get_str_val<'a>(val: &'a Value, err: &'static str) -> Result<&'a str, AppError> {
    val.as_str().ok_or(AppError::ConfigParseError(err))
}

fn get_int_val(val: &Value, err: &'static str) -> Result<i64, AppError> {
    val.as_integer().ok_or(AppError::ConfigParseError(err))
}

fn get_positive_val(val: &Value, err: &'static str) -> Result<u64, AppError> {
    get_int_val(val, err)?
        .try_into()
        .ok()
        .filter(|v| *v > 0)
        .ok_or(AppError::ConfigParseError(err))
}

fn get_float_val(val: &Value, err: &'static str) -> Result<f64, AppError> {
    val.as_float().ok_or(AppError::ConfigParseError(err))
}

fn get_color_val(val: &Value, err: &'static str) -> Result<ColorPair, AppError> {
    let s = get_str_val(val, err)?;
    parse_colors(s).map_err(|_| AppError::ConfigParseError(err))
}

fn get_table<'a>(toml_config: &'a Table, name: &str, err: &'static str) -> Result<&'a Table, AppError> {
    toml_config.get(name)
        .ok_or(AppError::ConfigParseError(err))?
        .as_table()
        .ok_or(AppError::ConfigParseError("context must be a table"))
}

fn parse_context(ct: &Table, model: &mut ModelOptions) -> Result<(), AppError> {
    if let Some(val) = ct.get("model") {
        model.model.replace(get_str_val(val, "model must be a string value")?.to_owned());
    }
    if let Some(val) = ct.get("model_provider") {
        model.model_provider.replace(get_str_val(val, "model_provider must be a string value")?.to_owned());
    }
    if let Some(val) = ct.get("api_key") {
        model.api_key.replace(get_str_val(val, "api_key must be a string value")?.to_owned());
    }
    if let Some(val) = ct.get("api_url") {
        model.api_url.replace(get_str_val(val, "api_url must be a string value")?.to_owned());
    }
    if let Some(val) = ct.get("max_tokens") {
        model.max_tokens.replace(get_int_val(val, "max_tokens must be an integer value")?);
    }
    if let Some(val) = ct.get("temperature") {
        model.temperature.replace(get_float_val(val, "temperature must be a float value")?);
    }
    if let Some(val) = ct.get("top_p") {
        model.top_p.replace(get_float_val(val, "top_p must be a float value")?);
    }
    if let Some(val) = ct.get("top_k") {
        model.top_k.replace(get_int_val(val, "top_k must be an integer value")?);
    }
    if let Some(val) = ct.get("frequency_penalty") {
        model.frequency_penalty.replace(get_float_val(val, "frequency_penalty must be a float value")?);
    }
    if let Some(val) = ct.get("presence_penalty") {
        model.presence_penalty.replace(get_float_val(val, "presence_penalty must be a float value")?);
    }
    if let Some(val) = ct.get("stop_sequence") {
        model.stop_sequence.replace(get_str_val(val, "stop_sequence must be a string value")?.to_owned());
    }
    Ok(())
}

/// Fill `options` from the config file content.
///
/// `options.summary_context`, when already set, takes precedence over the file's `summary_context`.
pub fn parse_toml_config(content: &str, options: &mut Options) -> Result<(), AppError> {

    let toml_config: Table = toml::from_str(content)?;

    if let Some(default_context) = toml_config.get("default_context") {
        let context_name = get_str_val(default_context, "default_context must be a string value")?;
        let ct = get_table(&toml_config, context_name, "configuration for the default context is not specified")?;
        parse_context(ct, &mut options.model)?;
    }

    if options.summary_context.is_none() {
        if let Some(val) = toml_config.get("summary_context") {
            options.summary_context.replace(get_str_val(val, "summary_context must be a string value")?.to_owned());
        }
    }

    if let Some(context_name) = options.summary_context.as_deref() {
        let ct = get_table(&toml_config, context_name, "configuration for the summary context is not specified")?;
        let mut summary = ModelOptions::default();
        parse_context(ct, &mut summary)?;
        options.summary_model.replace(summary);
    }

    if let Some(val) = toml_config.get("mode") {
        options.mode.replace(get_str_val(val, "mode must be a string value")?.to_owned());
    }

    if let Some(agent) = toml_config.get("agent").and_then(|a| a.as_table()) {
        if let Some(val) = agent.get("max_iterations") {
            options.max_iterations.replace(get_positive_val(val, "max_iterations must be a positive integer value")?);
        }
        if let Some(val) = agent.get("engine") {
            options.engine.replace(get_str_val(val, "engine must be a string value")?.to_owned());
        }
        if let Some(val) = agent.get("weather_api_key") {
            options.weather_api_key.replace(get_str_val(val, "weather_api_key must be a string value")?.to_owned());
        }
    }

    if let Some(settings) = toml_config.get("settings").and_then(|s| s.as_table()) {
        if let Some(val) = settings.get("timeout") {
            options.timeout.replace(get_positive_val(val, "timeout must be a positive integer value")?);
        }
        if let Some(val) = settings.get("log_level") {
            options.log_level.replace(get_str_val(val, "log_level must be a string value")?.to_owned());
        }
        if let Some(val) = settings.get("thought_color") {
            options.thought_color = get_color_val(val, "thought_color value must have valid format, e.g. 'fg(255,0,123);bg(0,123,255)'.")?;
        }
        if let Some(val) = settings.get("tool_color") {
            options.tool_color = get_color_val(val, "tool_color value must have valid format, e.g. 'fg(255,0,123);bg(0,123,255)'.")?;
        }
        if let Some(val) = settings.get("answer_color") {
            options.answer_color = get_color_val(val, "answer_color value must have valid format, e.g. 'fg(255,0,123);bg(0,123,255)'.")?;
        }
    }

    Ok(())
}
