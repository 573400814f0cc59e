use crate::AppError;

/// Foreground and background colors.
pub type ColorPair = (Option<[u8;3]>, Option<[u8;3]>);

/// Parse foreground and background colors from a string like `fg(255,0,123);bg(0,123,255)`.
pub fn parse_colors(s: &str) -> Result<ColorPair, AppError> {
    let s = s.trim().trim_matches(['\'', '"']);

    s.split(';').try_fold((None, None), |(fg, bg), part| {
        let part = part.trim();
        if let Some(rgb) = part.strip_prefix("fg") {
            Ok((Some(parse_color(rgb)?), bg))
        } else if let Some(rgb) = part.strip_prefix("bg") {
            Ok((fg, Some(parse_color(rgb)?)))
        } else {
            Err(AppError::ColorParseError)
        }
    })
}

fn parse_color(s: &str) -> Result<[u8;3], AppError> {
    let inner = s.trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or(AppError::ColorParseError)?;

    let rgb = inner.split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|_| AppError::ColorParseError))
        .collect::<Result<Vec<u8>, _>>()?;

    rgb.try_into().map_err(|_| AppError::ColorParseError)
}

/// Parse a positive integer option value.
pub fn parse_positive(s: &str, err: &'static str) -> Result<u64, AppError> {
    match s.trim().parse::<u64>() {
        Ok(val) if val > 0 => Ok(val),
        _ => Err(AppError::InvalidArgError(err)),
    }
}
