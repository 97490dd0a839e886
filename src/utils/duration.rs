use std::time::Duration;

/// 解析时间间隔字符串，支持多种格式：
/// - 纯数字（秒）：3600
/// - 单个单位：30s, 15m, 24h, 7d, 2w
/// - 组合格式：1d12h, 1h30m
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("duration cannot be empty".to_string());
    }

    if let Ok(secs) = input.parse::<u64>() {
        if secs == 0 {
            return Err("duration cannot be zero".to_string());
        }
        return Ok(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut remaining = input;

    while !remaining.is_empty() {
        let digits = remaining
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(remaining.len());
        if digits == 0 {
            return Err(format!("invalid duration: '{}'", input));
        }
        let num: u64 = remaining[..digits]
            .parse()
            .map_err(|_| format!("invalid number in duration: '{}'", input))?;
        remaining = &remaining[digits..];

        let unit_len = remaining
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(remaining.len());
        if unit_len == 0 {
            return Err(format!("missing unit after '{}' in '{}'", num, input));
        }
        let unit = &remaining[..unit_len];
        remaining = &remaining[unit_len..];

        let factor = match unit.to_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => 1,
            "m" | "min" | "minute" | "minutes" => 60,
            "h" | "hour" | "hours" => 3600,
            "d" | "day" | "days" => 86_400,
            "w" | "week" | "weeks" => 604_800,
            _ => return Err(format!("unsupported duration unit: '{}'", unit)),
        };

        total = num
            .checked_mul(factor)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| format!("duration out of range: '{}'", input))?;
    }

    if total == 0 {
        return Err("duration cannot be zero".to_string());
    }

    Ok(Duration::from_secs(total))
}

/// Render a whole-second duration in the compact form `parse_duration` accepts.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (factor, unit) in [(86_400, "d"), (3600, "h"), (60, "m"), (1, "s")] {
        if secs >= factor {
            out.push_str(&format!("{}{}", secs / factor, unit));
            secs %= factor;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(1_209_600));
    }

    #[test]
    fn test_parse_combined_and_bare() {
        assert_eq!(parse_duration("1d12h").unwrap(), Duration::from_secs(129_600));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("3600").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_invalid_format() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1x").is_err());
        assert!(parse_duration("10").is_ok());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let d = Duration::from_secs(93_784);
        assert_eq!(format_duration(d), "1d2h3m4s");
        assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
    }
}
