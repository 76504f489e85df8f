//! Parsing of CSS `transition` values into definition lists.
//!
//! Supports the `transition` shorthand and the four longhands
//! (`transition-property`, `transition-duration`, `transition-delay`,
//! `transition-timing-function`).
//!
//! ```
//! use rune_transition::css::parse_transition;
//!
//! let defs = parse_transition("opacity 250ms ease-in 100ms, all 1s").unwrap();
//! assert_eq!(defs.len(), 2);
//! assert_eq!(defs[1].property().as_str(), "all");
//! ```

use thiserror::Error;

use crate::definition::{PropertyName, TransitionDefinition};
use crate::easing::{EasingFunction, StepPosition};
use crate::time::TimeSpan;

/// Errors produced while parsing transition values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionParseError {
    #[error("empty transition value")]
    Empty,

    #[error("invalid time value `{0}`")]
    InvalidTime(String),

    #[error("transition duration `{0}` must not be negative")]
    NegativeDuration(String),

    #[error("unknown timing function `{0}`")]
    UnknownEasing(String),

    #[error("cubic-bezier x values must be in [0, 1] in `{0}`")]
    BezierOutOfRange(String),

    #[error("invalid step count in `{0}`")]
    InvalidStepCount(String),

    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
}

type Result<T> = std::result::Result<T, TransitionParseError>;

/// Raw longhand values, each a comma-separated list. Missing longhands take
/// their CSS initial values (`all`, `0s`, `0s`, `ease`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionLonghands<'a> {
    pub property: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub delay: Option<&'a str>,
    pub timing_function: Option<&'a str>,
}

/// Parse the `transition` shorthand.
///
/// Within each comma-separated item the first time is the duration and the
/// second the delay. A lone `none` yields no definitions.
pub fn parse_transition(input: &str) -> Result<Vec<TransitionDefinition>> {
    let items = split_list(input)?;
    if items.len() == 1 && is_none(items[0]) {
        return Ok(Vec::new());
    }
    items.into_iter().map(parse_item).collect()
}

/// Parse `transition-property`. `none` yields an empty list.
pub fn parse_transition_property(input: &str) -> Result<Vec<PropertyName>> {
    let items = split_list(input)?;
    if items.len() == 1 && is_none(items[0]) {
        return Ok(Vec::new());
    }
    items
        .into_iter()
        .map(|item| {
            let tokens = split_tokens(item);
            match tokens.as_slice() {
                [token] if is_identifier(token) && !is_none(token) => Ok(PropertyName::new(token)),
                [token, ..] => Err(TransitionParseError::UnexpectedToken(token.to_string())),
                [] => Err(TransitionParseError::Empty),
            }
        })
        .collect()
}

/// Parse a `transition-duration` or `transition-delay` list.
pub fn parse_time_list(input: &str) -> Result<Vec<TimeSpan>> {
    split_list(input)?
        .into_iter()
        .map(|item| parse_time(item.trim()))
        .collect()
}

/// Parse a `transition-timing-function` list.
pub fn parse_timing_function_list(input: &str) -> Result<Vec<EasingFunction>> {
    split_list(input)?
        .into_iter()
        .map(|item| {
            parse_easing(item.trim())?
                .ok_or_else(|| TransitionParseError::UnknownEasing(item.trim().to_string()))
        })
        .collect()
}

/// Combine longhand lists into definitions.
///
/// The property list decides the number of definitions; the other lists
/// repeat cyclically to match it.
pub fn parse_transition_longhands(
    longhands: TransitionLonghands<'_>,
) -> Result<Vec<TransitionDefinition>> {
    let properties = match longhands.property {
        Some(value) => parse_transition_property(value)?,
        None => vec![PropertyName::all()],
    };
    let durations = match longhands.duration {
        Some(value) => parse_time_list(value)?,
        None => vec![TimeSpan::ZERO],
    };
    let delays = match longhands.delay {
        Some(value) => parse_time_list(value)?,
        None => vec![TimeSpan::ZERO],
    };
    let easings = match longhands.timing_function {
        Some(value) => parse_timing_function_list(value)?,
        None => vec![EasingFunction::default()],
    };

    properties
        .into_iter()
        .enumerate()
        .map(|(i, property)| {
            let duration = durations[i % durations.len()];
            definition(property, duration, delays[i % delays.len()], easings[i % easings.len()])
                .map_err(|_| TransitionParseError::NegativeDuration(duration.to_string()))
        })
        .collect()
}

fn parse_item(item: &str) -> Result<TransitionDefinition> {
    let mut property = None;
    let mut duration = None;
    let mut delay = None;
    let mut easing = None;

    for token in split_tokens(item) {
        if is_time_token(token) {
            let time = parse_time(token)?;
            if duration.is_none() {
                if time.is_negative() {
                    return Err(TransitionParseError::NegativeDuration(token.to_string()));
                }
                duration = Some(time);
            } else if delay.is_none() {
                delay = Some(time);
            } else {
                return Err(TransitionParseError::UnexpectedToken(token.to_string()));
            }
        } else if let Some(parsed) = parse_easing(token)? {
            if easing.replace(parsed).is_some() {
                return Err(TransitionParseError::UnexpectedToken(token.to_string()));
            }
        } else if is_identifier(token) && !is_none(token) {
            if property.replace(PropertyName::new(token)).is_some() {
                return Err(TransitionParseError::UnexpectedToken(token.to_string()));
            }
        } else {
            return Err(TransitionParseError::UnexpectedToken(token.to_string()));
        }
    }

    let duration = duration.unwrap_or(TimeSpan::ZERO);
    definition(
        property.unwrap_or_else(PropertyName::all),
        duration,
        delay.unwrap_or(TimeSpan::ZERO),
        easing.unwrap_or_default(),
    )
    .map_err(|_| TransitionParseError::NegativeDuration(duration.to_string()))
}

fn definition(
    property: PropertyName,
    duration: TimeSpan,
    delay: TimeSpan,
    easing: EasingFunction,
) -> std::result::Result<TransitionDefinition, crate::definition::DefinitionError> {
    Ok(TransitionDefinition::try_new(property, duration)?
        .with_delay(delay)
        .with_easing(easing))
}

fn parse_time(token: &str) -> Result<TimeSpan> {
    let invalid = || TransitionParseError::InvalidTime(token.to_string());
    let (number, scale) = if let Some(number) = token.strip_suffix("ms") {
        (number, 1.0)
    } else if let Some(number) = token.strip_suffix('s') {
        (number, 1000.0)
    } else {
        return Err(invalid());
    };
    let value: f64 = number.parse().map_err(|_| invalid())?;
    TimeSpan::try_from_millis_f64(value * scale).ok_or_else(invalid)
}

/// `Ok(None)` when the token is not a timing function at all.
fn parse_easing(token: &str) -> Result<Option<EasingFunction>> {
    let lower = token.to_ascii_lowercase();
    let easing = match lower.as_str() {
        "linear" => EasingFunction::Linear,
        "ease" => EasingFunction::Ease,
        "ease-in" => EasingFunction::EaseIn,
        "ease-out" => EasingFunction::EaseOut,
        "ease-in-out" => EasingFunction::EaseInOut,
        "step-start" => EasingFunction::step_start(),
        "step-end" => EasingFunction::step_end(),
        _ => {
            let Some((name, args)) = split_function(&lower) else {
                return Ok(None);
            };
            match name {
                "cubic-bezier" => parse_cubic_bezier(token, args)?,
                "steps" => parse_steps(token, args)?,
                _ => return Err(TransitionParseError::UnknownEasing(token.to_string())),
            }
        }
    };
    Ok(Some(easing))
}

fn parse_cubic_bezier(token: &str, args: &str) -> Result<EasingFunction> {
    let values = args
        .split(',')
        .map(|arg| arg.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| TransitionParseError::UnknownEasing(token.to_string()))?;
    let &[x1, y1, x2, y2] = values.as_slice() else {
        return Err(TransitionParseError::UnknownEasing(token.to_string()));
    };
    if values.iter().any(|v| !v.is_finite()) {
        return Err(TransitionParseError::UnknownEasing(token.to_string()));
    }
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return Err(TransitionParseError::BezierOutOfRange(token.to_string()));
    }
    Ok(EasingFunction::cubic_bezier(x1, y1, x2, y2))
}

fn parse_steps(token: &str, args: &str) -> Result<EasingFunction> {
    let mut parts = args.split(',').map(str::trim);
    let count: u32 = parts
        .next()
        .and_then(|count| count.parse().ok())
        .ok_or_else(|| TransitionParseError::InvalidStepCount(token.to_string()))?;
    let position = match parts.next() {
        Some(keyword) => StepPosition::from_keyword(keyword)
            .ok_or_else(|| TransitionParseError::UnknownEasing(token.to_string()))?,
        None => StepPosition::default(),
    };
    if parts.next().is_some() {
        return Err(TransitionParseError::UnknownEasing(token.to_string()));
    }
    let minimum = if position == StepPosition::JumpNone { 2 } else { 1 };
    if count < minimum {
        return Err(TransitionParseError::InvalidStepCount(token.to_string()));
    }
    Ok(EasingFunction::steps(count, position))
}

/// Split `name(args)` into its parts.
fn split_function(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    let args = token[open + 1..].strip_suffix(')')?;
    Some((token[..open].trim(), args))
}

/// Split a comma-separated list, ignoring commas inside parentheses.
fn split_list(input: &str) -> Result<Vec<&str>> {
    if input.trim().is_empty() {
        return Err(TransitionParseError::Empty);
    }
    let items = split_top_level(input, |c| c == ',');
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(TransitionParseError::Empty);
    }
    Ok(items)
}

/// Split an item on whitespace, keeping functional notation together.
fn split_tokens(item: &str) -> Vec<&str> {
    split_top_level(item, char::is_whitespace)
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect()
}

fn split_top_level(input: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_separator(c) => {
                pieces.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&input[start..]);
    pieces
}

fn is_time_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '.' => true,
        Some('+') | Some('-') => chars
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    let first_ok = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '-' || c == '_',
        None => false,
    };
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_none(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: i64) -> TimeSpan {
        TimeSpan::from_millis(millis)
    }

    #[test]
    fn test_shorthand_single() {
        let defs = parse_transition("opacity 250ms ease-in 100ms").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].property().as_str(), "opacity");
        assert_eq!(defs[0].duration(), ms(250));
        assert_eq!(defs[0].delay(), ms(100));
        assert_eq!(defs[0].easing(), EasingFunction::EaseIn);
    }

    #[test]
    fn test_shorthand_list_and_defaults() {
        let defs = parse_transition("Opacity 1s, 0.5s, width").unwrap();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].property().as_str(), "opacity");
        assert_eq!(defs[0].duration(), ms(1000));
        assert!(defs[1].property().is_all());
        assert_eq!(defs[1].duration(), ms(500));
        assert_eq!(defs[2].duration(), TimeSpan::ZERO);
        assert_eq!(defs[2].easing(), EasingFunction::Ease);
    }

    #[test]
    fn test_shorthand_order_independent() {
        let defs = parse_transition("ease-out 250ms opacity 100ms").unwrap();
        assert_eq!(defs[0].property().as_str(), "opacity");
        assert_eq!(defs[0].duration(), ms(250));
        assert_eq!(defs[0].delay(), ms(100));
        assert_eq!(defs[0].easing(), EasingFunction::EaseOut);
    }

    #[test]
    fn test_negative_delay() {
        let defs = parse_transition("opacity 1s -0.25s").unwrap();
        assert_eq!(defs[0].delay(), ms(-250));
    }

    #[test]
    fn test_functional_easings() {
        let defs =
            parse_transition("opacity 1s cubic-bezier(0.1, 0.7, 1.0, 0.1), width 2s steps(4, jump-start)")
                .unwrap();
        assert_eq!(
            defs[0].easing(),
            EasingFunction::CubicBezier { x1: 0.1, y1: 0.7, x2: 1.0, y2: 0.1 }
        );
        assert_eq!(
            defs[1].easing(),
            EasingFunction::Steps { count: 4, position: StepPosition::JumpStart }
        );

        let defs = parse_transition("top 1s steps(3)").unwrap();
        assert_eq!(
            defs[0].easing(),
            EasingFunction::Steps { count: 3, position: StepPosition::JumpEnd }
        );
    }

    #[test]
    fn test_none() {
        assert!(parse_transition("none").unwrap().is_empty());
        assert!(parse_transition_property("NONE").unwrap().is_empty());
        assert!(matches!(
            parse_transition("none, opacity 1s"),
            Err(TransitionParseError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_transition("  "), Err(TransitionParseError::Empty));
        assert_eq!(parse_transition("opacity 1s,"), Err(TransitionParseError::Empty));
        assert!(matches!(
            parse_transition("opacity 1x"),
            Err(TransitionParseError::InvalidTime(_))
        ));
        assert!(matches!(
            parse_transition("opacity -1s"),
            Err(TransitionParseError::NegativeDuration(_))
        ));
        assert!(matches!(
            parse_transition("opacity 1s bounce(2)"),
            Err(TransitionParseError::UnknownEasing(_))
        ));
        assert!(matches!(
            parse_transition("opacity 1s cubic-bezier(1.5, 0, 0, 1)"),
            Err(TransitionParseError::BezierOutOfRange(_))
        ));
        assert!(matches!(
            parse_transition("opacity 1s steps(0)"),
            Err(TransitionParseError::InvalidStepCount(_))
        ));
        assert!(matches!(
            parse_transition("opacity 1s steps(1, jump-none)"),
            Err(TransitionParseError::InvalidStepCount(_))
        ));
        assert!(matches!(
            parse_transition("opacity width 1s"),
            Err(TransitionParseError::UnexpectedToken(_))
        ));
        assert!(matches!(
            parse_transition("opacity 1s 2s 3s"),
            Err(TransitionParseError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn test_out_of_range_times_rejected() {
        for input in [
            "opacity 1e10s linear",
            "opacity 1s linear -1e10s",
            "opacity 1e300ms",
        ] {
            assert!(
                matches!(parse_transition(input), Err(TransitionParseError::InvalidTime(_))),
                "{input} should be rejected"
            );
        }
        assert!(matches!(
            parse_time_list("1s, 9e9s"),
            Err(TransitionParseError::InvalidTime(_))
        ));

        // close to the top of the range still fits
        let defs = parse_transition("opacity 9e9s").unwrap();
        assert_eq!(defs[0].duration(), TimeSpan::from_secs_f64(9e9));
    }

    #[test]
    fn test_longhands_repeat_cyclically() {
        let defs = parse_transition_longhands(TransitionLonghands {
            property: Some("opacity, width, height"),
            duration: Some("1s, 2s"),
            delay: None,
            timing_function: Some("linear"),
        })
        .unwrap();

        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].duration(), ms(1000));
        assert_eq!(defs[1].duration(), ms(2000));
        assert_eq!(defs[2].duration(), ms(1000));
        assert!(defs.iter().all(|d| d.delay() == TimeSpan::ZERO));
        assert!(defs.iter().all(|d| d.easing() == EasingFunction::Linear));
    }

    #[test]
    fn test_longhands_defaults() {
        let defs = parse_transition_longhands(TransitionLonghands {
            duration: Some("300ms"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(defs.len(), 1);
        assert!(defs[0].property().is_all());
        assert_eq!(defs[0].duration(), ms(300));
    }

    #[test]
    fn test_longhands_reject_negative_duration() {
        let result = parse_transition_longhands(TransitionLonghands {
            property: Some("opacity"),
            duration: Some("-1s"),
            ..Default::default()
        });
        assert!(matches!(result, Err(TransitionParseError::NegativeDuration(_))));
    }

    #[test]
    fn test_time_lists() {
        assert_eq!(
            parse_time_list("1s, 250ms, -.5s").unwrap(),
            vec![ms(1000), ms(250), ms(-500)]
        );
        assert!(parse_time_list("1").is_err());
        assert_eq!(
            parse_timing_function_list("ease, step-end").unwrap(),
            vec![EasingFunction::Ease, EasingFunction::step_end()]
        );
        assert!(parse_timing_function_list("wobble").is_err());
    }
}
