//! Längen-Eingabe: Zahl mit optionaler Einheit (z.B. "2m", "150cm", "3.5\"").
//!
//! Intern wird in Metern gerechnet. Eine Zahl ohne Einheit nutzt die
//! Standard-Einheit des Parsers.

use super::error::{DrawError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LENGTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^([+-]?(?:\d+(?:[.,]\d*)?|[.,]\d+))\s*(mm|cm|km|m|in|ft|"|')?$"#)
        .expect("Längen-Pattern ist ein gültiger Regex")
});

/// Unterstützte Längeneinheiten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    #[default]
    Meter,
    Kilometer,
    Inch,
    Foot,
}

impl LengthUnit {
    /// Umrechnungsfaktor in Meter.
    pub fn to_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Meter => 1.0,
            LengthUnit::Kilometer => 1000.0,
            LengthUnit::Inch => 0.0254,
            LengthUnit::Foot => 0.3048,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "mm" => Some(LengthUnit::Millimeter),
            "cm" => Some(LengthUnit::Centimeter),
            "m" => Some(LengthUnit::Meter),
            "km" => Some(LengthUnit::Kilometer),
            "in" | "\"" => Some(LengthUnit::Inch),
            "ft" | "'" => Some(LengthUnit::Foot),
            _ => None,
        }
    }
}

/// Wandelt Eingabetext in eine Länge (Meter) um.
pub trait LengthParser {
    fn parse_length(&self, text: &str) -> Result<f64>;
}

/// Standard-Parser: Dezimalzahl (Punkt oder Komma) mit optionaler Einheit.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricLengthParser {
    pub default_unit: LengthUnit,
}

impl MetricLengthParser {
    pub fn new(default_unit: LengthUnit) -> Self {
        Self { default_unit }
    }
}

impl LengthParser for MetricLengthParser {
    fn parse_length(&self, text: &str) -> Result<f64> {
        let trimmed = text.trim();
        let caps = LENGTH_PATTERN
            .captures(trimmed)
            .ok_or_else(|| DrawError::Parse(format!("'{trimmed}' ist keine gültige Länge")))?;

        let number = caps[1].replace(',', ".");
        let value: f64 = number
            .parse()
            .map_err(|e| DrawError::Parse(format!("'{trimmed}': {e}")))?;

        let unit = match caps.get(2) {
            Some(m) => LengthUnit::from_suffix(m.as_str()).ok_or_else(|| {
                DrawError::Parse(format!("Unbekannte Einheit '{}'", m.as_str()))
            })?,
            None => self.default_unit,
        };
        Ok(value * unit.to_meters())
    }
}

/// Getippter Wert im Eingabefeld.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedValue {
    /// Segmentlänge in Metern
    Length(f64),
    /// Bulge-Betrag in Metern (Präfix `b` oder `~`)
    Bulge(f64),
}

/// Parst eine Eingabe als Länge oder, mit Präfix `b`/`~`, als Bulge.
///
/// Werte ≤ 0 werden abgelehnt.
pub fn parse_typed_value(parser: &dyn LengthParser, text: &str) -> Result<TypedValue> {
    let trimmed = text.trim();
    let (is_bulge, body) = match trimmed.chars().next() {
        Some('b') | Some('B') | Some('~') => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if body.trim().is_empty() {
        return Err(DrawError::Parse("Leere Eingabe".into()));
    }

    let value = parser.parse_length(body)?;
    if !(value > 0.0) || !value.is_finite() {
        return Err(DrawError::Parse(format!(
            "Wert muss größer als 0 sein, erhalten: {trimmed}"
        )));
    }

    Ok(if is_bulge {
        TypedValue::Bulge(value)
    } else {
        TypedValue::Length(value)
    })
}

/// Zeichen, die im Eingabepuffer akzeptiert werden.
pub fn is_length_input_char(ch: char) -> bool {
    ch.is_ascii_digit()
        || matches!(
            ch,
            '.' | ',' | '+' | '-' | '"' | '\'' | 'm' | 'c' | 'k' | 'i' | 'n' | 'f' | 't' | 'b' | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(text: &str) -> Result<f64> {
        MetricLengthParser::default().parse_length(text)
    }

    #[test]
    fn test_bare_number_uses_meters() {
        assert_relative_eq!(parse("2").expect("Länge erwartet"), 2.0);
        assert_relative_eq!(parse(" 2.5 ").expect("Länge erwartet"), 2.5);
        assert_relative_eq!(parse("0,75").expect("Länge erwartet"), 0.75);
    }

    #[test]
    fn test_unit_suffixes() {
        assert_relative_eq!(parse("2m").expect("Länge erwartet"), 2.0);
        assert_relative_eq!(parse("150cm").expect("Länge erwartet"), 1.5, epsilon = 1e-12);
        assert_relative_eq!(parse("250 mm").expect("Länge erwartet"), 0.25, epsilon = 1e-12);
        assert_relative_eq!(parse("3.5\"").expect("Länge erwartet"), 0.0889, epsilon = 1e-12);
        assert_relative_eq!(parse("10ft").expect("Länge erwartet"), 3.048, epsilon = 1e-12);
        assert_relative_eq!(parse("1KM").expect("Länge erwartet"), 1000.0);
    }

    #[test]
    fn test_default_unit_is_configurable() {
        let parser = MetricLengthParser::new(LengthUnit::Centimeter);
        assert_relative_eq!(parser.parse_length("40").expect("Länge erwartet"), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        for text in ["", "abc", "2x", "1..2m", "m"] {
            assert!(matches!(parse(text), Err(DrawError::Parse(_))), "{text}");
        }
    }

    #[test]
    fn test_typed_value_bulge_prefix() {
        let parser = MetricLengthParser::default();
        assert_eq!(
            parse_typed_value(&parser, "b0.5").expect("Wert erwartet"),
            TypedValue::Bulge(0.5)
        );
        assert_eq!(
            parse_typed_value(&parser, "~20cm").expect("Wert erwartet"),
            TypedValue::Bulge(0.2)
        );
        assert_eq!(
            parse_typed_value(&parser, "2m").expect("Wert erwartet"),
            TypedValue::Length(2.0)
        );
    }

    #[test]
    fn test_typed_value_rejects_non_positive() {
        let parser = MetricLengthParser::default();
        for text in ["0", "-2m", "b0", "~", "b"] {
            assert!(
                matches!(parse_typed_value(&parser, text), Err(DrawError::Parse(_))),
                "{text}"
            );
        }
    }
}
