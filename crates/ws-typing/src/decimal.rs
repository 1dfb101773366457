//! Arbitrary-precision decimal model
//!
//! A [`Decimal`] is both a type descriptor (scale and precision, as parsed
//! from `NUMERIC(p, s)`) and, when decoded from a CDC event, the value
//! itself. Which warehouse column type it maps to is a pure function of
//! scale and precision.

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::Value;
use std::str::FromStr;
use ws_core::Dialect;

/// Precision sentinel meaning "unbounded / variable".
pub const PRECISION_NOT_SPECIFIED: i32 = -1;

/// Snowflake and Redshift have no fixed-precision NUMERIC wider than 38
/// digits; anything wider is written as a string column.
pub const MAX_PRECISION_BEFORE_STRING: u32 = 38;

/// Numeric value plus scale and precision metadata.
///
/// `precision` is `None` when unbounded. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    scale: u32,
    precision: Option<u32>,
    value: Option<BigDecimal>,
}

impl Decimal {
    /// Create type metadata for `NUMERIC(precision, scale)`.
    ///
    /// `precision` of `None` or [`PRECISION_NOT_SPECIFIED`] means unbounded.
    /// A declared precision below the scale (e.g. Postgres accepts
    /// `NUMERIC(5, 6)`, which is really `NUMERIC(7, 6)`) is corrected to
    /// `scale + 1` to account for the leading digit.
    pub fn new(scale: u32, precision: Option<i32>) -> Self {
        let precision = match precision {
            None | Some(PRECISION_NOT_SPECIFIED) => None,
            Some(p) if p < 0 || (p as u32) < scale => Some(scale.saturating_add(1)),
            Some(p) => Some(p as u32),
        };

        Self {
            scale,
            precision,
            value: None,
        }
    }

    /// Attach a decoded value.
    pub fn with_value(mut self, value: BigDecimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Number of fractional digits
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Total significant digits, `None` when unbounded
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// The decoded value, if this decimal carries one
    pub fn value(&self) -> Option<&BigDecimal> {
        self.value.as_ref()
    }

    /// Whether values of this type must be loaded as strings because no
    /// fixed-precision column can hold them without truncation.
    pub fn emits_as_string(&self) -> bool {
        match self.precision {
            Some(p) => p > MAX_PRECISION_BEFORE_STRING,
            None => true,
        }
    }

    /// Render the value with exactly `scale` fractional digits
    /// (half-even rounding), in plain (non-scientific) notation.
    pub fn render(&self) -> Option<String> {
        self.value.as_ref().map(|v| {
            v.with_scale_round(i64::from(self.scale), RoundingMode::HalfEven)
                .to_plain_string()
        })
    }

    /// Render a raw row value at this type's scale for loading.
    ///
    /// Numbers and numeric strings become a plain-notation string; anything
    /// else, including text that does not parse, is returned unchanged.
    pub fn stage_value(&self, value: Value) -> Value {
        let parsed = match &value {
            Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
            Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
            _ => None,
        };
        match parsed {
            Some(parsed) => match self.clone().with_value(parsed).render() {
                Some(rendered) => Value::String(rendered),
                None => value,
            },
            None => value,
        }
    }

    /// BigQuery NUMERIC: `0 <= s <= 9` and `max(1, s) <= p <= s + 29`.
    pub fn is_numeric(&self) -> bool {
        let Some(precision) = self.precision else {
            return false;
        };
        if self.scale > 9 {
            return false;
        }
        (self.scale.max(1)..=self.scale + 29).contains(&precision)
    }

    /// BigQuery BIGNUMERIC: `0 <= s <= 38` and `max(1, s) <= p <= s + 38`.
    pub fn is_big_numeric(&self) -> bool {
        let Some(precision) = self.precision else {
            return false;
        };
        if self.scale > 38 {
            return false;
        }
        (self.scale.max(1)..=self.scale + 38).contains(&precision)
    }

    /// Snowflake column type: `NUMERIC(p, s)` within 38 digits, else `STRING`.
    pub fn snowflake_kind(&self) -> String {
        self.bounded_numeric().unwrap_or_else(|| "STRING".to_string())
    }

    /// Redshift column type: `NUMERIC(p, s)` within 38 digits, else `TEXT`.
    pub fn redshift_kind(&self) -> String {
        self.bounded_numeric().unwrap_or_else(|| "TEXT".to_string())
    }

    /// BigQuery column type: `NUMERIC(p, s)`, then `BIGNUMERIC(p, s)`, else `STRING`.
    pub fn bigquery_kind(&self) -> String {
        match self.precision {
            Some(p) if self.is_numeric() => format!("NUMERIC({}, {})", p, self.scale),
            Some(p) if self.is_big_numeric() => format!("BIGNUMERIC({}, {})", p, self.scale),
            _ => "STRING".to_string(),
        }
    }

    /// Column type for the given destination.
    pub fn kind(&self, dialect: Dialect) -> String {
        match dialect {
            Dialect::Snowflake => self.snowflake_kind(),
            Dialect::BigQuery => self.bigquery_kind(),
            Dialect::Redshift => self.redshift_kind(),
        }
    }

    fn bounded_numeric(&self) -> Option<String> {
        if self.emits_as_string() {
            return None;
        }
        self.precision
            .map(|p| format!("NUMERIC({}, {})", p, self.scale))
    }
}

#[cfg(test)]
#[path = "decimal_test.rs"]
mod tests;
