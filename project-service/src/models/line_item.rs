//! Line item model for project-service.
//!
//! Materials, services and AC units share one record shape. Records arrive from
//! data-entry forms and older stored projects, so the numeric fields are
//! coerced rather than validated: anything missing or non-numeric becomes zero
//! here, at the boundary, and the financial calculations can treat every field
//! as present.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Which collection of a project a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Material,
    Service,
    AcUnit,
}

/// One row of quoted-vs-actual cost attached to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    /// AC units are labelled by type (e.g. "1PK") instead of a name.
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub ac_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quotation_qty: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quotation_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub real_qty: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub real_price: Decimal,
}

impl LineItem {
    /// A material or service row.
    pub fn named(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            unit: Some(unit.into()),
            ..Self::default()
        }
    }

    /// An AC unit row.
    pub fn ac_unit(ac_type: impl Into<String>) -> Self {
        Self {
            ac_type: Some(ac_type.into()),
            ..Self::default()
        }
    }

    pub fn with_quotation(mut self, qty: Decimal, price: Decimal) -> Self {
        self.quotation_qty = qty;
        self.quotation_price = price;
        self
    }

    pub fn with_real(mut self, qty: Decimal, price: Decimal) -> Self {
        self.real_qty = qty;
        self.real_price = price;
        self
    }

    /// Display label: the AC type for AC units, otherwise the item name.
    pub fn label(&self) -> &str {
        self.ac_type
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Quoted cost of this line (`quotationPrice * quotationQty`).
    pub fn line_quotation(&self) -> Decimal {
        self.quotation_price.saturating_mul(self.quotation_qty)
    }

    /// Actual cost of this line (`realPrice * realQty`).
    pub fn line_real(&self) -> Decimal {
        self.real_price.saturating_mul(self.real_qty)
    }
}

/// Coerce a loosely-typed JSON value to a decimal, defaulting to zero.
///
/// Numbers and numeric strings (including exponent notation) are accepted.
/// Finite values beyond the decimal range saturate at `Decimal::MAX` or
/// `Decimal::MIN`, the same bound the line and total arithmetic stops at;
/// magnitudes too small to represent become zero. `null`, booleans, arrays,
/// objects, non-numeric strings and non-finite values all become zero.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Decimal {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or_else(|_| saturate_out_of_range(s))
}

fn saturate_out_of_range(s: &str) -> Decimal {
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() >= 1.0 => {
            if f.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }
        _ => Decimal::ZERO,
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_decimal(&value))
}

fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
