use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use super::domain::{NewTransaction, TransactionKind};

/// Rejections raised before a payload reaches the ledger. Messages are part of
/// the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid JSON payload")]
    MalformedPayload,
    #[error("Invalid type")]
    InvalidType,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Invalid category")]
    InvalidCategory,
    #[error("Invalid date")]
    InvalidDate,
    #[error("Invalid note")]
    InvalidNote,
}

/// Parses and validates a raw request body. Fields are checked in a fixed
/// order and the first failure is reported.
pub fn parse_new_transaction(body: &[u8]) -> Result<NewTransaction, ValidationError> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).map_err(|_| ValidationError::MalformedPayload)?
    };
    validate_payload(&payload)
}

pub fn validate_payload(payload: &Value) -> Result<NewTransaction, ValidationError> {
    let fields = payload
        .as_object()
        .ok_or(ValidationError::MalformedPayload)?;

    let kind = fields
        .get("type")
        .and_then(Value::as_str)
        .and_then(TransactionKind::parse)
        .ok_or(ValidationError::InvalidType)?;

    let amount = match fields.get("amount") {
        Some(Value::Number(number)) => positive_amount(number)?,
        _ => return Err(ValidationError::InvalidAmount),
    };

    let category = fields
        .get("category")
        .and_then(Value::as_str)
        .filter(|category| !category.trim().is_empty())
        .ok_or(ValidationError::InvalidCategory)?
        .to_string();

    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .ok_or(ValidationError::InvalidDate)?;

    let note = match fields.get("note") {
        None | Some(Value::Null) => None,
        Some(Value::String(note)) => Some(note.clone()).filter(|note| !note.is_empty()),
        Some(_) => return Err(ValidationError::InvalidNote),
    };

    Ok(NewTransaction {
        kind,
        amount,
        category,
        date,
        note,
    })
}

fn positive_amount(number: &Number) -> Result<Decimal, ValidationError> {
    match number.as_f64() {
        Some(value) if value.is_finite() && value > 0.0 => {}
        _ => return Err(ValidationError::InvalidAmount),
    }

    let literal = number.to_string();
    let amount = literal
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|_| ValidationError::InvalidAmount)?;

    if amount > Decimal::ZERO {
        Ok(amount.normalize())
    } else {
        Err(ValidationError::InvalidAmount)
    }
}
