//! Serializable operation outcome
//!
//! `Outcome` carries the same information as a `Result`, but serializes to
//! the tagged shape `{"ok": true, "value": ...}` / `{"ok": false, "error": ...}`
//! so that per-item results can be reported to other tools.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

use crate::error::Error;

/// Outcome of an operation that has already concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E = Error> {
    Ok(T),
    Err(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// The value, if the operation succeeded
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    /// The error, if the operation failed
    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }
}

/// Errors are serialized through their `Display` output
impl<T, E> Serialize for Outcome<T, E>
where
    T: Serialize,
    E: fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Ok(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Outcome::Err(error) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", &error.to_string())?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_exposes_only_value() {
        let outcome: Outcome<u32, String> = Outcome::Ok(7);
        assert!(outcome.is_ok());
        assert_eq!(outcome.value(), Some(&7));
        assert_eq!(outcome.error(), None);
    }

    #[test]
    fn test_err_exposes_only_error() {
        let outcome: Outcome<u32, String> = Outcome::Err("boom".to_string());
        assert!(outcome.is_err());
        assert_eq!(outcome.value(), None);
        assert_eq!(outcome.error().map(String::as_str), Some("boom"));
    }

    #[test]
    fn test_from_result() {
        let ok: Outcome<&str, String> = Ok("fine").into();
        assert_eq!(ok.into_result(), Ok("fine"));

        let err: Outcome<&str, String> = Err("bad".to_string()).into();
        assert_eq!(err.into_result(), Err("bad".to_string()));
    }

    #[test]
    fn test_serialize_tagged_shape() {
        let ok: Outcome<Vec<u8>, String> = Outcome::Ok(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "ok": true, "value": [1, 2] })
        );

        let err: Outcome<Vec<u8>> = Outcome::Err(Error::InvalidSlug("a b".to_string()));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["ok"], serde_json::json!(false));
        assert!(json.get("value").is_none());
        assert!(json["error"].as_str().unwrap().contains("a b"));
    }
}
