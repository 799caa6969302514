//! Model-name normalization and primary-key derivation.
//!
//! Callers name models case-insensitively (`"user"`); tables are stored
//! capitalized (`User`) and each table's key column is the camel-cased model
//! name plus [`PRIMARY_KEY_SUFFIX`] (`userId`).

use crate::error::AdapterResult;
use crate::ident::Ident;

/// Suffix appended to the camel-cased model name to form its key column.
pub const PRIMARY_KEY_SUFFIX: &str = "Id";

/// Field name callers use to refer to a model's primary key.
pub const ID_FIELD: &str = "id";

/// Capitalize a model name if it starts with a lower-case character.
///
/// Idempotent: `normalize_model_name(&normalize_model_name(m)) == normalize_model_name(m)`.
pub fn normalize_model_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => raw.to_string(),
    }
}

/// Derive the primary-key column from a normalized model name.
pub fn primary_key_for(normalized: &str) -> String {
    let mut chars = normalized.chars();
    let mut out = String::with_capacity(normalized.len() + PRIMARY_KEY_SUFFIX.len());
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
        out.extend(chars);
    }
    out.push_str(PRIMARY_KEY_SUFFIX);
    out
}

/// A normalized model together with its derived primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    table: Ident,
    primary_key: Ident,
}

impl ModelName {
    /// Normalize `raw` and derive its primary key.
    pub fn new(raw: &str) -> AdapterResult<Self> {
        let normalized = normalize_model_name(raw);
        let primary_key = primary_key_for(&normalized);
        Ok(Self {
            table: Ident::parse(&normalized)?,
            primary_key: Ident::parse(&primary_key)?,
        })
    }

    /// The stored table identifier (e.g. `User`).
    pub fn table(&self) -> &Ident {
        &self.table
    }

    /// The primary-key column identifier (e.g. `userId`).
    pub fn primary_key(&self) -> &Ident {
        &self.primary_key
    }

    pub fn as_str(&self) -> &str {
        self.table.as_str()
    }

    /// Resolve a caller-facing field name to a column, mapping `id` to the primary key.
    pub fn column(&self, field: &str) -> AdapterResult<Ident> {
        if field == ID_FIELD {
            Ok(self.primary_key.clone())
        } else {
            Ident::parse(field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_lower_case_models() {
        assert_eq!(normalize_model_name("user"), "User");
        assert_eq!(normalize_model_name("organization"), "Organization");
        assert_eq!(normalize_model_name("Organization"), "Organization");
        assert_eq!(normalize_model_name("_hidden"), "_hidden");
        assert_eq!(normalize_model_name(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for m in ["user", "User", "session", "twoFactor", "ößx", "_x", "9lives", ""] {
            let once = normalize_model_name(m);
            assert_eq!(normalize_model_name(&once), once, "model {m:?}");
        }
    }

    #[test]
    fn derives_primary_keys() {
        assert_eq!(primary_key_for("User"), "userId");
        assert_eq!(primary_key_for("Organization"), "organizationId");
        assert_eq!(primary_key_for("TwoFactor"), "twoFactorId");
    }

    #[test]
    fn model_name_maps_id_field() {
        let model = ModelName::new("session").unwrap();
        assert_eq!(model.as_str(), "Session");
        assert_eq!(model.primary_key().as_str(), "sessionId");
        assert_eq!(model.column("id").unwrap().as_str(), "sessionId");
        assert_eq!(model.column("token").unwrap().as_str(), "token");
    }

    #[test]
    fn model_name_rejects_bad_identifiers() {
        assert!(ModelName::new("user table").is_err());
        assert!(ModelName::new("").is_err());
    }
}
