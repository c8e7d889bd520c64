//! Overtime record model and the payloads that carry it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::validation::{
    validate_amount, validate_entry, validate_month, validate_user_id, validate_year,
};

/// One worked overtime slot inside a monthly record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeEntry {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub overtime_hours: f64,
    pub overtime_pay: f64,
}

/// Natural key of a monthly record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub user_id: String,
    pub year: i32,
    pub month: i32,
}

impl RecordKey {
    pub fn new(user_id: impl Into<String>, year: i32, month: i32) -> Self {
        Self {
            user_id: user_id.into(),
            year,
            month,
        }
    }

    /// Build a key from raw query values.
    ///
    /// Returns `None` when the year or month is not an integer, so a
    /// malformed lookup behaves like a lookup that matched nothing.
    pub fn parse(user_id: &str, year: &str, month: &str) -> Option<Self> {
        let year = year.trim().parse().ok()?;
        let month = month.trim().parse().ok()?;
        Some(Self::new(user_id, year, month))
    }
}

/// Monthly overtime record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeRecord {
    pub id: Uuid,
    pub user_id: String,
    pub year: i32,
    pub month: i32,
    pub entries: Vec<OvertimeEntry>,
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OvertimeRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.user_id.clone(), self.year, self.month)
    }

    /// Turn a stored record into a draft that replaces its entries and
    /// salary snapshot while keeping its identity.
    pub fn revise(self, entries: Vec<OvertimeEntry>, salary: f64) -> RecordDraft {
        RecordDraft {
            id: Some(self.id),
            key: RecordKey::new(self.user_id, self.year, self.month),
            entries,
            salary,
        }
    }
}

/// Record content handed to a store for persisting.
///
/// A draft without `id` is inserted; a draft with `id` overwrites the stored
/// record carrying that identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub id: Option<Uuid>,
    pub key: RecordKey,
    pub entries: Vec<OvertimeEntry>,
    pub salary: f64,
}

impl RecordDraft {
    pub fn new(key: RecordKey, entries: Vec<OvertimeEntry>, salary: f64) -> Self {
        Self {
            id: None,
            key,
            entries,
            salary,
        }
    }
}

/// Query parameters for record lookup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    pub user_id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl RecordQuery {
    pub fn key(&self) -> Option<RecordKey> {
        RecordKey::parse(
            self.user_id.as_deref()?,
            self.year.as_deref()?,
            self.month.as_deref()?,
        )
    }
}

/// Request for saving a monthly record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecordRequest {
    pub user_id: String,
    #[serde(deserialize_with = "whole_number_or_numeric_string")]
    pub year: i32,
    #[serde(deserialize_with = "whole_number_or_numeric_string")]
    pub month: i32,
    /// Older clients send the list as `data`
    #[serde(default, alias = "data")]
    pub entries: Vec<OvertimeEntry>,
    #[serde(default)]
    pub salary: f64,
}

impl SaveRecordRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_user_id(&self.user_id)?;
        validate_year(self.year)?;
        validate_month(self.month)?;
        validate_amount("salary", self.salary)?;
        for (index, entry) in self.entries.iter().enumerate() {
            validate_entry(index, entry)?;
        }
        Ok(())
    }

    pub fn into_parts(self) -> (RecordKey, Vec<OvertimeEntry>, f64) {
        (
            RecordKey::new(self.user_id, self.year, self.month),
            self.entries,
            self.salary,
        )
    }
}

/// Response for save operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecordResponse {
    pub success: bool,
    pub message: String,
}

impl SaveRecordResponse {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: "Data saved successfully".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn whole_number_or_numeric_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Integer(value) => i32::try_from(value)
            .map_err(|_| de::Error::custom(format!("integer {} is out of range", value))),
        // JSON clients may send 2024.0; only whole numbers are accepted.
        NumberOrString::Float(value) => {
            if value.is_finite()
                && value.fract() == 0.0
                && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value)
            {
                Ok(value as i32)
            } else {
                Err(de::Error::custom(format!("{} is not a whole number", value)))
            }
        }
        NumberOrString::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("`{}` is not an integer", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_parse_rejects_non_numeric_parts() {
        assert_eq!(
            RecordKey::parse("u1", "2024", "3"),
            Some(RecordKey::new("u1", 2024, 3))
        );
        assert_eq!(
            RecordKey::parse("u1", " 2024 ", "03"),
            Some(RecordKey::new("u1", 2024, 3))
        );
        assert_eq!(RecordKey::parse("u1", "twenty", "3"), None);
        assert_eq!(RecordKey::parse("u1", "2024", ""), None);
    }

    #[test]
    fn test_query_without_all_parts_has_no_key() {
        let query = RecordQuery {
            user_id: Some("u1".to_string()),
            year: Some("2024".to_string()),
            month: None,
        };
        assert_eq!(query.key(), None);
        assert_eq!(RecordQuery::default().key(), None);
    }

    #[test]
    fn test_save_request_accepts_numeric_strings_and_data_alias() {
        let request: SaveRecordRequest = serde_json::from_value(json!({
            "userId": "u1",
            "year": "2024",
            "month": 3,
            "data": [{
                "date": "2024-03-01",
                "startTime": "18:00",
                "endTime": "20:00",
                "overtimeHours": 2,
                "overtimePay": 500
            }]
        }))
        .unwrap();

        assert_eq!(request.year, 2024);
        assert_eq!(request.month, 3);
        assert_eq!(request.entries.len(), 1);
        assert_eq!(request.entries[0].overtime_pay, 500.0);
        assert_eq!(request.salary, 0.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_save_request_rejects_non_numeric_month() {
        let result = serde_json::from_value::<SaveRecordRequest>(json!({
            "userId": "u1",
            "year": 2024,
            "month": "march",
            "entries": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_request_accepts_whole_number_floats() {
        let request: SaveRecordRequest = serde_json::from_value(json!({
            "userId": "u1",
            "year": 2024.0,
            "month": 3.0,
            "entries": []
        }))
        .unwrap();
        assert_eq!(request.year, 2024);
        assert_eq!(request.month, 3);

        for month in [json!(3.5), json!(1e12)] {
            let result = serde_json::from_value::<SaveRecordRequest>(json!({
                "userId": "u1",
                "year": 2024,
                "month": month,
                "entries": []
            }));
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_save_request_validation_reports_bad_entry() {
        let request: SaveRecordRequest = serde_json::from_value(json!({
            "userId": "u1",
            "year": 2024,
            "month": 3,
            "entries": [{
                "date": "2024-03-01",
                "startTime": "6pm",
                "endTime": "20:00",
                "overtimeHours": 2,
                "overtimePay": 500
            }],
            "salary": 30000
        }))
        .unwrap();

        let err = request.validate().unwrap_err();
        assert!(err.contains("entries[0]"), "unexpected message: {}", err);
    }

    #[test]
    fn test_record_serializes_in_camel_case() {
        let now = Utc::now();
        let record = OvertimeRecord {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            year: 2024,
            month: 3,
            entries: vec![],
            salary: 30000.0,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["salary"], 30000.0);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn test_revise_keeps_identity() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let record = OvertimeRecord {
            id,
            user_id: "u1".to_string(),
            year: 2024,
            month: 3,
            entries: vec![],
            salary: 1.0,
            created_at: now,
            updated_at: now,
        };

        let draft = record.revise(vec![], 2.0);
        assert_eq!(draft.id, Some(id));
        assert_eq!(draft.key, RecordKey::new("u1", 2024, 3));
        assert_eq!(draft.salary, 2.0);
    }
}
