//! Staff absence records.

use serde::{Deserialize, Serialize};

use super::{CollectionKind, Extra, Record};

/// A period during which a staff member is away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: String,
    pub staff_name: String,
    /// First day away (YYYY-MM-DD)
    pub start_date: String,
    /// Last day away, inclusive
    pub end_date: String,
    /// Optional link to a [`super::User`]; never enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields outside the schema, kept as they are
    #[serde(flatten)]
    pub extra: Extra,
}

impl Absence {
    pub fn new(
        staff_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            staff_name: staff_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AbsencePatch {
    #[serde(default)]
    pub staff_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub user_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub notes: Option<Option<String>>,
    /// Other fields, merged into the record's extra fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Absence {
    type Patch = AbsencePatch;
    const KIND: CollectionKind = CollectionKind::Absences;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: AbsencePatch) {
        if let Some(staff_name) = patch.staff_name {
            self.staff_name = staff_name;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        super::merge_extra(&mut self.extra, patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_merges_unknown_fields() {
        let mut absence: Absence = serde_json::from_str(
            r#"{"id": "ab1", "staffName": "Dr. Bernard", "startDate": "2024-07-01",
                "endDate": "2024-07-14", "remplacant": "Dr. Roy"}"#,
        )
        .unwrap();

        let patch: AbsencePatch = serde_json::from_str(
            r#"{"id": "forged", "endDate": "2024-07-21",
                "remplacant": "Dr. Noël", "valide": true}"#,
        )
        .unwrap();
        absence.apply(patch);

        assert_eq!(absence.id, "ab1");
        assert_eq!(absence.end_date, "2024-07-21");
        assert_eq!(absence.extra["remplacant"], "Dr. Noël");
        assert_eq!(absence.extra["valide"], true);
        assert!(!absence.extra.contains_key("id"));
    }
}
