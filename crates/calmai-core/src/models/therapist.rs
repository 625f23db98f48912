use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::account::ProfileUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Therapist {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub specialization: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl Therapist {
    /// Overwrite the fields `update` sets. Blank license and specialization
    /// values clear the field.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(license) = &update.license_number {
            self.license_number = non_blank(license);
        }
        if let Some(specialization) = &update.specialization {
            self.specialization = non_blank(specialization);
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
