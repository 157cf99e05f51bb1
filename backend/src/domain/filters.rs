//! Per-collection listing filters.
//!
//! Each filter type knows which query parameters its collection accepts and
//! how they become [`Condition`]s. Absent or blank parameters contribute no
//! condition.

use serde_json::Value;

use super::Condition;
use super::listing::present;

/// Collection-specific listing filters.
pub trait RecordFilters {
    /// Conditions contributed by the parameters that are present.
    fn conditions(&self) -> Vec<Condition>;

    /// Emails the caller named; each must equal the session identity unless
    /// the caller is an admin.
    fn named_emails(&self) -> Vec<&str> {
        Vec::new()
    }
}

fn push_equals(conditions: &mut Vec<Condition>, field: &str, raw: Option<&String>) {
    if let Some(value) = present(raw.map(String::as_str)) {
        conditions.push(Condition::equals(field, value));
    }
}

fn push_contains(conditions: &mut Vec<Condition>, field: &str, raw: Option<&String>) {
    if let Some(needle) = present(raw.map(String::as_str)) {
        conditions.push(Condition::contains(field, needle));
    }
}

fn named<'a>(values: &[Option<&'a String>]) -> Vec<&'a str> {
    values
        .iter()
        .filter_map(|value| present(value.map(String::as_str)))
        .collect()
}

/// No filtering; used by the user directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilters;

impl RecordFilters for NoFilters {
    fn conditions(&self) -> Vec<Condition> {
        Vec::new()
    }
}

/// Filters for `GET /pets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetFilters {
    /// Exact category.
    pub category: Option<String>,
    /// Case-insensitive substring of the pet name.
    pub name: Option<String>,
    /// Adoption status; `true`/`false` match booleans, anything else a string.
    pub adopted: Option<String>,
    /// Owner email.
    pub email: Option<String>,
}

impl RecordFilters for PetFilters {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        push_equals(&mut conditions, "category", self.category.as_ref());
        push_contains(&mut conditions, "name", self.name.as_ref());
        if let Some(raw) = present(self.adopted.as_deref()) {
            conditions.push(Condition::equals("adopted", adopted_value(raw)));
        }
        push_equals(&mut conditions, "email", self.email.as_ref());
        conditions
    }

    fn named_emails(&self) -> Vec<&str> {
        named(&[self.email.as_ref()])
    }
}

fn adopted_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_owned()),
    }
}

/// Filters for `GET /donationCampaigns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignFilters {
    /// Campaign owner email.
    pub email: Option<String>,
    /// Case-insensitive substring of the pet name the campaign is for.
    pub name: Option<String>,
}

impl RecordFilters for CampaignFilters {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        push_equals(&mut conditions, "email", self.email.as_ref());
        push_contains(&mut conditions, "petName", self.name.as_ref());
        conditions
    }

    fn named_emails(&self) -> Vec<&str> {
        named(&[self.email.as_ref()])
    }
}

/// Filters for `GET /donations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilters {
    /// Campaign the donation went to.
    pub campaign_id: Option<String>,
    /// Donor email.
    pub email: Option<String>,
}

impl RecordFilters for DonationFilters {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        push_equals(&mut conditions, "campaignId", self.campaign_id.as_ref());
        push_equals(&mut conditions, "email", self.email.as_ref());
        conditions
    }

    fn named_emails(&self) -> Vec<&str> {
        named(&[self.email.as_ref()])
    }
}

/// Filters for `GET /adopts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptionFilters {
    /// Requester email.
    pub email: Option<String>,
    /// Pet owner email.
    pub owner_email: Option<String>,
    /// Requested pet.
    pub pet_id: Option<String>,
}

impl RecordFilters for AdoptionFilters {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        push_equals(&mut conditions, "email", self.email.as_ref());
        push_equals(&mut conditions, "ownerEmail", self.owner_email.as_ref());
        push_equals(&mut conditions, "petId", self.pet_id.as_ref());
        conditions
    }

    fn named_emails(&self) -> Vec<&str> {
        named(&[self.email.as_ref(), self.owner_email.as_ref()])
    }
}

/// Filters for `GET /payments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilters {
    /// Payer email.
    pub email: Option<String>,
}

impl RecordFilters for PaymentFilters {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        push_equals(&mut conditions, "email", self.email.as_ref());
        conditions
    }

    fn named_emails(&self) -> Vec<&str> {
        named(&[self.email.as_ref()])
    }
}
