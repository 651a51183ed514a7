//! Intake form record, field updates, and option tables.
//!
//! [`FormData`] is the typed shape of everything the relocation wizard
//! collects. It is persisted as JSONB in `user_progress.form_data`; every
//! field is optional and defaults to an empty value so that partially filled
//! forms round-trip unchanged.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Oldest age (in years) a child can be entered with.
pub const MAX_KID_AGE: u8 = 17;

/// Upper bound on the free-text notes field, in characters.
pub const MAX_ADDITIONAL_INFO_CHARS: usize = 4000;

// ---------------------------------------------------------------------------
// Field value types
// ---------------------------------------------------------------------------

/// A country reference as selected in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, upper case.
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub age: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
}

impl MaritalStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilySize {
    JustMe,
    Couple,
    Family,
}

impl FamilySize {
    pub const ALL: [FamilySize; 3] = [Self::JustMe, Self::Couple, Self::Family];

    pub fn label(self) -> &'static str {
        match self {
            Self::JustMe => "Just Me",
            Self::Couple => "Couple",
            Self::Family => "Family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    pub const ALL: [BudgetTier; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "< $10k",
            Self::Medium => "$10k - $50k",
            Self::High => "> $50k",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Immediate,
    Soon,
    Later,
}

impl Timeline {
    pub const ALL: [Timeline; 3] = [Self::Immediate, Self::Soon, Self::Later];

    pub fn label(self) -> &'static str {
        match self {
            Self::Immediate => "< 3 months",
            Self::Soon => "3-6 months",
            Self::Later => "6+ months",
        }
    }
}

// ---------------------------------------------------------------------------
// FormData
// ---------------------------------------------------------------------------

/// Everything the intake wizard collects. No field is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    pub destination_countries: Vec<Country>,
    pub passport_countries: Vec<Country>,
    pub status: Option<MaritalStatus>,
    pub family_size: Option<FamilySize>,
    pub number_of_kids: Option<u32>,
    pub kids: Vec<Child>,
    pub professions: Vec<Profession>,
    pub partner_professions: Vec<Profession>,
    pub budget: Option<BudgetTier>,
    pub timeline: Option<Timeline>,
    pub additional_info: String,
}

impl FormData {
    /// Decode form data stored as JSON, falling back to defaults for anything
    /// that does not match the current shape.
    pub fn from_json_lossy(value: &serde_json::Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Stored form data did not decode, using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Merge one field into the record, replacing its previous value.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::DestinationCountries(v) => self.destination_countries = v,
            FieldUpdate::PassportCountries(v) => self.passport_countries = v,
            FieldUpdate::Status(v) => self.status = v,
            FieldUpdate::FamilySize(v) => self.family_size = v,
            FieldUpdate::NumberOfKids(v) => self.number_of_kids = v,
            FieldUpdate::Kids(v) => self.kids = v,
            FieldUpdate::Professions(v) => self.professions = v,
            FieldUpdate::PartnerProfessions(v) => self.partner_professions = v,
            FieldUpdate::Budget(v) => self.budget = v,
            FieldUpdate::Timeline(v) => self.timeline = v,
            FieldUpdate::AdditionalInfo(v) => self.additional_info = v,
        }
    }

    /// Names of the personal-details fields that are still empty.
    pub fn missing_personal_details(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.status.is_none() {
            missing.push("status");
        }
        if self.number_of_kids.is_none() {
            missing.push("number_of_kids");
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

/// A single-field change to [`FormData`].
///
/// Serialized as `{"field": "<name>", "value": <value>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    DestinationCountries(Vec<Country>),
    PassportCountries(Vec<Country>),
    Status(Option<MaritalStatus>),
    FamilySize(Option<FamilySize>),
    NumberOfKids(Option<u32>),
    Kids(Vec<Child>),
    Professions(Vec<Profession>),
    PartnerProfessions(Vec<Profession>),
    Budget(Option<BudgetTier>),
    Timeline(Option<Timeline>),
    AdditionalInfo(String),
}

impl FieldUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::DestinationCountries(_) => "destination_countries",
            Self::PassportCountries(_) => "passport_countries",
            Self::Status(_) => "status",
            Self::FamilySize(_) => "family_size",
            Self::NumberOfKids(_) => "number_of_kids",
            Self::Kids(_) => "kids",
            Self::Professions(_) => "professions",
            Self::PartnerProfessions(_) => "partner_professions",
            Self::Budget(_) => "budget",
            Self::Timeline(_) => "timeline",
            Self::AdditionalInfo(_) => "additional_info",
        }
    }
}

/// Cardinality limits for the multi-select fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionLimits {
    pub max_destination_countries: usize,
    pub max_passport_countries: usize,
    pub max_professions: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_destination_countries: 3,
            max_passport_countries: 3,
            max_professions: 3,
        }
    }
}

/// Validate a field update before it is merged.
pub fn validate_update(update: &FieldUpdate, limits: &SelectionLimits) -> Result<(), CoreError> {
    match update {
        FieldUpdate::DestinationCountries(countries) => validate_countries(
            "destination_countries",
            countries,
            limits.max_destination_countries,
        ),
        FieldUpdate::PassportCountries(countries) => validate_countries(
            "passport_countries",
            countries,
            limits.max_passport_countries,
        ),
        FieldUpdate::Professions(list) | FieldUpdate::PartnerProfessions(list) => {
            validate_professions(update.field_name(), list, limits.max_professions)
        }
        FieldUpdate::Kids(kids) => {
            if let Some(kid) = kids.iter().find(|k| k.age > MAX_KID_AGE) {
                return Err(CoreError::Validation(format!(
                    "Child '{}' has age {}; ages must be between 0 and {MAX_KID_AGE}",
                    kid.id, kid.age
                )));
            }
            Ok(())
        }
        FieldUpdate::AdditionalInfo(text) => {
            if text.chars().count() > MAX_ADDITIONAL_INFO_CHARS {
                return Err(CoreError::Validation(format!(
                    "additional_info must be at most {MAX_ADDITIONAL_INFO_CHARS} characters"
                )));
            }
            Ok(())
        }
        FieldUpdate::Status(_)
        | FieldUpdate::FamilySize(_)
        | FieldUpdate::NumberOfKids(_)
        | FieldUpdate::Budget(_)
        | FieldUpdate::Timeline(_) => Ok(()),
    }
}

/// Validate a whole record, e.g. one saved directly through `PUT /progress`.
pub fn validate_form(data: &FormData, limits: &SelectionLimits) -> Result<(), CoreError> {
    let fields = [
        FieldUpdate::DestinationCountries(data.destination_countries.clone()),
        FieldUpdate::PassportCountries(data.passport_countries.clone()),
        FieldUpdate::Kids(data.kids.clone()),
        FieldUpdate::Professions(data.professions.clone()),
        FieldUpdate::PartnerProfessions(data.partner_professions.clone()),
        FieldUpdate::AdditionalInfo(data.additional_info.clone()),
    ];
    fields
        .iter()
        .try_for_each(|update| validate_update(update, limits))
}

/// Check that a country code is an upper-case ISO 3166-1 alpha-2 code.
pub fn is_valid_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn validate_countries(field: &str, countries: &[Country], max: usize) -> Result<(), CoreError> {
    if countries.len() > max {
        return Err(CoreError::Validation(format!(
            "{field} accepts at most {max} selections, got {}",
            countries.len()
        )));
    }
    for (i, country) in countries.iter().enumerate() {
        if !is_valid_country_code(&country.code) {
            return Err(CoreError::Validation(format!(
                "{field}: '{}' is not a valid country code",
                country.code
            )));
        }
        if countries[..i].iter().any(|c| c.code == country.code) {
            return Err(CoreError::Validation(format!(
                "{field}: country '{}' selected more than once",
                country.code
            )));
        }
    }
    Ok(())
}

fn validate_professions(field: &str, list: &[Profession], max: usize) -> Result<(), CoreError> {
    if list.len() > max {
        return Err(CoreError::Validation(format!(
            "{field} accepts at most {max} selections, got {}",
            list.len()
        )));
    }
    if list.iter().any(|p| p.name.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "{field}: profession name must not be empty"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Option tables
// ---------------------------------------------------------------------------

/// A selectable value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

/// All enumerated choices the form offers, for clients to render.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub family_size: Vec<OptionEntry>,
    pub budget: Vec<OptionEntry>,
    pub timeline: Vec<OptionEntry>,
    pub kid_ages: Vec<OptionEntry>,
}

fn entry<T: Serialize>(value: T, label: &str) -> OptionEntry {
    let value = serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    OptionEntry {
        value,
        label: label.to_string(),
    }
}

pub fn form_options() -> FormOptions {
    FormOptions {
        family_size: FamilySize::ALL
            .iter()
            .map(|f| entry(f, f.label()))
            .collect(),
        budget: BudgetTier::ALL.iter().map(|b| entry(b, b.label())).collect(),
        timeline: Timeline::ALL.iter().map(|t| entry(t, t.label())).collect(),
        kid_ages: (0..=MAX_KID_AGE)
            .map(|age| OptionEntry {
                value: age.to_string(),
                label: match age {
                    0 => "Under 1 year".to_string(),
                    1 => "1 year".to_string(),
                    n => format!("{n} years"),
                },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_empty() {
        let data = FormData::default();
        assert!(data.destination_countries.is_empty());
        assert!(data.status.is_none());
        assert!(data.number_of_kids.is_none());
        assert_eq!(data.additional_info, "");
    }

    #[test]
    fn partial_json_decodes_with_defaults() {
        let data: FormData = serde_json::from_value(json!({ "status": "married" })).unwrap();
        assert_eq!(data.status, Some(MaritalStatus::Married));
        assert!(data.kids.is_empty());
    }

    #[test]
    fn lossy_decode_falls_back_to_default() {
        let data = FormData::from_json_lossy(&json!({ "status": 42 }));
        assert_eq!(data, FormData::default());
        let data = FormData::from_json_lossy(&json!(null));
        assert_eq!(data, FormData::default());
    }

    #[test]
    fn field_update_wire_shape() {
        let update: FieldUpdate =
            serde_json::from_value(json!({ "field": "status", "value": "married" })).unwrap();
        assert_eq!(update, FieldUpdate::Status(Some(MaritalStatus::Married)));

        let update: FieldUpdate = serde_json::from_value(
            json!({ "field": "destination_countries", "value": [{"code": "PT", "name": "Portugal"}] }),
        )
        .unwrap();
        assert_eq!(update.field_name(), "destination_countries");
    }

    #[test]
    fn apply_replaces_only_the_named_field() {
        let mut data = FormData {
            budget: Some(BudgetTier::High),
            ..FormData::default()
        };
        data.apply(FieldUpdate::NumberOfKids(Some(2)));
        assert_eq!(data.number_of_kids, Some(2));
        assert_eq!(data.budget, Some(BudgetTier::High));
    }

    #[test]
    fn missing_personal_details_lists_empty_fields() {
        let mut data = FormData::default();
        assert_eq!(data.missing_personal_details(), vec!["status", "number_of_kids"]);
        data.status = Some(MaritalStatus::Single);
        data.number_of_kids = Some(0);
        assert!(data.missing_personal_details().is_empty());
    }

    #[test]
    fn too_many_countries_rejected() {
        let limits = SelectionLimits::default();
        let countries = vec![
            Country::new("PT", "Portugal"),
            Country::new("ES", "Spain"),
            Country::new("DE", "Germany"),
            Country::new("FR", "France"),
        ];
        let update = FieldUpdate::DestinationCountries(countries);
        assert!(validate_update(&update, &limits).is_err());
    }

    #[test]
    fn duplicate_and_malformed_countries_rejected() {
        let limits = SelectionLimits::default();
        let dup = FieldUpdate::PassportCountries(vec![
            Country::new("PT", "Portugal"),
            Country::new("PT", "Portugal"),
        ]);
        assert!(validate_update(&dup, &limits).is_err());

        let bad = FieldUpdate::PassportCountries(vec![Country::new("prt", "Portugal")]);
        assert!(validate_update(&bad, &limits).is_err());
    }

    #[test]
    fn kid_age_bounds() {
        let limits = SelectionLimits::default();
        let ok = FieldUpdate::Kids(vec![Child { id: "a".into(), age: MAX_KID_AGE }]);
        assert!(validate_update(&ok, &limits).is_ok());
        let too_old = FieldUpdate::Kids(vec![Child { id: "b".into(), age: 18 }]);
        assert!(validate_update(&too_old, &limits).is_err());
    }

    #[test]
    fn blank_profession_rejected() {
        let limits = SelectionLimits::default();
        let update = FieldUpdate::PartnerProfessions(vec![Profession {
            id: "custom".into(),
            name: "   ".into(),
        }]);
        assert!(validate_update(&update, &limits).is_err());
    }

    #[test]
    fn whole_record_validation_checks_every_list() {
        let limits = SelectionLimits::default();
        assert!(validate_form(&FormData::default(), &limits).is_ok());

        let data = FormData {
            kids: vec![Child { id: "a".into(), age: 30 }],
            ..FormData::default()
        };
        assert!(validate_form(&data, &limits).is_err());
    }

    #[test]
    fn options_cover_every_choice() {
        let options = form_options();
        assert_eq!(options.family_size.len(), 3);
        assert_eq!(options.family_size[0].value, "just_me");
        assert_eq!(options.budget[2].label, "> $50k");
        assert_eq!(options.kid_ages.len(), 18);
        assert_eq!(options.kid_ages[0].label, "Under 1 year");
        assert_eq!(options.kid_ages[1].label, "1 year");
        assert_eq!(options.kid_ages[5].label, "5 years");
    }
}
