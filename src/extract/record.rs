use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of the raw-text snapshot
pub const RAW_SNAPSHOT_MAX: usize = 500;

/// Delimiter used when a list field is flattened into one CSV cell
pub const LIST_DELIMITER: &str = "; ";

/// Tabular column order; matches the serialized field order
pub const CSV_HEADERS: [&str; 26] = [
    "source",
    "listing_page_url",
    "profile_url",
    "name",
    "designation",
    "specialty",
    "sub_specialties",
    "years_experience",
    "hospital_affiliations",
    "clinic_address",
    "city",
    "state",
    "languages",
    "education",
    "qualifications",
    "awards_memberships",
    "conditions_treated",
    "procedures",
    "about",
    "consultation_fee",
    "availability",
    "phone",
    "rating",
    "reviews_count",
    "raw_text_snapshot",
    "scraped_at",
];

/// One profile extracted from a detail page
///
/// Scalar fields are `None` when no strategy found them. List fields are
/// always present and default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub source: String,
    pub listing_page_url: String,
    pub profile_url: String,
    pub name: Option<String>,
    pub designation: Option<String>,
    pub specialty: Option<String>,
    #[serde(default)]
    pub sub_specialties: Vec<String>,
    pub years_experience: Option<String>,
    #[serde(default)]
    pub hospital_affiliations: Vec<String>,
    pub clinic_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub awards_memberships: Vec<String>,
    #[serde(default)]
    pub conditions_treated: Vec<String>,
    #[serde(default)]
    pub procedures: Vec<String>,
    pub about: Option<String>,
    pub consultation_fee: Option<String>,
    pub availability: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
    pub raw_text_snapshot: Option<String>,
    pub scraped_at: String,
}

impl Record {
    /// Creates an empty record stamped with the current time
    pub fn new(source: &str, listing_page_url: &str, profile_url: &str) -> Self {
        Self {
            source: source.to_string(),
            listing_page_url: listing_page_url.to_string(),
            profile_url: profile_url.to_string(),
            name: None,
            designation: None,
            specialty: None,
            sub_specialties: Vec::new(),
            years_experience: None,
            hospital_affiliations: Vec::new(),
            clinic_address: None,
            city: None,
            state: None,
            languages: Vec::new(),
            education: Vec::new(),
            qualifications: Vec::new(),
            awards_memberships: Vec::new(),
            conditions_treated: Vec::new(),
            procedures: Vec::new(),
            about: None,
            consultation_fee: None,
            availability: None,
            phone: None,
            rating: None,
            reviews_count: None,
            raw_text_snapshot: None,
            scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Flattens the record into cells in `CSV_HEADERS` order
    pub fn csv_row(&self) -> Vec<String> {
        fn scalar(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn list(values: &[String]) -> String {
            values.join(LIST_DELIMITER)
        }

        vec![
            self.source.clone(),
            self.listing_page_url.clone(),
            self.profile_url.clone(),
            scalar(&self.name),
            scalar(&self.designation),
            scalar(&self.specialty),
            list(&self.sub_specialties),
            scalar(&self.years_experience),
            list(&self.hospital_affiliations),
            scalar(&self.clinic_address),
            scalar(&self.city),
            scalar(&self.state),
            list(&self.languages),
            list(&self.education),
            list(&self.qualifications),
            list(&self.awards_memberships),
            list(&self.conditions_treated),
            list(&self.procedures),
            scalar(&self.about),
            scalar(&self.consultation_fee),
            scalar(&self.availability),
            scalar(&self.phone),
            scalar(&self.rating),
            scalar(&self.reviews_count),
            scalar(&self.raw_text_snapshot),
            self.scraped_at.clone(),
        ]
    }

    /// Every present scalar, labelled, for validation
    pub fn scalars(&self) -> [(&'static str, Option<&str>); 13] {
        [
            ("name", self.name.as_deref()),
            ("designation", self.designation.as_deref()),
            ("specialty", self.specialty.as_deref()),
            ("years_experience", self.years_experience.as_deref()),
            ("clinic_address", self.clinic_address.as_deref()),
            ("city", self.city.as_deref()),
            ("state", self.state.as_deref()),
            ("about", self.about.as_deref()),
            ("consultation_fee", self.consultation_fee.as_deref()),
            ("availability", self.availability.as_deref()),
            ("phone", self.phone.as_deref()),
            ("rating", self.rating.as_deref()),
            ("reviews_count", self.reviews_count.as_deref()),
        ]
    }

    /// Every list field, labelled, for validation
    pub fn lists(&self) -> [(&'static str, &[String]); 8] {
        [
            ("sub_specialties", self.sub_specialties.as_slice()),
            ("hospital_affiliations", self.hospital_affiliations.as_slice()),
            ("languages", self.languages.as_slice()),
            ("education", self.education.as_slice()),
            ("qualifications", self.qualifications.as_slice()),
            ("awards_memberships", self.awards_memberships.as_slice()),
            ("conditions_treated", self.conditions_treated.as_slice()),
            ("procedures", self.procedures.as_slice()),
        ]
    }
}
