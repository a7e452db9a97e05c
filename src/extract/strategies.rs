//! Ranked locator tables for every semantic field
//!
//! Listing and profile markup on the target site changes without notice, so
//! each field carries several candidate locators, most specific first.

use crate::browser::Locator;

/// Anchors that may lead to a detail page
pub const DETAIL_LINKS: &[Locator] = &[
    Locator::css("a[href*=\"/doctor/\"]"),
    Locator::css("a[href*=\"/oncologist/\"]"),
    Locator::css("a[href*=\"/profile/\"]"),
    Locator::css("[class*=\"doctor-card\"] a"),
    Locator::css("[class*=\"doctorCard\"] a"),
    Locator::css("article a"),
    Locator::css("[data-testid*=\"doctor\"] a"),
];

pub const PAGINATION_NEXT: &[Locator] = &[
    Locator::with_text("a", "Next"),
    Locator::css("a[aria-label*=\"next\"]"),
    Locator::css("a[aria-label*=\"Next\"]"),
    Locator::css("[class*=\"next\"]"),
    Locator::with_text("button", "Next"),
];

pub const LOAD_MORE: &[Locator] = &[
    Locator::with_text("button", "Load More"),
    Locator::css("[class*=\"load-more\"]"),
    Locator::css("[class*=\"loadMore\"]"),
];

/// Dedicated name elements come before generic headings
pub const NAME: &[Locator] = &[
    Locator::css("[class*=\"doctor-name\"]"),
    Locator::css("[class*=\"doctorName\"]"),
    Locator::css("[itemprop=\"name\"]"),
    Locator::css("h1"),
    Locator::with_text("h2", "Dr"),
    Locator::css("[class*=\"name\"]"),
];

pub const DESIGNATION: &[Locator] = &[
    Locator::css("[class*=\"designation\"]"),
    Locator::css("[class*=\"title\"]"),
    Locator::css("[class*=\"specialization\"]"),
    Locator::css("[class*=\"specialty\"]"),
    Locator::with_text("p", "Oncologist"),
];

pub const SPECIALTY: &[Locator] = &[
    Locator::css("[class*=\"specialty\"]"),
    Locator::css("[class*=\"department\"]"),
    Locator::css("[class*=\"specialization\"]"),
];

pub const ADDRESS: &[Locator] = &[
    Locator::css("[class*=\"address\"]"),
    Locator::css("[class*=\"location\"]"),
    Locator::css("[class*=\"city\"]"),
    Locator::css("[itemprop=\"address\"]"),
];

pub const PHONE: &[Locator] = &[
    Locator::css("a[href^=\"tel:\"]"),
    Locator::css("[class*=\"phone\"]"),
    Locator::css("[class*=\"contact\"]"),
];

pub const RATING: &[Locator] = &[
    Locator::css("[itemprop=\"ratingValue\"]"),
    Locator::css("[class*=\"rating\"]"),
    Locator::css("[class*=\"star\"]"),
];

pub const ABOUT: &[Locator] = &[
    Locator::css("[class*=\"about\"]"),
    Locator::css("[class*=\"bio\"]"),
    Locator::css("[class*=\"description\"]"),
    Locator::css("[class*=\"summary\"]"),
];

pub const AVAILABILITY: &[Locator] = &[
    Locator::css("[class*=\"availability\"]"),
    Locator::css("[class*=\"timing\"]"),
    Locator::css("[class*=\"schedule\"]"),
];

pub const REVIEWS_COUNT: &[Locator] = &[
    Locator::css("[itemprop=\"reviewCount\"]"),
    Locator::css("[class*=\"review-count\"]"),
    Locator::css("[class*=\"reviewCount\"]"),
    Locator::css("[class*=\"reviews\"]"),
];

pub const SUB_SPECIALTIES: &[Locator] = &[
    Locator::css("[class*=\"sub-specialt\"] li"),
    Locator::css("[class*=\"subSpecialt\"] li"),
    Locator::css("[class*=\"expertise\"] li"),
];

pub const HOSPITALS: &[Locator] = &[
    Locator::css("[class*=\"hospital\"]"),
    Locator::css("[class*=\"affiliation\"]"),
    Locator::css("[class*=\"clinic\"]"),
];

pub const LANGUAGES: &[Locator] = &[
    Locator::css("[class*=\"language\"] li"),
    Locator::css("[itemprop=\"knowsLanguage\"]"),
    Locator::css("[class*=\"language\"]"),
];

pub const EDUCATION: &[Locator] = &[
    Locator::css("[class*=\"education\"] li"),
    Locator::css("[class*=\"degree\"]"),
    Locator::css("[class*=\"education\"]"),
];

pub const AWARDS: &[Locator] = &[
    Locator::css("[class*=\"award\"] li"),
    Locator::css("[class*=\"membership\"] li"),
    Locator::css("[class*=\"award\"]"),
];

pub const CONDITIONS: &[Locator] = &[
    Locator::css("[class*=\"condition\"] li"),
    Locator::css("[class*=\"treats\"] li"),
    Locator::css("[class*=\"condition\"]"),
];

pub const PROCEDURES: &[Locator] = &[
    Locator::css("[class*=\"procedure\"] li"),
    Locator::css("[class*=\"treatment\"] li"),
    Locator::css("[class*=\"procedure\"]"),
];
