//! # Business Profile
//!
//! Public contact details of the operator. They appear in every customer
//! confirmation and in every non-success message shown on the website.

use serde::{Deserialize, Serialize};

/// Public contact details of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    /// Trading name.
    pub name: String,
    /// Phone number customers can always fall back to.
    pub phone: String,
    /// Public reservations address.
    pub email: String,
    /// Regions served, e.g. `Maryland • Washington DC • Virginia`.
    pub service_area: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "EZ Airport Limo".to_string(),
            phone: "(123) 456-7890".to_string(),
            email: "reservation@ezairportlimo.com".to_string(),
            service_area: "Maryland • Washington DC • Virginia".to_string(),
        }
    }
}
