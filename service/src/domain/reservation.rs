//! [`Reservation`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::domain::unit;
#[cfg(doc)]
use crate::domain::Unit;

/// Reservation of a [`Unit`], as shown in its detail view.
#[derive(Clone, Debug, Deserialize)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// ID of the reserved [`Unit`].
    #[serde(default)]
    pub unit_id: Option<unit::Id>,

    /// Client holding this [`Reservation`].
    #[serde(default)]
    pub client: Option<Holder>,

    /// Status of this [`Reservation`] as reported by the backend.
    #[serde(default)]
    pub status: Option<String>,

    /// Final price of the reserved [`Unit`].
    #[serde(default)]
    pub final_price: Option<Money>,

    /// Down payment agreed in this [`Reservation`].
    #[serde(default)]
    pub down_payment: Option<Money>,
}

/// Client holding a [`Reservation`].
#[derive(Clone, Debug, Deserialize)]
pub struct Holder {
    /// Full name of the client.
    pub name: String,
}

/// ID of a [`Reservation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(u64);

/// Multipart submission creating a new [`Reservation`].
///
/// Holds text fields in the order they are sent, keyed the way the backend
/// expects nested values (`client[name]`, `installments_details[0][type]`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Submission {
    /// Fields of this [`Submission`].
    pub fields: Vec<(String, String)>,
}

impl Submission {
    /// Appends a new field to this [`Submission`].
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.push((key.into(), value.to_string()));
    }

    /// Returns value of the first field with the provided `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }
}
