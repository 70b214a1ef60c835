//! [`Unit`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::building;
#[cfg(doc)]
use crate::domain::Building;

/// Sellable unit of a [`Building`].
#[derive(Clone, Debug, Deserialize)]
pub struct Unit {
    /// ID of this [`Unit`].
    pub id: Id,

    /// ID of the [`Building`] this [`Unit`] belongs to.
    pub building_id: building::Id,

    /// Number of this [`Unit`] inside its [`Building`].
    pub unit_number: String,

    /// Type of this [`Unit`] (apartment, villa, shop, etc.).
    #[serde(default)]
    pub unit_type: String,

    /// Base price of this [`Unit`].
    pub price: Money,

    /// Availability [`Status`] of this [`Unit`].
    #[serde(default)]
    pub status: Status,

    /// Area of this [`Unit`] in square meters.
    #[serde(default)]
    pub area: Option<Decimal>,

    /// Floor this [`Unit`] is located on.
    #[serde(default)]
    pub floor: Option<i32>,

    /// Number of bedrooms in this [`Unit`].
    #[serde(default)]
    pub bedrooms: Option<u16>,

    /// Number of bathrooms in this [`Unit`].
    #[serde(default)]
    pub bathrooms: Option<u16>,
}

impl Unit {
    /// Indicates whether this [`Unit`] may be reserved.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// ID of a [`Unit`].
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

/// Availability status of a [`Unit`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum Status {
    /// [`Unit`] may be reserved.
    #[display("available")]
    Available,

    /// [`Unit`] is already reserved.
    #[display("reserved")]
    Reserved,

    /// [`Unit`] is sold.
    #[display("sold")]
    Sold,

    /// Any status the backend reports which is not known here.
    ///
    /// Such [`Unit`]s are shown, but never selectable.
    #[default]
    #[display("unknown")]
    Unknown,
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let status = String::deserialize(d)?;
        Ok(match status.to_ascii_lowercase().as_str() {
            "available" => Self::Available,
            "reserved" => Self::Reserved,
            "sold" => Self::Sold,
            _ => Self::Unknown,
        })
    }
}
