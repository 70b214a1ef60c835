//! [`Draft`] of a reservation to be submitted.

use std::path::PathBuf;

use common::Money;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::domain::{
    building, client, installment, media, project, unit,
};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Reservation draft, describing everything a dashboard user would enter
/// into the reservation form.
#[derive(Clone, Debug, Deserialize)]
pub struct Draft {
    /// ID of the project to pick.
    pub project: project::Id,

    /// ID of the building to pick.
    pub building: building::Id,

    /// ID of the unit to reserve.
    pub unit: unit::Id,

    /// Client reserving the unit.
    #[serde(default)]
    pub client: Client,

    /// Date of the reservation, today if omitted.
    #[serde(default, with = "iso_date::option")]
    pub reservation_date: Option<Date>,

    /// Date of the contract, if already known.
    #[serde(default, with = "iso_date::option")]
    pub contract_date: Option<Date>,

    /// Paid reservation deposit.
    pub reservation_deposit: Money,

    /// Down payment overriding the one suggested by the project.
    #[serde(default)]
    pub down_payment: Option<Money>,

    /// Installment tracks in the order they're picked.
    #[serde(default)]
    pub installments: Vec<Track>,

    /// Files to attach.
    #[serde(default)]
    pub attachments: Attachments,
}

impl Draft {
    /// Loads a [`Draft`] from the file at the provided `path`.
    ///
    /// The format is detected by the file extension.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, or doesn't describe a valid [`Draft`].
    pub fn load(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}

/// Client details of a [`Draft`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Client {
    /// Full name of the client.
    pub name: String,

    /// Phone number of the client.
    pub phone: String,

    /// National identifier of the client.
    pub national_id: String,

    /// Address of the client.
    pub address: String,

    /// Email address of the client.
    pub email: Option<String>,
}

impl From<Client> for client::Draft {
    fn from(value: Client) -> Self {
        let Client {
            name,
            phone,
            national_id,
            address,
            email,
        } = value;
        Self {
            name,
            phone,
            national_id,
            address,
            email: email.unwrap_or_default(),
        }
    }
}

/// Installment track of a [`Draft`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Track {
    /// Kind of the track.
    pub kind: installment::Kind,

    /// Number of installments.
    pub count: u32,

    /// Amount paid per installment, balanced automatically if omitted.
    #[serde(default)]
    pub amount: Option<Money>,
}

/// Files attached to a [`Draft`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Attachments {
    /// Images of the client's national ID.
    pub national_id_images: Vec<PathBuf>,

    /// Receipt of the paid reservation deposit.
    pub deposit_receipt: Option<PathBuf>,

    /// Any other supporting documents.
    pub other: Vec<PathBuf>,
}

impl Attachments {
    /// Returns the attached files grouped by their [`media::Category`].
    #[must_use]
    pub fn by_category(&self) -> Vec<(media::Category, Vec<PathBuf>)> {
        [
            (
                media::Category::NationalIdImages,
                self.national_id_images.clone(),
            ),
            (
                media::Category::DepositReceipt,
                self.deposit_receipt.iter().cloned().collect(),
            ),
            (media::Category::Attachments, self.other.clone()),
        ]
        .into_iter()
        .filter(|(_, paths)| !paths.is_empty())
        .collect()
    }
}
