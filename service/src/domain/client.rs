//! Reservation client definitions.

use std::sync::LazyLock;

use derive_more::{AsRef, Display};
use regex::Regex;

/// Client data as entered into a reservation form.
///
/// Nothing is validated until the form is submitted, see [`Data`] for the
/// validated counterpart.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Draft {
    /// Full name of the client.
    pub name: String,

    /// Phone number of the client.
    pub phone: String,

    /// National identifier of the client.
    pub national_id: String,

    /// Address of the client.
    pub address: String,

    /// Email address of the client, empty if not provided.
    pub email: String,
}

/// Validated client data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Data {
    /// [`Name`] of the client.
    pub name: Name,

    /// [`Phone`] of the client.
    pub phone: Phone,

    /// [`NationalId`] of the client.
    pub national_id: NationalId,

    /// [`Address`] of the client.
    pub address: Address,

    /// [`Email`] of the client, if provided.
    pub email: Option<Email>,
}

/// Checks whether the provided value is a non-empty single text line of a
/// reasonable length.
fn is_text(val: &str) -> bool {
    !val.is_empty() && val.len() <= 512 && !val.contains(['\n', '\r'])
}

/// Full name of a client.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        is_text(name).then(|| Self(name.to_owned()))
    }
}

/// Phone number of a client.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        is_text(number).then(|| Self(number.to_owned()))
    }
}

/// National identifier of a client.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct NationalId(String);

impl NationalId {
    /// Creates a new [`NationalId`] if the given `id` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        is_text(id).then(|| Self(id.to_owned()))
    }
}

/// Postal address of a client.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given `address` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim();
        is_text(address).then(|| Self(address.to_owned()))
    }
}

/// Email address of a client.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim();
        Self::check(address).then(|| Self(address.to_owned()))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: &str) -> bool {
        /// Regular expression checking [`Email`] format: a local part
        /// without whitespace or `@`, and a dotted domain.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        address.len() <= 320 && REGEX.is_match(address)
    }
}
