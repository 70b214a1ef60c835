//! Field-level validation of a reservation [`Form`].

use std::collections::{btree_map, BTreeMap};

use crate::{
    domain::{
        client::{self, Address, Email, Name, NationalId, Phone},
        media::Category,
    },
    form::{attachments::Attachments, UnitDetails},
};
#[cfg(doc)]
use crate::form::Form;

/// Field-level errors of a [`Form`], keyed by field path.
///
/// Field paths use the dotted notation of the backend validation errors
/// (`client.name`, `installments_details.0.count`), so errors reported by
/// the backend land under the same keys as the locally detected ones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Errors(BTreeMap<String, String>);

impl Errors {
    /// Records an error `message` for the `field`, unless the `field` has one
    /// already.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        _ = self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Merges errors reported by the backend into these [`Errors`], taking
    /// the first message of each field.
    pub fn merge<'a, I, M>(&mut self, reported: I)
    where
        I: IntoIterator<Item = (&'a String, M)>,
        M: IntoIterator<Item = &'a String>,
    {
        for (field, messages) in reported {
            if let Some(message) = messages.into_iter().next() {
                self.insert(field.clone(), message.clone());
            }
        }
    }

    /// Returns the error message of the `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Indicates whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields having errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes all the errors.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates over the fields and their error messages.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validates the client [`client::Draft`], returning the [`client::Data`] if
/// it's valid.
pub fn client(draft: &client::Draft, errors: &mut Errors) -> Option<client::Data> {
    let name = Name::new(&draft.name);
    if name.is_none() {
        errors.insert("client.name", "Name is required");
    }
    let phone = Phone::new(&draft.phone);
    if phone.is_none() {
        errors.insert("client.phone", "Phone is required");
    }
    let national_id = NationalId::new(&draft.national_id);
    if national_id.is_none() {
        errors.insert("client.national_id", "National ID is required");
    }
    let address = Address::new(&draft.address);
    if address.is_none() {
        errors.insert("client.address", "Address is required");
    }
    let email = if draft.email.trim().is_empty() {
        Some(None)
    } else {
        let email = Email::new(&draft.email);
        if email.is_none() {
            errors.insert("client.email", "Email is invalid");
        }
        email.map(Some)
    };

    Some(client::Data {
        name: name?,
        phone: phone?,
        national_id: national_id?,
        address: address?,
        email: email?,
    })
}

/// Validates the [`Attachments`] required by a reservation.
pub fn attachments(attachments: &Attachments, errors: &mut Errors) {
    if attachments.uploaded(Category::NationalIdImages).is_empty() {
        errors.insert(
            "national_id_images",
            "At least one national ID image is required",
        );
    }
    if attachments.uploaded(Category::DepositReceipt).is_empty() {
        errors.insert("deposit_receipt", "Deposit receipt is required");
    }
}

/// Validates the payment figures and installment tracks of the selected unit.
pub fn payment(details: Option<&UnitDetails>, errors: &mut Errors) {
    let Some(details) = details else {
        errors.insert("unit_id", "Unit is required");
        return;
    };

    if !details.reservation_deposit().is_positive() {
        errors.insert(
            "reservation_deposit",
            "Reservation deposit must be greater than zero",
        );
    }
    if !details.down_payment().is_positive() {
        errors.insert("down_payment", "Down payment must be greater than zero");
    }

    let allocation = details.allocation();
    if allocation.is_empty() {
        errors.insert(
            "installments_details",
            "At least one installment type is required",
        );
    }
    for (i, track) in allocation.tracks().iter().enumerate() {
        if track.count == 0 {
            errors.insert(
                format!("installments_details.{i}.count"),
                "Installments count must be greater than zero",
            );
        }
        if !track.amount.is_positive() {
            errors.insert(
                format!("installments_details.{i}.amount"),
                "Installment amount must be greater than zero",
            );
        }
    }
    if !allocation.covers(details.remaining()) {
        errors.insert(
            "installments_total",
            format!(
                "Installments total {} must match the remaining amount {}",
                allocation.total(),
                details.remaining(),
            ),
        );
    }
}
