//! Serialization of a validated reservation into a [`Submission`].

use time::Date;

use crate::{
    domain::{client, media::Category, reservation::Submission},
    form::{attachments::Attachments, UnitDetails},
};

/// Builds a [`Submission`] out of the validated reservation data.
///
/// Fields are laid out in the order the backend documents them, with
/// installment tracks and uploaded media listed as indexed arrays.
///
/// Installment amounts keep their full precision, so their totals still
/// cover the remaining balance once the backend multiplies them back.
#[must_use]
pub fn build(
    client: &client::Data,
    reservation_date: Date,
    contract_date: Option<Date>,
    details: &UnitDetails,
    attachments: &Attachments,
) -> Submission {
    let mut sub = Submission::default();

    sub.push("client[name]", &client.name);
    sub.push("client[phone]", &client.phone);
    sub.push("client[national_id]", &client.national_id);
    sub.push("client[address]", &client.address);
    if let Some(email) = &client.email {
        sub.push("client[email]", email);
    }

    sub.push("reservation_date", reservation_date);
    if let Some(date) = contract_date {
        sub.push("contract_date", date);
    }

    sub.push("unit_id", details.unit().id);
    sub.push("reservation_deposit", details.reservation_deposit());
    sub.push("down_payment", details.down_payment());
    sub.push("final_price", details.final_price());

    for (i, track) in details.allocation().tracks().iter().enumerate() {
        sub.push(format!("installments_details[{i}][type]"), track.kind);
        sub.push(format!("installments_details[{i}][count]"), track.count);
        sub.push(
            format!("installments_details[{i}][amount]"),
            track.amount.to_exact_string(),
        );
    }

    for (i, id) in attachments
        .uploaded(Category::NationalIdImages)
        .into_iter()
        .enumerate()
    {
        sub.push(format!("national_id_images[{i}]"), id);
    }
    if let Some(id) = attachments.uploaded(Category::DepositReceipt).first() {
        sub.push("deposit_receipt", id);
    }
    for (i, id) in attachments
        .uploaded(Category::Attachments)
        .into_iter()
        .enumerate()
    {
        sub.push(format!("attachments[{i}]"), id);
    }

    sub
}
