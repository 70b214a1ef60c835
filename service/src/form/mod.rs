//! Reservation [`Form`] of a unit.
//!
//! [`Form`] is a synchronous reducer: every event mutates it and derived
//! payment figures are recomputed right away, while network round trips are
//! driven from outside by the [`command`]s.
//!
//! [`command`]: crate::command

pub mod allocator;
pub mod attachments;
pub mod cascade;
pub mod notice;
pub mod pricing;
pub mod submission;
pub mod validation;

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use common::Money;
use derive_more::{Display, Error, From};
use time::Date;
use tracing as log;

use crate::domain::{
    building, client, installment, media, project, reservation, unit,
    Building, Project, Unit,
};

pub use self::{
    allocator::Allocation,
    attachments::Attachments,
    cascade::{Applied, Cascade, SelectionError, Ticket},
    notice::{Notice, Resource},
    validation::Errors,
};

/// Working copy of the selected [`Unit`] along with its payment figures.
#[derive(Clone, Debug)]
pub struct UnitDetails {
    /// Snapshot of the selected [`Unit`].
    unit: Unit,

    /// Amount paid to hold the [`Unit`], as entered.
    reservation_deposit: Money,

    /// Amount paid upfront.
    down_payment: Money,

    /// Price of the [`Unit`] with all the project expenses applied.
    final_price: Money,

    /// Part of the [`UnitDetails::final_price`] left for installments.
    remaining: Money,

    /// Installment tracks paying the [`UnitDetails::remaining`] balance.
    allocation: Allocation,
}

impl UnitDetails {
    /// Returns the snapshot of the selected [`Unit`].
    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Returns the reservation deposit.
    #[must_use]
    pub fn reservation_deposit(&self) -> Money {
        self.reservation_deposit
    }

    /// Returns the down payment.
    #[must_use]
    pub fn down_payment(&self) -> Money {
        self.down_payment
    }

    /// Returns the final price.
    #[must_use]
    pub fn final_price(&self) -> Money {
        self.final_price
    }

    /// Returns the remaining balance.
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.remaining
    }

    /// Returns the installment [`Allocation`].
    #[must_use]
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }
}

/// Failure of a [`reservation::Submission`] reported back to a [`Form`].
#[derive(Clone, Debug)]
pub enum SubmissionFailure {
    /// Backend rejected the submission.
    Rejected {
        /// Summary message of the rejection.
        message: String,

        /// Field-level errors, possibly several per field.
        errors: Vec<(String, Vec<String>)>,
    },

    /// Backend could not be reached.
    Connectivity,

    /// Anything else went wrong.
    Other,
}

/// Place to navigate to once a reservation is created.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Navigation {
    /// Detail view of the created reservation.
    ReservationDetail(reservation::Id),
}

/// Reservation form of a unit.
#[derive(Debug, Default)]
pub struct Form {
    /// Client data as entered.
    pub client: client::Draft,

    /// Date of the reservation, defaulting to the submission day.
    pub reservation_date: Option<Date>,

    /// Date of the contract, if already known.
    pub contract_date: Option<Date>,

    /// Project, building and unit selections.
    cascade: Cascade,

    /// Details of the selected unit.
    details: Option<UnitDetails>,

    /// Picked attachments.
    attachments: Attachments,

    /// Field-level errors of the last validation or submission.
    errors: Errors,

    /// Raised [`Notice`]s not taken yet.
    notices: VecDeque<Notice>,

    /// Indicator whether a submission is in flight.
    is_submitting: bool,

    /// Reservation created by this [`Form`], if any.
    submitted: Option<reservation::Id>,
}

impl Form {
    /// Returns the selection [`Cascade`].
    #[must_use]
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Returns [`UnitDetails`] of the selected unit, if any.
    #[must_use]
    pub fn details(&self) -> Option<&UnitDetails> {
        self.details.as_ref()
    }

    /// Returns picked [`Attachments`].
    #[must_use]
    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    /// Returns field-level [`Errors`].
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Indicates whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Returns the reservation created by this [`Form`], if any.
    #[must_use]
    pub fn submitted(&self) -> Option<reservation::Id> {
        self.submitted
    }

    /// Takes all the raised [`Notice`]s.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Recomputes derived payment figures out of the current inputs.
    ///
    /// Running it again without changing anything yields the same figures.
    pub fn recompute(&mut self) {
        let (Some(project), Some(_)) =
            (self.cascade.project(), self.cascade.unit())
        else {
            self.details = None;
            return;
        };
        let Some(details) = self.details.as_mut() else {
            return;
        };

        let quote = pricing::quote(
            details.unit.price,
            &project.additional_expenses,
            details.down_payment,
        );
        details.final_price = quote.final_price;
        details.remaining = quote.remaining;
        details.allocation.reconcile(quote.remaining);
    }

    /// Starts (re)loading the [`Project`]s list.
    pub fn load_projects(&mut self) -> Ticket<()> {
        self.cascade.load_projects()
    }

    /// Applies the result of the [`Project`]s list fetch.
    pub fn apply_projects<E>(
        &mut self,
        ticket: Ticket<()>,
        result: Result<Vec<Project>, E>,
    ) -> Applied {
        let is_failed = result.is_err();
        let applied = self.cascade.apply_projects(ticket, result);
        if applied == Applied::Fresh && is_failed {
            self.raise(Notice::FetchFailed(Resource::Projects));
        }
        self.recompute();
        applied
    }

    /// Selects the [`Project`] with the provided ID.
    ///
    /// # Errors
    ///
    /// See [`Cascade::select_project()`].
    pub fn select_project(
        &mut self,
        id: project::Id,
    ) -> Result<Ticket<project::Id>, SelectionError> {
        let ticket = self.cascade.select_project(id)?;
        self.recompute();
        Ok(ticket)
    }

    /// Applies the result of the [`Building`]s fetch.
    pub fn apply_buildings<E>(
        &mut self,
        ticket: Ticket<project::Id>,
        result: Result<Vec<Building>, E>,
    ) -> Applied {
        let is_failed = result.is_err();
        let applied = self.cascade.apply_buildings(ticket, result);
        if applied == Applied::Fresh && is_failed {
            self.raise(Notice::FetchFailed(Resource::Buildings));
        }
        self.recompute();
        applied
    }

    /// Selects the [`Building`] with the provided ID.
    ///
    /// # Errors
    ///
    /// See [`Cascade::select_building()`].
    pub fn select_building(
        &mut self,
        id: building::Id,
    ) -> Result<Ticket<building::Id>, SelectionError> {
        let ticket = self.cascade.select_building(id)?;
        self.recompute();
        Ok(ticket)
    }

    /// Applies the result of the [`Unit`]s fetch.
    pub fn apply_units<E>(
        &mut self,
        ticket: Ticket<building::Id>,
        result: Result<Vec<Unit>, E>,
    ) -> Applied {
        let is_failed = result.is_err();
        let applied = self.cascade.apply_units(ticket, result);
        if applied == Applied::Fresh && is_failed {
            self.raise(Notice::FetchFailed(Resource::Units));
        }
        self.recompute();
        applied
    }

    /// Selects the [`Unit`] with the provided ID, populating fresh
    /// [`UnitDetails`].
    ///
    /// The down payment is seeded from the project deposit percentage, and
    /// the only installment track of the project, if it has exactly one, is
    /// selected paying the whole remaining balance.
    ///
    /// # Errors
    ///
    /// See [`Cascade::select_unit()`].
    pub fn select_unit(
        &mut self,
        id: unit::Id,
    ) -> Result<&UnitDetails, SelectionError> {
        let unit = match self.cascade.select_unit(id).cloned() {
            Ok(unit) => unit,
            Err(e) => {
                if matches!(e, SelectionError::UnitUnavailable(_)) {
                    self.raise(Notice::UnitUnavailable);
                }
                return Err(e);
            }
        };
        let project = self
            .cascade
            .project()
            .ok_or(SelectionError::NoProject)?;

        let down_payment = pricing::default_down_payment(
            unit.price,
            project.deposit_percentage,
        );
        let quote = pricing::quote(
            unit.price,
            &project.additional_expenses,
            down_payment,
        );
        let mut allocation = Allocation::default();
        if let Some(kind) = project.sole_installment_kind() {
            allocation.seed(kind, quote.remaining);
        }

        Ok(&*self.details.insert(UnitDetails {
            unit,
            reservation_deposit: Money::ZERO,
            down_payment,
            final_price: quote.final_price,
            remaining: quote.remaining,
            allocation,
        }))
    }

    /// Toggles the installment track of the provided [`installment::Kind`].
    ///
    /// Returns whether the track is selected afterwards.
    ///
    /// # Errors
    ///
    /// If no unit is selected, or the project doesn't allow the track.
    pub fn toggle_track(
        &mut self,
        kind: installment::Kind,
    ) -> Result<bool, PaymentError> {
        let is_allowed = self
            .cascade
            .project()
            .is_some_and(|p| p.installment_kinds.contains(&kind));
        let details = self.details.as_mut().ok_or(PaymentError::NoUnit)?;
        if !is_allowed {
            return Err(PaymentError::NotAllowed(kind));
        }

        let is_selected = details.allocation.toggle(kind);
        self.recompute();
        Ok(is_selected)
    }

    /// Sets the number of installments of the selected track.
    ///
    /// # Errors
    ///
    /// If no unit is selected, or the track is not selected.
    pub fn set_track_count(
        &mut self,
        kind: installment::Kind,
        count: u32,
    ) -> Result<(), PaymentError> {
        self.details
            .as_mut()
            .ok_or(PaymentError::NoUnit)?
            .allocation
            .set_count(kind, count)?;
        self.recompute();
        Ok(())
    }

    /// Sets the amount paid per installment of the selected track.
    ///
    /// The amount of the last selected track is kept as entered until the
    /// next event recomputes it.
    ///
    /// # Errors
    ///
    /// If no unit is selected, or the track is not selected.
    pub fn set_track_amount(
        &mut self,
        kind: installment::Kind,
        amount: Money,
    ) -> Result<(), PaymentError> {
        let allocation =
            &mut self.details.as_mut().ok_or(PaymentError::NoUnit)?.allocation;
        allocation.set_amount(kind, amount)?;
        if !allocation.is_last(kind) {
            self.recompute();
        }
        Ok(())
    }

    /// Overrides the down payment.
    ///
    /// # Errors
    ///
    /// If no unit is selected.
    pub fn set_down_payment(&mut self, amount: Money) -> Result<(), PaymentError> {
        self.details.as_mut().ok_or(PaymentError::NoUnit)?.down_payment = amount;
        self.recompute();
        Ok(())
    }

    /// Sets the reservation deposit.
    ///
    /// # Errors
    ///
    /// If no unit is selected.
    pub fn set_reservation_deposit(
        &mut self,
        amount: Money,
    ) -> Result<(), PaymentError> {
        self.details
            .as_mut()
            .ok_or(PaymentError::NoUnit)?
            .reservation_deposit = amount;
        self.recompute();
        Ok(())
    }

    /// Picks the provided [`media::File`]s for the [`media::Category`].
    ///
    /// Returns the [`attachments::Batch`] to be uploaded.
    ///
    /// # Errors
    ///
    /// See [`Attachments::select()`].
    pub fn select_files(
        &mut self,
        category: media::Category,
        files: Vec<media::File>,
    ) -> Result<attachments::Batch, attachments::SelectError> {
        let selected = self.attachments.select(category, files);
        if let Err(attachments::SelectError::LimitExceeded { category, limit }) =
            selected
        {
            self.raise(Notice::LimitExceeded { category, limit });
        }
        selected
    }

    /// Records the upload result of a picked [`media::File`].
    pub fn resolve_upload(
        &mut self,
        category: media::Category,
        key: attachments::ItemKey,
        uploaded: Option<media::Id>,
    ) {
        self.attachments.resolve(category, key, uploaded);
    }

    /// Settles the uploaded [`attachments::Batch`], rolling it back if any
    /// of its uploads failed.
    pub fn settle_uploads(
        &mut self,
        batch: &attachments::Batch,
    ) -> attachments::Settled {
        let settled = self.attachments.settle(batch);
        if settled.is_rolled_back() {
            self.raise(Notice::UploadFailed {
                category: batch.category,
                files: settled.rolled_back,
            });
        }
        settled
    }

    /// Removes a picked [`media::File`], see [`Attachments::remove()`].
    pub fn remove_file(
        &mut self,
        category: media::Category,
        index: Option<usize>,
    ) -> usize {
        self.attachments.remove(category, index).len()
    }

    /// Validates this [`Form`], replacing its [`Errors`].
    ///
    /// Returns the validated client data if nothing is wrong.
    pub fn validate(&mut self) -> Option<client::Data> {
        self.recompute();
        self.errors.clear();

        let client = validation::client(&self.client, &mut self.errors);
        validation::attachments(&self.attachments, &mut self.errors);
        validation::payment(self.details.as_ref(), &mut self.errors);

        if self.errors.is_empty() {
            client
        } else {
            None
        }
    }

    /// Prepares a [`reservation::Submission`] of this [`Form`], marking it as
    /// being submitted.
    ///
    /// # Errors
    ///
    /// If another submission or any upload is in flight, leaving the
    /// [`Errors`] untouched, or if this [`Form`] is invalid.
    pub fn prepare_submission(
        &mut self,
        today: Date,
    ) -> Result<reservation::Submission, NotReady> {
        if self.is_submitting {
            return Err(NotReady::Submitting);
        }
        if self.attachments.is_any_uploading() {
            self.raise(Notice::UploadInProgress);
            return Err(NotReady::Uploading);
        }

        let (Some(client), Some(details)) =
            (self.validate(), self.details.as_ref())
        else {
            let invalid = self.errors.len();
            self.raise(Notice::Invalid(invalid));
            return Err(NotReady::Invalid(invalid));
        };

        let submission = submission::build(
            &client,
            self.reservation_date.unwrap_or(today),
            self.contract_date,
            details,
            &self.attachments,
        );
        self.is_submitting = true;
        Ok(submission)
    }

    /// Completes the in-flight submission with the created reservation.
    pub fn complete_submission(&mut self, id: reservation::Id) -> Navigation {
        self.is_submitting = false;
        self.submitted = Some(id);
        self.raise(Notice::Submitted(id));
        Navigation::ReservationDetail(id)
    }

    /// Fails the in-flight submission.
    ///
    /// Field-level errors reported by the backend are merged into the
    /// [`Errors`].
    pub fn fail_submission(&mut self, failure: SubmissionFailure) {
        self.is_submitting = false;
        let notice = match failure {
            SubmissionFailure::Rejected { message, errors } => {
                self.errors.merge(errors.iter().map(|(f, m)| (f, m)));
                if message.is_empty() {
                    Notice::Invalid(self.errors.len())
                } else {
                    Notice::Rejected(message)
                }
            }
            SubmissionFailure::Connectivity => Notice::Connectivity,
            SubmissionFailure::Other => Notice::SubmissionFailed,
        };
        self.raise(notice);
    }

    /// Raises the provided [`Notice`] for the user.
    fn raise(&mut self, notice: Notice) {
        log::debug!("raised notice: {notice}");
        self.notices.push_back(notice);
    }
}

/// Error of editing payment figures of a [`Form`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, From, PartialEq)]
pub enum PaymentError {
    /// No unit is selected.
    #[display("no unit is selected")]
    NoUnit,

    /// Project doesn't allow the installment track.
    #[display("`{_0}` installment track is not allowed by the project")]
    #[from(ignore)]
    NotAllowed(#[error(not(source))] installment::Kind),

    /// Installment track is not selected.
    #[display("{_0}")]
    NotSelected(allocator::NotSelected),
}

/// Reason a [`Form`] can't be submitted right now.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum NotReady {
    /// Another submission is in flight.
    #[display("submission is in flight already")]
    Submitting,

    /// Some attachments are still being uploaded.
    #[display("attachments are still being uploaded")]
    Uploading,

    /// Some fields are invalid.
    #[display("{_0} field(s) are invalid")]
    Invalid(#[error(not(source))] usize),
}

/// [`Form`] shared between the [`command`]s driving it.
///
/// The [`Form`] is only ever touched on a single thread, and never borrowed
/// across an `.await`.
///
/// [`command`]: crate::command
#[derive(Clone, Debug, Default)]
pub struct Session(Rc<RefCell<Form>>);

impl Session {
    /// Creates a new [`Session`] of a fresh [`Form`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the provided function over the [`Form`].
    pub fn with<R>(&self, f: impl FnOnce(&mut Form) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Reads the [`Form`] with the provided function.
    pub fn read<R>(&self, f: impl FnOnce(&Form) -> R) -> R {
        f(&self.0.borrow())
    }
}
