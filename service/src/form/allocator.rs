//! [`Allocation`] of a remaining balance across installment tracks.

use common::Money;
use derive_more::{Display, Error};

use crate::domain::installment::{self, Detail};

/// Installment tracks selected for a reservation.
///
/// Tracks are kept in the selection order, which is significant: the last
/// selected track absorbs whatever is left of the remaining balance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Allocation {
    /// Selected tracks.
    tracks: Vec<Detail>,
}

impl Allocation {
    /// Returns the selected tracks in selection order.
    #[must_use]
    pub fn tracks(&self) -> &[Detail] {
        &self.tracks
    }

    /// Returns the selected track of the provided [`installment::Kind`], if
    /// any.
    #[must_use]
    pub fn get(&self, kind: installment::Kind) -> Option<&Detail> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// Indicates whether no tracks are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Indicates whether the track of the provided [`installment::Kind`] is
    /// the last selected one.
    #[must_use]
    pub fn is_last(&self, kind: installment::Kind) -> bool {
        self.tracks.last().is_some_and(|t| t.kind == kind)
    }

    /// Returns total amount of money paid by all the selected tracks.
    #[must_use]
    pub fn total(&self) -> Money {
        self.tracks.iter().map(Detail::total).sum()
    }

    /// Toggles the track of the provided [`installment::Kind`].
    ///
    /// A newly selected track starts zeroed and becomes the last one, while a
    /// deselected track is dropped along with its allocation.
    ///
    /// Returns whether the track is selected afterwards.
    pub fn toggle(&mut self, kind: installment::Kind) -> bool {
        if let Some(pos) = self.tracks.iter().position(|t| t.kind == kind) {
            _ = self.tracks.remove(pos);
            false
        } else {
            self.tracks.push(Detail::zeroed(kind));
            true
        }
    }

    /// Selects the only track of the provided [`installment::Kind`], paying
    /// the whole `remaining` balance in a single installment.
    pub fn seed(&mut self, kind: installment::Kind, remaining: Money) {
        self.tracks = vec![Detail {
            kind,
            count: 1,
            amount: remaining,
        }];
    }

    /// Sets the number of installments of the selected track.
    ///
    /// # Errors
    ///
    /// If the track is not selected.
    pub fn set_count(
        &mut self,
        kind: installment::Kind,
        count: u32,
    ) -> Result<(), NotSelected> {
        self.track_mut(kind)?.count = count;
        Ok(())
    }

    /// Sets the amount paid per installment of the selected track.
    ///
    /// # Errors
    ///
    /// If the track is not selected.
    pub fn set_amount(
        &mut self,
        kind: installment::Kind,
        amount: Money,
    ) -> Result<(), NotSelected> {
        self.track_mut(kind)?.amount = amount;
        Ok(())
    }

    /// Recalculates the amount of the last selected track, so all the tracks
    /// together pay exactly the `remaining` balance.
    ///
    /// The residue is split evenly across the installments of the last
    /// track, or put into its amount as is while its count is still zero.
    /// Other tracks keep what the user entered.
    pub fn reconcile(&mut self, remaining: Money) {
        let Some((last, others)) = self.tracks.split_last_mut() else {
            return;
        };
        let allocated = others.iter().map(Detail::total).sum::<Money>();
        let residue = remaining - allocated;
        last.amount = if last.count == 0 {
            residue
        } else {
            residue / last.count
        };
    }

    /// Indicates whether all the selected tracks together pay the
    /// `remaining` balance, tolerating rounding.
    #[must_use]
    pub fn covers(&self, remaining: Money) -> bool {
        self.total().approx_eq(remaining)
    }

    /// Returns the mutable selected track of the provided
    /// [`installment::Kind`].
    fn track_mut(
        &mut self,
        kind: installment::Kind,
    ) -> Result<&mut Detail, NotSelected> {
        self.tracks
            .iter_mut()
            .find(|t| t.kind == kind)
            .ok_or(NotSelected(kind))
    }
}

/// Error of editing an installment track which is not selected.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`{_0}` installment track is not selected")]
pub struct NotSelected(#[error(not(source))] pub installment::Kind);
