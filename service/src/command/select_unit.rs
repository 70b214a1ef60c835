//! [`Command`] for selecting a [`Unit`] in a reservation [`Form`].

use tracerr::Traced;

use crate::{
    domain::unit,
    form::{self, SelectionError, UnitDetails},
    Service,
};
#[cfg(doc)]
use crate::{domain::Unit, form::Form};

use super::Command;

/// [`Command`] for selecting a [`Unit`] in a reservation [`Form`], seeding
/// its payment figures.
#[derive(Clone, Debug)]
pub struct SelectUnit {
    /// [`form::Session`] to select the [`Unit`] in.
    pub session: form::Session,

    /// ID of the [`Unit`] to select.
    pub unit: unit::Id,
}

impl<Api> Command<SelectUnit> for Service<Api> {
    type Ok = UnitDetails;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SelectUnit) -> Result<Self::Ok, Self::Err> {
        let SelectUnit { session, unit } = cmd;

        session
            .with(|f| f.select_unit(unit).cloned())
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`SelectUnit`] [`Command`] execution.
pub type ExecutionError = SelectionError;
