//! [`Command`] for selecting a [`Building`] in a reservation [`Form`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{building, Unit},
    form::{self, Applied, SelectionError},
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::{domain::Building, form::Form};

use super::Command;

/// [`Command`] for selecting a [`Building`] in a reservation [`Form`] and
/// loading its [`Unit`]s.
#[derive(Clone, Debug)]
pub struct SelectBuilding {
    /// [`form::Session`] to select the [`Building`] in.
    pub session: form::Session,

    /// ID of the [`Building`] to select.
    pub building: building::Id,
}

impl<Api> Command<SelectBuilding> for Service<Api>
where
    Api: Backend<
        Select<By<Vec<Unit>, building::Id>>,
        Ok = Vec<Unit>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Applied;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SelectBuilding,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SelectBuilding { session, building } = cmd;

        let ticket = session
            .with(|f| f.select_building(building))
            .map_err(tracerr::from_and_wrap!(=> E))?;
        match self.request(Select(By::new(building))).await {
            Ok(units) => {
                Ok(session.with(|f| f.apply_units::<()>(ticket, Ok(units))))
            }
            Err(e) => {
                _ = session.with(|f| f.apply_units(ticket, Err(e.as_ref())));
                Err(e).map_err(tracerr::map_from_and_wrap!(=> E))
            }
        }
    }
}

/// Error of [`SelectBuilding`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// [`Building`] can't be selected.
    #[display("Failed to select `Building`: {_0}")]
    Selection(SelectionError),
}
