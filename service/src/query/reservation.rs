//! [`Query`] collection related to a single [`Reservation`].

use common::operations::By;

use crate::domain::{reservation, Reservation};
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries a [`Reservation`] by its [`reservation::Id`].
pub type ById = BackendQuery<By<Option<Reservation>, reservation::Id>>;
