//! [`Building`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::domain::project;
#[cfg(doc)]
use crate::domain::Project;

/// Building of a [`Project`].
#[derive(Clone, Debug, Deserialize)]
pub struct Building {
    /// ID of this [`Building`].
    pub id: Id,

    /// ID of the [`Project`] this [`Building`] belongs to.
    pub project_id: project::Id,

    /// [`Name`] of this [`Building`].
    pub name: Name,
}

/// ID of a [`Building`].
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

/// Name of a [`Building`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq)]
#[as_ref(forward)]
#[from(&str, String)]
pub struct Name(String);
