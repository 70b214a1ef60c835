//! Transient user-facing [`Notice`]s.

use derive_more::Display;

use crate::domain::{media, reservation};
#[cfg(doc)]
use crate::form::Form;

/// Transient message a [`Form`] raises for the user.
///
/// [`Notice`]s never block the session: the user may always correct the
/// input and retry.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Notice {
    /// Fetching a list of options failed.
    #[display("Failed to load {_0}")]
    FetchFailed(Resource),

    /// The picked unit may not be reserved.
    #[display("The selected unit is not available")]
    UnitUnavailable,

    /// Too many files were picked for a [`media::Category`].
    #[display("At most {limit} file(s) may be attached as `{category}`")]
    LimitExceeded {
        /// [`media::Category`] the files were picked for.
        category: media::Category,

        /// Maximum number of files in the [`media::Category`].
        limit: usize,
    },

    /// Uploading a batch of files failed, so the batch was rolled back.
    #[display("Failed to upload {files} `{category}` file(s)")]
    UploadFailed {
        /// [`media::Category`] of the rolled back batch.
        category: media::Category,

        /// Number of rolled back files.
        files: usize,
    },

    /// Submission is postponed until all the uploads settle.
    #[display("Please wait until all files are uploaded")]
    UploadInProgress,

    /// The form has invalid fields.
    #[display("Please fix {_0} invalid field(s)")]
    Invalid(usize),

    /// The backend rejected the submission.
    #[display("{_0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[display("Unable to reach the server, check your connection")]
    Connectivity,

    /// The submission failed for any other reason.
    #[display("Failed to create the reservation")]
    SubmissionFailed,

    /// A new reservation was created.
    #[display("Reservation #{_0} created")]
    Submitted(reservation::Id),
}

impl Notice {
    /// Indicates whether this [`Notice`] reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Submitted(_))
    }
}

/// List of options a [`Form`] fetches from the backend.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Resource {
    /// Projects list.
    #[display("projects")]
    Projects,

    /// Buildings of the selected project.
    #[display("buildings")]
    Buildings,

    /// Units of the selected building.
    #[display("units")]
    Units,
}
