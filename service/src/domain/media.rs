//! Uploaded media definitions.

use std::{fmt, sync::Arc};

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

define_kind! {
    #[doc = "Category of a reservation attachment."]
    enum Category {
        #[doc = "Images of the client's national ID."]
        NationalIdImages,

        #[doc = "Receipt of the paid reservation deposit."]
        DepositReceipt,

        #[doc = "Any other supporting documents."]
        Attachments,
    }
}

impl Category {
    /// Indicates whether this [`Category`] holds multiple [`File`]s.
    #[must_use]
    pub const fn is_multiple(self) -> bool {
        !matches!(self, Self::DepositReceipt)
    }

    /// Returns the maximum number of [`File`]s in this [`Category`], if it's
    /// bounded.
    #[must_use]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Self::NationalIdImages => Some(2),
            Self::DepositReceipt => Some(1),
            Self::Attachments => None,
        }
    }
}

/// ID of an uploaded media, assigned by the backend.
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

/// File picked on the client side.
///
/// Cloning a [`File`] is cheap, as its content is shared.
#[derive(Clone, Eq, PartialEq)]
pub struct File {
    /// Name of this [`File`].
    pub name: String,

    /// MIME type of this [`File`], if known.
    pub mime: Option<String>,

    /// Content of this [`File`].
    pub content: Arc<[u8]>,
}

impl File {
    /// Creates a new [`File`] out of its name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            content: content.into(),
        }
    }

    /// Sets the MIME type of this [`File`].
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Returns size of this [`File`] in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.size())
            .finish()
    }
}

/// Request to upload a [`File`] into a [`Category`] collection.
#[derive(Clone, Debug)]
pub struct Upload {
    /// [`File`] to be uploaded.
    pub file: File,

    /// [`Category`] naming the collection the [`File`] is uploaded to.
    pub category: Category,
}
