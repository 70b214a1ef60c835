//! [`Attachments`] of a reservation, uploaded as soon as they're picked.

use std::collections::HashMap;

use derive_more::{Display, Error};

use crate::domain::media::{self, Category, File};

/// Key identifying an [`Item`] regardless of its position.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct ItemKey(u64);

/// ID of a [`Batch`] of [`File`]s picked at once.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct BatchId(u64);

/// Upload state of an [`Item`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Upload is in flight.
    Pending,

    /// [`File`] is uploaded under the provided [`media::Id`].
    Uploaded(media::Id),

    /// Upload failed, the [`Item`] is removed once its [`Batch`] settles.
    Failed,
}

/// [`File`] picked for a [`Category`].
#[derive(Clone, Debug)]
pub struct Item {
    /// [`ItemKey`] of this [`Item`].
    pub key: ItemKey,

    /// [`Batch`] this [`Item`] was picked in.
    pub batch: BatchId,

    /// Picked [`File`].
    pub file: File,

    /// Upload [`State`] of this [`Item`].
    pub state: State,
}

/// [`File`]s picked at once, to be uploaded concurrently.
#[derive(Clone, Debug)]
pub struct Batch {
    /// ID of this [`Batch`].
    pub id: BatchId,

    /// [`Category`] the [`File`]s were picked for.
    pub category: Category,

    /// Picked [`File`]s along with the keys of their [`Item`]s.
    pub files: Vec<(ItemKey, File)>,
}

/// Outcome of a settled [`Batch`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settled {
    /// Number of uploaded [`File`]s kept in the [`Category`].
    pub uploaded: usize,

    /// Number of [`File`]s removed from the [`Category`] because the
    /// [`Batch`] failed.
    pub rolled_back: usize,
}

impl Settled {
    /// Indicates whether the [`Batch`] was rolled back.
    #[must_use]
    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back > 0
    }
}

/// [`Item`]s of a single [`Category`].
#[derive(Clone, Debug, Default)]
struct Slot {
    /// Picked [`Item`]s in the order they were picked.
    items: Vec<Item>,

    /// Number of [`Batch`]es in flight.
    in_flight: usize,
}

/// Attachments of a reservation, grouped by [`Category`].
#[derive(Clone, Debug, Default)]
pub struct Attachments {
    /// [`Slot`]s of the [`Category`]s having anything picked.
    slots: HashMap<Category, Slot>,

    /// Last issued [`ItemKey`].
    last_key: u64,

    /// Last issued [`BatchId`].
    last_batch: u64,
}

impl Attachments {
    /// Returns [`Item`]s picked for the provided [`Category`].
    #[must_use]
    pub fn items(&self, category: Category) -> &[Item] {
        self.slots
            .get(&category)
            .map_or(&[], |s| s.items.as_slice())
    }

    /// Returns [`media::Id`]s of the uploaded [`File`]s of the provided
    /// [`Category`], in the order the [`File`]s were picked.
    #[must_use]
    pub fn uploaded(&self, category: Category) -> Vec<media::Id> {
        self.items(category)
            .iter()
            .filter_map(|i| match i.state {
                State::Uploaded(id) => Some(id),
                State::Pending | State::Failed => None,
            })
            .collect()
    }

    /// Indicates whether any upload of the provided [`Category`] is in
    /// flight.
    #[must_use]
    pub fn is_uploading(&self, category: Category) -> bool {
        self.slots.get(&category).is_some_and(|s| s.in_flight > 0)
    }

    /// Indicates whether any upload is in flight.
    #[must_use]
    pub fn is_any_uploading(&self) -> bool {
        self.slots.values().any(|s| s.in_flight > 0)
    }

    /// Picks the provided [`File`]s for the [`Category`], marking them as
    /// being uploaded.
    ///
    /// A single-file [`Category`] has its previous [`File`] replaced.
    ///
    /// # Errors
    ///
    /// If no [`File`]s are provided, or they don't fit into the
    /// [`Category`] limit. Nothing is picked in such case.
    pub fn select(
        &mut self,
        category: Category,
        files: Vec<File>,
    ) -> Result<Batch, SelectError> {
        if files.is_empty() {
            return Err(SelectError::NoFiles);
        }
        let current = if category.is_multiple() {
            self.items(category).len()
        } else {
            0
        };
        if let Some(limit) = category.limit() {
            if current + files.len() > limit {
                return Err(SelectError::LimitExceeded { category, limit });
            }
        }

        self.last_batch += 1;
        let batch = BatchId(self.last_batch);
        let slot = self.slots.entry(category).or_default();
        if !category.is_multiple() {
            slot.items.clear();
        }
        slot.in_flight += 1;

        let files = files
            .into_iter()
            .map(|file| {
                self.last_key += 1;
                let key = ItemKey(self.last_key);
                slot.items.push(Item {
                    key,
                    batch,
                    file: file.clone(),
                    state: State::Pending,
                });
                (key, file)
            })
            .collect();

        Ok(Batch {
            id: batch,
            category,
            files,
        })
    }

    /// Records the upload result of the [`Item`] with the provided
    /// [`ItemKey`].
    ///
    /// Results of [`Item`]s removed in the meantime are ignored.
    pub fn resolve(
        &mut self,
        category: Category,
        key: ItemKey,
        uploaded: Option<media::Id>,
    ) {
        let Some(item) = self
            .slots
            .get_mut(&category)
            .and_then(|s| s.items.iter_mut().find(|i| i.key == key))
        else {
            return;
        };
        item.state = uploaded.map_or(State::Failed, State::Uploaded);
    }

    /// Settles the provided [`Batch`] once all its uploads are resolved.
    ///
    /// If any upload of the [`Batch`] failed, all its [`Item`]s are rolled
    /// back, leaving [`Item`]s of other [`Batch`]es intact.
    pub fn settle(&mut self, batch: &Batch) -> Settled {
        let Some(slot) = self.slots.get_mut(&batch.category) else {
            return Settled::default();
        };
        slot.in_flight = slot.in_flight.saturating_sub(1);

        let is_failed = slot
            .items
            .iter()
            .any(|i| i.batch == batch.id && i.state == State::Failed);
        let picked = slot.items.iter().filter(|i| i.batch == batch.id).count();
        if is_failed {
            slot.items.retain(|i| i.batch != batch.id);
            Settled {
                uploaded: 0,
                rolled_back: picked,
            }
        } else {
            Settled {
                uploaded: picked,
                rolled_back: 0,
            }
        }
    }

    /// Removes a picked [`File`] of the provided [`Category`] along with its
    /// [`media::Id`], if already uploaded.
    ///
    /// A multi-file [`Category`] requires the `index` of the [`File`] to
    /// remove, while a single-file [`Category`] is cleared unconditionally.
    ///
    /// Returns the removed [`Item`]s.
    pub fn remove(
        &mut self,
        category: Category,
        index: Option<usize>,
    ) -> Vec<Item> {
        let Some(slot) = self.slots.get_mut(&category) else {
            return vec![];
        };
        if !category.is_multiple() {
            return slot.items.drain(..).collect();
        }
        match index {
            Some(i) if i < slot.items.len() => vec![slot.items.remove(i)],
            Some(_) | None => vec![],
        }
    }
}

/// Error of picking [`File`]s for a [`Category`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum SelectError {
    /// No [`File`]s were provided.
    #[display("no files provided")]
    NoFiles,

    /// [`Category`] limit would be exceeded.
    #[display("at most {limit} `{category}` file(s) are allowed")]
    LimitExceeded {
        /// [`Category`] the [`File`]s were picked for.
        category: Category,

        /// Maximum number of [`File`]s in the [`Category`].
        limit: usize,
    },
}
