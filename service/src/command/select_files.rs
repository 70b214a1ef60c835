//! [`Command`] for attaching files to a reservation [`Form`].

use common::operations::Insert;
use futures::future;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::media,
    form::{self, attachments},
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::form::Form;

use super::Command;

/// [`Command`] for picking [`media::File`]s of a [`media::Category`] and
/// uploading them right away.
///
/// Each [`media::File`] is uploaded concurrently. Once every upload
/// settles, the whole batch is rolled back if any of them failed.
#[derive(Clone, Debug)]
pub struct SelectFiles {
    /// [`form::Session`] to attach the [`media::File`]s to.
    pub session: form::Session,

    /// [`media::Category`] to attach the [`media::File`]s as.
    pub category: media::Category,

    /// Picked [`media::File`]s.
    pub files: Vec<media::File>,
}

impl<Api> Command<SelectFiles> for Service<Api>
where
    Api: Backend<
        Insert<media::Upload>,
        Ok = media::Id,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = attachments::Settled;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SelectFiles) -> Result<Self::Ok, Self::Err> {
        let SelectFiles {
            session,
            category,
            files,
        } = cmd;

        let batch = session
            .with(|f| f.select_files(category, files))
            .map_err(tracerr::wrap!())?;

        let uploads = batch.files.iter().map(|(key, file)| {
            let session = &session;
            let upload = media::Upload {
                file: file.clone(),
                category,
            };
            async move {
                let uploaded = match self.request(Insert(upload)).await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log::warn!("failed to upload `{category}` file: {e}");
                        None
                    }
                };
                session.with(|f| f.resolve_upload(category, *key, uploaded));
            }
        });
        _ = future::join_all(uploads).await;

        Ok(session.with(|f| f.settle_uploads(&batch)))
    }
}

/// Error of [`SelectFiles`] [`Command`] execution.
pub type ExecutionError = attachments::SelectError;
