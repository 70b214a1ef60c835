//! [`run`]ning a single reservation [`Draft`] against the backend.

use std::{
    io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error as StdError, From};
use service::{
    command::{
        self, LoadProjects, SelectBuilding, SelectFiles, SelectProject,
        SelectUnit, SubmitReservation,
    },
    domain::{media, reservation, Reservation},
    form::{Form, Navigation, PaymentError, Session},
    infra::backend,
    query, Command as _,
};
use time::Date;
use tracerr::Traced;
use tracing as log;

use crate::{Draft, Service};

/// Fills a reservation form out of the provided [`Draft`], submits it and
/// returns the created [`Reservation`].
///
/// Every notice raised by the form along the way is logged.
///
/// # Errors
///
/// If any step of the reservation fails.
pub async fn run(
    service: &Service,
    draft: Draft,
    today: Date,
) -> Result<Reservation, Error> {
    let session = Session::new();

    let res = reserve(service, &session, draft, today).await;
    notify(&session);
    if res.is_err() {
        session.read(|f| {
            for (field, message) in f.errors() {
                log::warn!("`{field}`: {message}");
            }
        });
    }
    res
}

/// Drives the reservation `session` through all its steps.
async fn reserve(
    service: &Service,
    session: &Session,
    draft: Draft,
    today: Date,
) -> Result<Reservation, Error> {
    _ = service
        .execute(LoadProjects {
            session: session.clone(),
        })
        .await
        .map_err(Error::LoadProjects)?;
    _ = service
        .execute(SelectProject {
            session: session.clone(),
            project: draft.project,
        })
        .await?;
    _ = service
        .execute(SelectBuilding {
            session: session.clone(),
            building: draft.building,
        })
        .await?;
    let details = service
        .execute(SelectUnit {
            session: session.clone(),
            unit: draft.unit,
        })
        .await?;
    log::info!(
        "unit `{}` costs {} in total, {} to be paid in installments",
        details.unit().id,
        details.final_price(),
        details.remaining(),
    );
    notify(session);

    session.with(|f| fill(f, &draft))?;

    for (category, paths) in draft.attachments.by_category() {
        let files = read(&paths).await?;
        let settled = service
            .execute(SelectFiles {
                session: session.clone(),
                category,
                files,
            })
            .await?;
        notify(session);
        if settled.is_rolled_back() {
            return Err(Error::UploadFailed(category));
        }
        log::info!("uploaded {} `{category}` file(s)", settled.uploaded);
    }

    let Navigation::ReservationDetail(id) = service
        .execute(SubmitReservation {
            session: session.clone(),
            today,
        })
        .await?;
    notify(session);

    service
        .execute(query::reservation::ById::by(id))
        .await
        .map_err(Error::Detail)?
        .ok_or(Error::NotFound(id))
}

/// Applies the client and payment data of the [`Draft`] to the [`Form`].
fn fill(form: &mut Form, draft: &Draft) -> Result<(), PaymentError> {
    form.client = draft.client.clone().into();
    form.reservation_date = draft.reservation_date;
    form.contract_date = draft.contract_date;

    form.set_reservation_deposit(draft.reservation_deposit)?;
    if let Some(amount) = draft.down_payment {
        form.set_down_payment(amount)?;
    }

    for track in &draft.installments {
        let is_selected = form
            .details()
            .is_some_and(|d| d.allocation().get(track.kind).is_some());
        if !is_selected {
            _ = form.toggle_track(track.kind)?;
        }
        form.set_track_count(track.kind, track.count)?;
        if let Some(amount) = track.amount {
            form.set_track_amount(track.kind, amount)?;
        }
    }

    Ok(())
}

/// Reads the files at the provided `paths`.
async fn read(paths: &[PathBuf]) -> Result<Vec<media::File>, Error> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(path).await.map_err(|source| {
            Error::Attachment {
                path: path.clone(),
                source,
            }
        })?;
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        let file = media::File::new(name, content);
        files.push(match mime(path) {
            Some(mime) => file.with_mime(mime),
            None => file,
        });
    }
    Ok(files)
}

/// Guesses the MIME type of the file at the provided `path` by its
/// extension.
fn mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => return None,
    })
}

/// Logs the notices raised by the [`Form`] of the `session`.
fn notify(session: &Session) {
    for notice in session.with(Form::take_notices) {
        if notice.is_failure() {
            log::warn!("{notice}");
        } else {
            log::info!("{notice}");
        }
    }
}

/// Error of [`run`]ning a reservation.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Attachment file cannot be read.
    #[display("Failed to read `{}`: {source}", path.display())]
    #[from(ignore)]
    Attachment {
        /// Path to the attachment file.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// Projects failed to load.
    #[display("Failed to load projects: {_0}")]
    #[from(ignore)]
    LoadProjects(Traced<command::load_projects::ExecutionError>),

    /// Project cannot be selected.
    #[display("Failed to select project: {_0}")]
    SelectProject(Traced<command::select_project::ExecutionError>),

    /// Building cannot be selected.
    #[display("Failed to select building: {_0}")]
    SelectBuilding(Traced<command::select_building::ExecutionError>),

    /// Unit cannot be selected.
    #[display("Failed to select unit: {_0}")]
    SelectUnit(Traced<command::select_unit::ExecutionError>),

    /// Payment figures cannot be applied.
    #[display("Failed to apply payment: {_0}")]
    Payment(PaymentError),

    /// Attachments cannot be picked.
    #[display("Failed to pick attachments: {_0}")]
    Upload(Traced<command::select_files::ExecutionError>),

    /// Some attachments failed to upload.
    #[display("Failed to upload `{_0}` attachments")]
    #[from(ignore)]
    UploadFailed(#[error(not(source))] media::Category),

    /// Reservation cannot be submitted.
    #[display("Failed to submit reservation: {_0}")]
    Submit(Traced<command::submit_reservation::ExecutionError>),

    /// Created reservation failed to load.
    #[display("Failed to load reservation: {_0}")]
    #[from(ignore)]
    Detail(Traced<backend::Error>),

    /// Created reservation is not found.
    #[display("Reservation `{_0}` is not found")]
    #[from(ignore)]
    NotFound(#[error(not(source))] reservation::Id),
}
