//! [`Command`] for submitting a reservation [`Form`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::reservation,
    form::{self, Navigation, NotReady, SubmissionFailure},
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::form::Form;

use super::Command;

/// [`Command`] for submitting a reservation [`Form`] to the backend.
#[derive(Clone, Debug)]
pub struct SubmitReservation {
    /// [`form::Session`] to submit.
    pub session: form::Session,

    /// Current date, used as the reservation date unless one is picked.
    pub today: Date,
}

impl<Api> Command<SubmitReservation> for Service<Api>
where
    Api: Backend<
        Insert<reservation::Submission>,
        Ok = reservation::Id,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Navigation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitReservation,
    ) -> Result<Self::Ok, Self::Err> {
        let SubmitReservation { session, today } = cmd;

        let submission = session
            .with(|f| f.prepare_submission(today))
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))?;

        match self.request(Insert(submission)).await {
            Ok(id) => Ok(session.with(|f| f.complete_submission(id))),
            Err(e) => {
                let failure = match e.as_ref() {
                    backend::Error::Rejected(rejection) => {
                        SubmissionFailure::Rejected {
                            message: rejection.message.clone(),
                            errors: rejection.errors.clone(),
                        }
                    }
                    backend::Error::Connectivity(_) | backend::Error::Timeout => {
                        SubmissionFailure::Connectivity
                    }
                    backend::Error::Status { .. }
                    | backend::Error::InvalidRequest(_)
                    | backend::Error::Decode(_) => SubmissionFailure::Other,
                };
                session.with(|f| f.fail_submission(failure));
                Err(e).map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
            }
        }
    }
}

/// Error of [`SubmitReservation`] [`Command`] execution.
#[derive(Clone, Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Form`] can't be submitted right now.
    #[display("Reservation is not ready: {_0}")]
    NotReady(NotReady),

    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),
}

#[cfg(test)]
mod spec {
    use std::pin::pin;

    use common::Handler as _;
    use futures::poll;
    use time::macros::date;

    use crate::{
        command::{
            spec::{service, Fake},
            SelectFiles,
        },
        domain::{
            media::{self, Category, File},
            reservation,
        },
        form::{
            cascade::spec::project,
            spec::{filled, selected, session},
            Navigation, NotReady, Notice, Session,
        },
        infra::backend::{self, Rejection},
    };

    use super::{ExecutionError, SubmitReservation};

    fn ready() -> Session {
        let mut form = selected(100_000, project(1));
        filled(&mut form);
        _ = form.take_notices();
        session(form)
    }

    #[tokio::test]
    async fn navigates_to_created_reservation() {
        let svc = service();
        let session = ready();
        session.with(|f| f.contract_date = Some(date!(2024 - 03 - 01)));
        Fake::reply(&svc.backend().reservations, Ok(reservation::Id::from(77)));

        let nav = svc
            .execute(SubmitReservation {
                session: session.clone(),
                today: date!(2024 - 02 - 15),
            })
            .await
            .unwrap();

        assert_eq!(nav, Navigation::ReservationDetail(77_u64.into()));
        let submitted = svc.backend().submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].get("reservation_date"), Some("2024-02-15"));
        assert_eq!(submitted[0].get("contract_date"), Some("2024-03-01"));
        session.with(|f| {
            assert!(!f.is_submitting());
            assert_eq!(f.submitted(), Some(77_u64.into()));
            assert_eq!(f.take_notices(), [Notice::Submitted(77_u64.into())]);
        });
    }

    #[tokio::test]
    async fn is_blocked_while_uploading() {
        let svc = service();
        let session = ready();
        let _upload = Fake::pending(&svc.backend().uploads);

        let mut uploading = pin!(svc.execute(SelectFiles {
            session: session.clone(),
            category: Category::Attachments,
            files: vec![File::new("contract.pdf", vec![1, 2, 3])],
        }));
        assert!(poll!(uploading.as_mut()).is_pending());

        let err = svc
            .execute(SubmitReservation {
                session: session.clone(),
                today: date!(2024 - 02 - 15),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotReady(NotReady::Uploading),
        ));
        assert!(svc.backend().submitted.borrow().is_empty());
        session.with(|f| {
            assert!(!f.is_submitting());
            assert!(f.errors().is_empty());
            assert_eq!(f.take_notices(), [Notice::UploadInProgress]);
        });
    }

    #[tokio::test]
    async fn merges_rejected_fields() {
        let svc = service();
        let session = ready();
        Fake::reply(
            &svc.backend().reservations,
            Err(backend::Error::Rejected(Rejection {
                message: "The given data was invalid.".into(),
                errors: vec![(
                    "client.phone".into(),
                    vec!["The phone has already been taken.".into()],
                )],
            })),
        );

        let err = svc
            .execute(SubmitReservation {
                session: session.clone(),
                today: date!(2024 - 02 - 15),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Backend(backend::Error::Rejected(_)),
        ));
        session.with(|f| {
            assert!(!f.is_submitting());
            assert_eq!(
                f.errors().get("client.phone"),
                Some("The phone has already been taken."),
            );
            assert_eq!(
                f.take_notices(),
                [Notice::Rejected("The given data was invalid.".into())],
            );
        });
    }

    #[tokio::test]
    async fn reports_connectivity_loss() {
        let svc = service();
        let session = ready();
        Fake::reply(
            &svc.backend().reservations,
            Err(backend::Error::Connectivity("connection refused".into())),
        );

        _ = svc
            .execute(SubmitReservation {
                session: session.clone(),
                today: date!(2024 - 02 - 15),
            })
            .await
            .unwrap_err();

        session.with(|f| {
            assert!(!f.is_submitting());
            assert!(f.errors().is_empty());
            assert_eq!(f.take_notices(), [Notice::Connectivity]);
        });
    }

    #[tokio::test]
    async fn rejects_invalid_form_locally() {
        let svc = service();
        let session = ready();
        _ = session.with(|f| f.remove_file(media::Category::DepositReceipt, None));

        let err = svc
            .execute(SubmitReservation {
                session: session.clone(),
                today: date!(2024 - 02 - 15),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotReady(NotReady::Invalid(1)),
        ));
        assert!(svc.backend().submitted.borrow().is_empty());
        session.read(|f| {
            assert!(f.errors().get("deposit_receipt").is_some());
        });
    }
}
