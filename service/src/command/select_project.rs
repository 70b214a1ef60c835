//! [`Command`] for selecting a [`Project`] in a reservation [`Form`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{project, Building},
    form::{self, Applied, SelectionError},
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::{domain::Project, form::Form};

use super::Command;

/// [`Command`] for selecting a [`Project`] in a reservation [`Form`] and
/// loading its [`Building`]s.
#[derive(Clone, Debug)]
pub struct SelectProject {
    /// [`form::Session`] to select the [`Project`] in.
    pub session: form::Session,

    /// ID of the [`Project`] to select.
    pub project: project::Id,
}

impl<Api> Command<SelectProject> for Service<Api>
where
    Api: Backend<
        Select<By<Vec<Building>, project::Id>>,
        Ok = Vec<Building>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Applied;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SelectProject) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SelectProject { session, project } = cmd;

        let ticket = session
            .with(|f| f.select_project(project))
            .map_err(tracerr::from_and_wrap!(=> E))?;
        match self.request(Select(By::new(project))).await {
            Ok(buildings) => Ok(session
                .with(|f| f.apply_buildings::<()>(ticket, Ok(buildings)))),
            Err(e) => {
                _ = session
                    .with(|f| f.apply_buildings(ticket, Err(e.as_ref())));
                Err(e).map_err(tracerr::map_from_and_wrap!(=> E))
            }
        }
    }
}

/// Error of [`SelectProject`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// [`Project`] can't be selected.
    #[display("Failed to select `Project`: {_0}")]
    Selection(SelectionError),
}

#[cfg(test)]
mod spec {
    use std::pin::pin;

    use common::Handler as _;
    use futures::poll;

    use crate::{
        command::{
            spec::{loaded, service, Fake},
            LoadProjects,
        },
        domain::{building, project},
        form::{
            cascade::spec::{building, project},
            Applied, Notice, Resource, Session,
        },
        infra::backend,
    };

    use super::{ExecutionError, SelectProject};

    #[tokio::test]
    async fn discards_slow_buildings_of_previous_project() {
        let svc = service();
        let session = loaded(&svc, vec![project(1), project(2)]).await;

        let slow = Fake::pending(&svc.backend().buildings);
        let fast = Fake::pending(&svc.backend().buildings);

        let mut first = pin!(svc.execute(SelectProject {
            session: session.clone(),
            project: project::Id::from(1),
        }));
        assert!(poll!(first.as_mut()).is_pending());

        let second = svc.execute(SelectProject {
            session: session.clone(),
            project: project::Id::from(2),
        });
        fast.send(Ok(vec![building(20, 2)])).unwrap();
        assert_eq!(second.await.unwrap(), Applied::Fresh);

        slow.send(Ok(vec![building(10, 1)])).unwrap();
        assert_eq!(first.await.unwrap(), Applied::Stale);

        session.read(|f| {
            let ids = f
                .cascade()
                .buildings()
                .items()
                .iter()
                .map(|b| b.id)
                .collect::<Vec<_>>();
            assert_eq!(ids, [building::Id::from(20)]);
            assert_eq!(
                f.cascade().project().map(|p| p.id),
                Some(project::Id::from(2)),
            );
        });
    }

    #[tokio::test]
    async fn rejects_unknown_project_without_fetching() {
        let svc = service();
        let session = loaded(&svc, vec![project(1)]).await;

        let err = svc
            .execute(SelectProject {
                session,
                project: project::Id::from(9),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Selection(_)));
        assert!(svc.backend().buildings.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_hanging_fetch() {
        let svc = service();
        let session = loaded(&svc, vec![project(1)]).await;
        let _hanging = Fake::pending(&svc.backend().buildings);

        let err = svc
            .execute(SelectProject {
                session: session.clone(),
                project: project::Id::from(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Backend(backend::Error::Timeout),
        ));
        session.with(|f| {
            assert!(!f.cascade().buildings().is_loading());
            assert_eq!(
                f.take_notices(),
                [Notice::FetchFailed(Resource::Buildings)],
            );
        });
    }

    #[tokio::test]
    async fn reloading_projects_keeps_listed_selection() {
        let svc = service();
        let session = loaded(&svc, vec![project(1)]).await;
        Fake::reply(&svc.backend().buildings, Ok(vec![building(10, 1)]));
        _ = svc
            .execute(SelectProject {
                session: session.clone(),
                project: project::Id::from(1),
            })
            .await
            .unwrap();

        Fake::reply(&svc.backend().projects, Ok(vec![project(1)]));
        _ = svc
            .execute(LoadProjects {
                session: session.clone(),
            })
            .await
            .unwrap();

        session.read(|f| {
            assert!(f.cascade().project().is_some());
            assert_eq!(f.cascade().buildings().items().len(), 1);
        });
    }
}
