//! [`Command`] for loading [`Project`]s of a reservation [`Form`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Project,
    form::{self, Applied, Form},
    infra::{backend, Backend},
    Service,
};

use super::Command;

/// [`Command`] for (re)loading [`Project`]s of a reservation [`Form`].
#[derive(Clone, Debug)]
pub struct LoadProjects {
    /// [`form::Session`] to load the [`Project`]s into.
    pub session: form::Session,
}

impl<Api> Command<LoadProjects> for Service<Api>
where
    Api: Backend<
        Select<By<Vec<Project>, ()>>,
        Ok = Vec<Project>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Applied;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: LoadProjects) -> Result<Self::Ok, Self::Err> {
        let LoadProjects { session } = cmd;

        let ticket = session.with(Form::load_projects);
        match self.request(Select(By::new(()))).await {
            Ok(projects) => Ok(session
                .with(|f| f.apply_projects::<()>(ticket, Ok(projects)))),
            Err(e) => {
                _ = session.with(|f| f.apply_projects(ticket, Err(e.as_ref())));
                Err(e).map_err(tracerr::wrap!())
            }
        }
    }
}

/// Error of [`LoadProjects`] [`Command`] execution.
pub type ExecutionError = backend::Error;

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        command::spec::{service, Fake},
        form::{cascade::spec::project, Applied, Notice, Resource, Session},
        infra::backend,
    };

    use super::LoadProjects;

    #[tokio::test]
    async fn loads_projects() {
        let svc = service();
        let session = Session::new();
        Fake::reply(&svc.backend().projects, Ok(vec![project(1), project(2)]));

        let applied = svc
            .execute(LoadProjects {
                session: session.clone(),
            })
            .await
            .unwrap();

        assert_eq!(applied, Applied::Fresh);
        session.read(|f| {
            assert_eq!(f.cascade().projects().items().len(), 2);
            assert!(!f.cascade().projects().is_loading());
        });
    }

    #[tokio::test]
    async fn reports_failed_fetch() {
        let svc = service();
        let session = Session::new();
        Fake::reply(
            &svc.backend().projects,
            Err(backend::Error::Connectivity("connection refused".into())),
        );

        assert!(svc
            .execute(LoadProjects {
                session: session.clone(),
            })
            .await
            .is_err());

        assert_eq!(
            session.with(|f| f.take_notices()),
            [Notice::FetchFailed(Resource::Projects)],
        );
    }
}
