//! [`Command`] definition.

pub mod load_projects;
pub mod select_building;
pub mod select_files;
pub mod select_project;
pub mod select_unit;
pub mod submit_reservation;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    load_projects::LoadProjects, select_building::SelectBuilding,
    select_files::SelectFiles, select_project::SelectProject,
    select_unit::SelectUnit, submit_reservation::SubmitReservation,
};

#[cfg(test)]
pub(crate) mod spec {
    use std::{cell::RefCell, collections::VecDeque};

    use common::{
        operations::{By, Insert, Select},
        Handler as _,
    };
    use futures::channel::oneshot;
    use tracerr::Traced;

    use crate::{
        domain::{
            building, media, project, reservation, Building, Project,
            Reservation, Unit,
        },
        form::{cascade::spec::project, Session},
        infra::{backend, Backend},
        Config, Service,
    };

    use super::{LoadProjects, SelectProject};

    /// Reply of the [`Fake`] backend.
    pub(crate) type Reply<T> = Result<T, backend::Error>;

    /// Queue of the [`Fake`] backend replies, in the order of requests.
    pub(crate) type Queue<T> = RefCell<VecDeque<oneshot::Receiver<Reply<T>>>>;

    /// [`Backend`] replying with the queued replies.
    #[derive(Default)]
    pub(crate) struct Fake {
        pub(crate) projects: Queue<Vec<Project>>,
        pub(crate) buildings: Queue<Vec<Building>>,
        pub(crate) units: Queue<Vec<Unit>>,
        pub(crate) uploads: Queue<media::Id>,
        pub(crate) reservations: Queue<reservation::Id>,
        pub(crate) details: Queue<Option<Reservation>>,

        /// [`media::Upload`]s requested so far.
        pub(crate) uploaded: RefCell<Vec<media::Upload>>,

        /// [`reservation::Submission`]s requested so far.
        pub(crate) submitted: RefCell<Vec<reservation::Submission>>,
    }

    impl Fake {
        /// Queues a reply to be sent later via the returned sender.
        pub(crate) fn pending<T>(
            queue: &Queue<T>,
        ) -> oneshot::Sender<Reply<T>> {
            let (tx, rx) = oneshot::channel();
            queue.borrow_mut().push_back(rx);
            tx
        }

        /// Queues an immediately available reply.
        pub(crate) fn reply<T>(queue: &Queue<T>, reply: Reply<T>) {
            assert!(Self::pending(queue).send(reply).is_ok());
        }

        async fn answer<T>(queue: &Queue<T>) -> Result<T, Traced<backend::Error>> {
            let rx = queue
                .borrow_mut()
                .pop_front()
                .expect("unexpected backend request");
            rx.await
                .expect("reply is never sent")
                .map_err(|e| tracerr::new!(e))
        }
    }

    impl Backend<Select<By<Vec<Project>, ()>>> for Fake {
        type Ok = Vec<Project>;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Project>, ()>>,
        ) -> Result<Self::Ok, Self::Err> {
            Self::answer(&self.projects).await
        }
    }

    impl Backend<Select<By<Vec<Building>, project::Id>>> for Fake {
        type Ok = Vec<Building>;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Building>, project::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Self::answer(&self.buildings).await
        }
    }

    impl Backend<Select<By<Vec<Unit>, building::Id>>> for Fake {
        type Ok = Vec<Unit>;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Unit>, building::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Self::answer(&self.units).await
        }
    }

    impl Backend<Insert<media::Upload>> for Fake {
        type Ok = media::Id;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Insert(upload): Insert<media::Upload>,
        ) -> Result<Self::Ok, Self::Err> {
            self.uploaded.borrow_mut().push(upload);
            Self::answer(&self.uploads).await
        }
    }

    impl Backend<Insert<reservation::Submission>> for Fake {
        type Ok = reservation::Id;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Insert(submission): Insert<reservation::Submission>,
        ) -> Result<Self::Ok, Self::Err> {
            self.submitted.borrow_mut().push(submission);
            Self::answer(&self.reservations).await
        }
    }

    impl Backend<Select<By<Option<Reservation>, reservation::Id>>> for Fake {
        type Ok = Option<Reservation>;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Reservation>, reservation::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Self::answer(&self.details).await
        }
    }

    pub(crate) fn service() -> Service<Fake> {
        Service::new(Config::default(), Fake::default())
    }

    /// Returns a [`Session`] with the provided [`Project`]s loaded.
    pub(crate) async fn loaded(
        svc: &Service<Fake>,
        projects: Vec<Project>,
    ) -> Session {
        let session = Session::new();
        Fake::reply(&svc.backend().projects, Ok(projects));
        _ = svc
            .execute(LoadProjects {
                session: session.clone(),
            })
            .await
            .unwrap();
        session
    }

    /// Returns a [`Session`] with the project `1` selected and the provided
    /// [`Building`]s loaded.
    pub(crate) async fn selected_project(
        svc: &Service<Fake>,
        buildings: Vec<Building>,
    ) -> Session {
        let session = loaded(svc, vec![project(1)]).await;
        Fake::reply(&svc.backend().buildings, Ok(buildings));
        _ = svc
            .execute(SelectProject {
                session: session.clone(),
                project: project::Id::from(1),
            })
            .await
            .unwrap();
        session
    }
}
