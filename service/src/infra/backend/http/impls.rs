//! [`Backend`] operations over the REST API.

use common::operations::{By, Insert, Select};
use reqwest::{
    multipart::{Form, Part},
    StatusCode,
};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{
        building, media, project, reservation, Building, Project, Reservation,
        Unit,
    },
    infra::{backend, Backend},
};

use super::{decode, ensure_success, transport, Envelope, Http, Listing};

/// Record created by the backend, identified by its ID.
#[derive(Debug, Deserialize)]
struct Created<Id> {
    /// ID of the created record.
    id: Id,
}

impl Backend<Select<By<Vec<Project>, ()>>> for Http {
    type Ok = Vec<Project>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Project>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::send::<Listing<Project>>(self.get("projects")?)
            .await
            .map(Listing::into_items)
    }
}

impl Backend<Select<By<Vec<Building>, project::Id>>> for Http {
    type Ok = Vec<Building>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Building>, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self
            .get("buildings")?
            .query(&[("project_id", by.into_inner())]);
        Self::send::<Listing<Building>>(req)
            .await
            .map(Listing::into_items)
    }
}

impl Backend<Select<By<Vec<Unit>, building::Id>>> for Http {
    type Ok = Vec<Unit>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, building::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self
            .get("units")?
            .query(&[("building_id", by.into_inner())]);
        Self::send::<Listing<Unit>>(req)
            .await
            .map(Listing::into_items)
    }
}

impl Backend<Insert<media::Upload>> for Http {
    type Ok = media::Id;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(upload): Insert<media::Upload>,
    ) -> Result<Self::Ok, Self::Err> {
        let media::Upload { file, category } = upload;

        let mut part = Part::bytes(file.content.to_vec()).file_name(file.name);
        if let Some(mime) = &file.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| tracerr::new!(transport(&e)))?;
        }
        let form = Form::new()
            .part("files", part)
            .text("collection_name", category.to_string());

        let Envelope { data } = Self::send::<Envelope<Vec<Created<media::Id>>>>(
            self.post("media")?.multipart(form),
        )
        .await?;
        data.into_iter().next().map(|m| m.id).ok_or_else(|| {
            tracerr::new!(backend::Error::Decode(
                "no media returned for the uploaded file".into(),
            ))
        })
    }
}

impl Backend<Insert<reservation::Submission>> for Http {
    type Ok = reservation::Id;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(submission): Insert<reservation::Submission>,
    ) -> Result<Self::Ok, Self::Err> {
        let form = submission
            .fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        Self::send::<Envelope<Created<reservation::Id>>>(
            self.post("reservations")?.multipart(form),
        )
        .await
        .map(|Envelope { data }| data.id)
    }
}

impl Backend<Select<By<Option<Reservation>, reservation::Id>>> for Http {
    type Ok = Option<Reservation>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Reservation>, reservation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let resp = Self::dispatch(self.get(&format!("reservations/{id}"))?)
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode::<Envelope<Reservation>>(ensure_success(resp).await?)
            .await
            .map(|Envelope { data }| Some(data))
    }
}
