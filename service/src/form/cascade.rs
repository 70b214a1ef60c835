//! Selection [`Cascade`] of a project, its building and a unit.

use derive_more::{Display, Error};
use tracing as log;

use crate::domain::{building, project, unit, Building, Project, Unit};

/// Generation of an ancestor selection.
///
/// Bumped every time the ancestor changes, so results of fetches triggered
/// by an older selection can be told apart.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Generation(u64);

impl Generation {
    /// Returns the [`Generation`] following this one.
    #[must_use]
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Tag of an in-flight fetch, identifying the selection that triggered it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket<K> {
    /// [`Generation`] of the selection at the moment the fetch started.
    pub generation: Generation,

    /// Key the fetch is performed by.
    pub key: K,
}

/// Outcome of applying a fetch result to a [`Cascade`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
    /// Result was applied to the options list.
    Fresh,

    /// Result belonged to an outdated selection and was discarded.
    Stale,
}

/// List of options loaded from the backend.
#[derive(Clone, Debug)]
pub struct Options<T> {
    /// Loaded items.
    items: Vec<T>,

    /// Indicator whether a fetch of these [`Options`] is in flight.
    is_loading: bool,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
        }
    }
}

impl<T> Options<T> {
    /// Returns loaded items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Indicates whether a fetch of these [`Options`] is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Empties these [`Options`] marking them as being fetched.
    fn reload(&mut self) {
        self.items.clear();
        self.is_loading = true;
    }

    /// Finishes the fetch of these [`Options`], leaving them empty on
    /// failure.
    fn load<E>(&mut self, result: Result<Vec<T>, E>) {
        self.items = result.unwrap_or_default();
        self.is_loading = false;
    }
}

/// Cascade of a [`Project`], a [`Building`] and a [`Unit`] selections.
///
/// Each level is selectable only once its ancestor is selected and is
/// cleared whenever the ancestor changes.
#[derive(Clone, Debug, Default)]
pub struct Cascade {
    /// Available [`Project`]s.
    projects: Options<Project>,

    /// [`Generation`] of the [`Project`]s list requests.
    projects_generation: Generation,

    /// ID of the selected [`Project`].
    project: Option<project::Id>,

    /// [`Generation`] of the [`Project`] selection.
    project_generation: Generation,

    /// [`Building`]s of the selected [`Project`].
    buildings: Options<Building>,

    /// ID of the selected [`Building`].
    building: Option<building::Id>,

    /// [`Generation`] of the [`Building`] selection.
    building_generation: Generation,

    /// [`Unit`]s of the selected [`Building`].
    units: Options<Unit>,

    /// ID of the selected [`Unit`].
    unit: Option<unit::Id>,
}

impl Cascade {
    /// Returns available [`Project`]s.
    #[must_use]
    pub fn projects(&self) -> &Options<Project> {
        &self.projects
    }

    /// Returns [`Building`]s of the selected [`Project`].
    #[must_use]
    pub fn buildings(&self) -> &Options<Building> {
        &self.buildings
    }

    /// Returns [`Unit`]s of the selected [`Building`].
    #[must_use]
    pub fn units(&self) -> &Options<Unit> {
        &self.units
    }

    /// Returns the selected [`Project`], if any.
    #[must_use]
    pub fn project(&self) -> Option<&Project> {
        let id = self.project?;
        self.projects.items.iter().find(|p| p.id == id)
    }

    /// Returns the selected [`Building`], if any.
    #[must_use]
    pub fn building(&self) -> Option<&Building> {
        let id = self.building?;
        self.buildings.items.iter().find(|b| b.id == id)
    }

    /// Returns the selected [`Unit`], if any.
    #[must_use]
    pub fn unit(&self) -> Option<&Unit> {
        let id = self.unit?;
        self.units.items.iter().find(|u| u.id == id)
    }

    /// Starts (re)loading the [`Project`]s list.
    pub fn load_projects(&mut self) -> Ticket<()> {
        self.projects_generation = self.projects_generation.next();
        self.projects.is_loading = true;
        Ticket {
            generation: self.projects_generation,
            key: (),
        }
    }

    /// Applies the result of the [`Project`]s list fetch.
    ///
    /// The current [`Project`] selection survives a reload only if the
    /// [`Project`] is still listed.
    pub fn apply_projects<E>(
        &mut self,
        ticket: Ticket<()>,
        result: Result<Vec<Project>, E>,
    ) -> Applied {
        if ticket.generation != self.projects_generation {
            log::debug!("discarding stale `Project`s list");
            return Applied::Stale;
        }
        self.projects.load(result);
        if self.project.is_some() && self.project().is_none() {
            self.clear_project();
        }
        Applied::Fresh
    }

    /// Selects the [`Project`] with the provided ID, clearing the
    /// [`Building`] and [`Unit`] selections.
    ///
    /// Returns the [`Ticket`] to fetch the [`Project`]'s [`Building`]s with.
    /// The [`Building`]s are refetched even if the same [`Project`] is
    /// selected again.
    ///
    /// # Errors
    ///
    /// If no such [`Project`] is listed.
    pub fn select_project(
        &mut self,
        id: project::Id,
    ) -> Result<Ticket<project::Id>, SelectionError> {
        if !self.projects.items.iter().any(|p| p.id == id) {
            return Err(SelectionError::UnknownProject(id));
        }

        self.clear_project();
        self.project = Some(id);
        self.buildings.reload();
        Ok(Ticket {
            generation: self.project_generation,
            key: id,
        })
    }

    /// Applies the result of the [`Building`]s fetch started by the
    /// [`Cascade::select_project()`].
    pub fn apply_buildings<E>(
        &mut self,
        ticket: Ticket<project::Id>,
        result: Result<Vec<Building>, E>,
    ) -> Applied {
        if ticket.generation != self.project_generation
            || self.project != Some(ticket.key)
        {
            log::debug!(
                "discarding stale `Building`s of `Project(id: {})`",
                ticket.key,
            );
            return Applied::Stale;
        }
        self.buildings.load(result);
        Applied::Fresh
    }

    /// Selects the [`Building`] with the provided ID, clearing the [`Unit`]
    /// selection.
    ///
    /// Returns the [`Ticket`] to fetch the [`Building`]'s [`Unit`]s with.
    ///
    /// # Errors
    ///
    /// If no [`Project`] is selected, or no such [`Building`] is listed.
    pub fn select_building(
        &mut self,
        id: building::Id,
    ) -> Result<Ticket<building::Id>, SelectionError> {
        if self.project.is_none() {
            return Err(SelectionError::NoProject);
        }
        if !self.buildings.items.iter().any(|b| b.id == id) {
            return Err(SelectionError::UnknownBuilding(id));
        }

        self.clear_building();
        self.building = Some(id);
        self.units.reload();
        Ok(Ticket {
            generation: self.building_generation,
            key: id,
        })
    }

    /// Applies the result of the [`Unit`]s fetch started by the
    /// [`Cascade::select_building()`].
    pub fn apply_units<E>(
        &mut self,
        ticket: Ticket<building::Id>,
        result: Result<Vec<Unit>, E>,
    ) -> Applied {
        if ticket.generation != self.building_generation
            || self.building != Some(ticket.key)
        {
            log::debug!(
                "discarding stale `Unit`s of `Building(id: {})`",
                ticket.key,
            );
            return Applied::Stale;
        }
        self.units.load(result);
        Applied::Fresh
    }

    /// Selects the [`Unit`] with the provided ID.
    ///
    /// # Errors
    ///
    /// If no [`Building`] is selected, no such [`Unit`] is listed, or the
    /// [`Unit`] is not available.
    pub fn select_unit(&mut self, id: unit::Id) -> Result<&Unit, SelectionError> {
        if self.building.is_none() {
            return Err(SelectionError::NoBuilding);
        }
        let unit = self
            .units
            .items
            .iter()
            .find(|u| u.id == id)
            .ok_or(SelectionError::UnknownUnit(id))?;
        if !unit.is_available() {
            return Err(SelectionError::UnitUnavailable(id));
        }

        self.unit = Some(id);
        Ok(unit)
    }

    /// Clears the [`Project`] selection and everything depending on it.
    fn clear_project(&mut self) {
        self.project = None;
        self.project_generation = self.project_generation.next();
        self.buildings = Options::default();
        self.clear_building();
    }

    /// Clears the [`Building`] selection and everything depending on it.
    fn clear_building(&mut self) {
        self.building = None;
        self.building_generation = self.building_generation.next();
        self.units = Options::default();
        self.unit = None;
    }
}

/// Error of selecting an item in a [`Cascade`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum SelectionError {
    /// No [`Project`] is selected yet.
    #[display("no `Project` is selected")]
    NoProject,

    /// No [`Building`] is selected yet.
    #[display("no `Building` is selected")]
    NoBuilding,

    /// [`Project`] is not listed.
    #[display("`Project(id: {_0})` is not listed")]
    UnknownProject(#[error(not(source))] project::Id),

    /// [`Building`] is not listed.
    #[display("`Building(id: {_0})` is not listed")]
    UnknownBuilding(#[error(not(source))] building::Id),

    /// [`Unit`] is not listed.
    #[display("`Unit(id: {_0})` is not listed")]
    UnknownUnit(#[error(not(source))] unit::Id),

    /// [`Unit`] is not available for reservation.
    #[display("`Unit(id: {_0})` is not available")]
    UnitUnavailable(#[error(not(source))] unit::Id),
}

#[cfg(test)]
pub(crate) mod spec {
    use common::{Money, Percent};

    use crate::domain::{
        building, installment, project, unit, Building, Project, Unit,
    };

    use super::{Applied, Cascade, SelectionError};

    pub(crate) fn project(id: u64) -> Project {
        Project {
            id: id.into(),
            name: format!("Project {id}").into(),
            is_active: true,
            installment_kinds: vec![
                installment::Kind::Monthly,
                installment::Kind::Quarterly,
            ],
            deposit_percentage: Percent::default(),
            additional_expenses: vec![],
        }
    }

    pub(crate) fn building(id: u64, project_id: u64) -> Building {
        Building {
            id: id.into(),
            project_id: project_id.into(),
            name: format!("Building {id}").into(),
        }
    }

    pub(crate) fn unit(id: u64, building_id: u64, price: u32) -> Unit {
        Unit {
            id: id.into(),
            building_id: building_id.into(),
            unit_number: format!("{id}"),
            unit_type: "apartment".into(),
            price: Money::from(price),
            status: unit::Status::Available,
            area: None,
            floor: None,
            bedrooms: None,
            bathrooms: None,
        }
    }

    fn loaded() -> Cascade {
        let mut cascade = Cascade::default();
        let ticket = cascade.load_projects();
        _ = cascade.apply_projects::<()>(ticket, Ok(vec![project(1), project(2)]));
        cascade
    }

    #[test]
    fn selects_levels_in_order() {
        let mut cascade = loaded();

        assert_eq!(
            cascade.select_building(building::Id::from(10)).unwrap_err(),
            SelectionError::NoProject,
        );

        let ticket = cascade.select_project(project::Id::from(1)).unwrap();
        assert!(cascade.buildings().is_loading());
        assert_eq!(
            cascade.apply_buildings::<()>(ticket, Ok(vec![building(10, 1)])),
            Applied::Fresh,
        );
        assert!(!cascade.buildings().is_loading());

        assert_eq!(
            cascade.select_unit(unit::Id::from(100)).unwrap_err(),
            SelectionError::NoBuilding,
        );

        let ticket = cascade.select_building(building::Id::from(10)).unwrap();
        _ = cascade.apply_units::<()>(ticket, Ok(vec![unit(100, 10, 1000)]));

        let unit = cascade.select_unit(unit::Id::from(100)).unwrap();
        assert_eq!(unit.price, Money::from(1000));
        assert_eq!(cascade.unit().map(|u| u.id), Some(unit::Id::from(100)));
    }

    #[test]
    fn rejects_unknown_and_unavailable() {
        let mut cascade = loaded();

        assert_eq!(
            cascade.select_project(project::Id::from(3)).unwrap_err(),
            SelectionError::UnknownProject(project::Id::from(3)),
        );

        let ticket = cascade.select_project(project::Id::from(1)).unwrap();
        _ = cascade.apply_buildings::<()>(ticket, Ok(vec![building(10, 1)]));
        let ticket = cascade.select_building(building::Id::from(10)).unwrap();
        let mut sold = unit(101, 10, 1000);
        sold.status = unit::Status::Sold;
        _ = cascade.apply_units::<()>(ticket, Ok(vec![unit(100, 10, 1000), sold]));

        assert_eq!(
            cascade.select_unit(unit::Id::from(101)).unwrap_err(),
            SelectionError::UnitUnavailable(unit::Id::from(101)),
        );
        assert_eq!(
            cascade.select_unit(unit::Id::from(102)).unwrap_err(),
            SelectionError::UnknownUnit(unit::Id::from(102)),
        );
        assert!(cascade.unit().is_none());
        assert_eq!(cascade.units().items().len(), 2);
    }

    #[test]
    fn changing_ancestor_clears_descendants() {
        let mut cascade = loaded();

        let ticket = cascade.select_project(project::Id::from(1)).unwrap();
        _ = cascade.apply_buildings::<()>(ticket, Ok(vec![building(10, 1)]));
        let ticket = cascade.select_building(building::Id::from(10)).unwrap();
        _ = cascade.apply_units::<()>(ticket, Ok(vec![unit(100, 10, 1000)]));
        _ = cascade.select_unit(unit::Id::from(100)).unwrap();

        _ = cascade.select_project(project::Id::from(2)).unwrap();

        assert!(cascade.building().is_none());
        assert!(cascade.unit().is_none());
        assert!(cascade.buildings().items().is_empty());
        assert!(cascade.buildings().is_loading());
        assert!(cascade.units().items().is_empty());
    }

    #[test]
    fn discards_stale_buildings() {
        let mut cascade = loaded();

        let slow = cascade.select_project(project::Id::from(1)).unwrap();
        let fast = cascade.select_project(project::Id::from(2)).unwrap();

        assert_eq!(
            cascade.apply_buildings::<()>(fast, Ok(vec![building(20, 2)])),
            Applied::Fresh,
        );
        assert_eq!(
            cascade.apply_buildings::<()>(slow, Ok(vec![building(10, 1)])),
            Applied::Stale,
        );

        let ids = cascade
            .buildings()
            .items()
            .iter()
            .map(|b| b.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [building::Id::from(20)]);
    }

    #[test]
    fn discards_buildings_of_reselected_project() {
        let mut cascade = loaded();

        let first = cascade.select_project(project::Id::from(1)).unwrap();
        let second = cascade.select_project(project::Id::from(1)).unwrap();
        assert_ne!(first.generation, second.generation);

        assert_eq!(
            cascade.apply_buildings::<()>(first, Ok(vec![building(10, 1)])),
            Applied::Stale,
        );
        assert!(cascade.buildings().is_loading());
        assert_eq!(
            cascade.apply_buildings::<()>(second, Ok(vec![building(11, 1)])),
            Applied::Fresh,
        );
    }

    #[test]
    fn discards_units_after_building_changes() {
        let mut cascade = loaded();

        let ticket = cascade.select_project(project::Id::from(1)).unwrap();
        _ = cascade.apply_buildings::<()>(
            ticket,
            Ok(vec![building(10, 1), building(11, 1)]),
        );
        let old = cascade.select_building(building::Id::from(10)).unwrap();
        let new = cascade.select_building(building::Id::from(11)).unwrap();

        assert_eq!(
            cascade.apply_units::<()>(old, Ok(vec![unit(100, 10, 1)])),
            Applied::Stale,
        );
        assert_eq!(
            cascade.apply_units::<()>(new, Ok(vec![unit(110, 11, 1)])),
            Applied::Fresh,
        );
        assert_eq!(cascade.units().items()[0].id, unit::Id::from(110));
    }

    #[test]
    fn failed_fetch_leaves_list_empty() {
        let mut cascade = loaded();

        let ticket = cascade.select_project(project::Id::from(1)).unwrap();
        assert_eq!(
            cascade.apply_buildings(ticket, Err("boom")),
            Applied::Fresh,
        );
        assert!(cascade.buildings().items().is_empty());
        assert!(!cascade.buildings().is_loading());

        // Ancestor stays re-selectable.
        assert!(cascade.select_project(project::Id::from(1)).is_ok());
    }
}
