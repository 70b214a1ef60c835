//! Domain definitions.

pub mod building;
pub mod client;
pub mod installment;
pub mod media;
pub mod project;
pub mod reservation;
pub mod unit;

pub use self::{
    building::Building, project::Project, reservation::Reservation,
    unit::Unit,
};
