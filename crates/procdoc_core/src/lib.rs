//! Procdoc core: pure progress-tracking state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod steps;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    ServerStatus, SessionId, StatusReport, TrackerConfig, TrackerPhase, TrackerState,
};
pub use steps::{CatalogError, Step, StepCatalog, StepId, StepMark};
pub use update::update;
pub use view_model::{StepRowView, TrackerViewModel};
