//! Business services: intake orchestration and external collaborators.

pub mod email;
pub mod gateway;
pub mod intake;
pub mod notify;
