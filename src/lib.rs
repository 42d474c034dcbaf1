//! Layout, styling, selection and animation for interactive gene network
//! views. The `genenet-explorer` binary puts an egui front end on top.

pub mod animation;
pub mod layout;
pub mod network;
pub mod settings;
pub mod view;
