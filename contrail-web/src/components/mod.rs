pub mod airport_panel;
pub mod player_form;
pub mod status_panel;

pub use airport_panel::AirportPanel;
pub use player_form::PlayerForm;
pub use status_panel::StatusPanel;
