pub mod project;
pub mod rates;
pub mod setup;
pub mod ui;
