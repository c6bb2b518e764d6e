#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod sessions;
pub mod timer_settings_service;

pub use practice_core::Clock;

pub use app_services::AppServices;
pub use catalog::{
    CatalogLoader, CatalogSource, FileCatalogSource, HttpCatalogSource, QuestionRecord,
};
pub use error::{CatalogError, TimerSettingsError};
pub use sessions::{SessionAction, SessionState, SessionStore};
pub use timer_settings_service::TimerSettingsService;
