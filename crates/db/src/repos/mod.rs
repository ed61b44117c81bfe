//! Repository traits for configuration store operations.

pub mod custom_configs;
pub mod plugins;
pub mod services;
pub mod settings;
pub mod values;

pub use custom_configs::{CustomConfigRepo, CustomConfigUpload, UpsertOutcome};
pub use plugins::PluginRepo;
pub use services::ServiceRepo;
pub use settings::SettingRepo;
pub use values::ValueRepo;
