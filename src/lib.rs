pub mod client;
pub mod config;
pub mod editor;
pub mod errors;
pub mod fields;
pub mod form;
pub mod ledger;
pub mod models;
pub mod plan;
pub mod storage;
pub mod ui;

pub use client::ApiClient;
pub use config::Config;
pub use editor::{InventoryTable, Resolution};
pub use errors::{ClientError, EditError, StorageError};
pub use form::InventoryForm;
pub use ledger::{VarianceClass, WeekLedger, classify, recompute};
pub use plan::PlanTable;
pub use storage::load_week;
pub use ui::render_week;
