pub mod data;
pub mod error;
pub mod expr;
pub mod filter;
pub mod loader;
pub mod session;
pub mod summary;
pub mod table;
pub mod validate;

use std::{env, sync::OnceLock};

use log::LevelFilter;

pub use crate::error::PipelineError;
pub use crate::filter::{FilterSpec, NumericRange};
pub use crate::session::{CrossTabChoice, Report, SessionContext};
pub use crate::table::{Column, Table};

static LOGGER: OnceLock<()> = OnceLock::new();

/// Initializes env_logger once for embedding hosts. Defaults this crate's
/// output to Info when `RUST_LOG` is unset.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tablescope", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}
