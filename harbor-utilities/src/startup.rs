use std::path::Path;

use log::debug;

use crate::logger::{self, level_for_verbosity};
use harbor_models::errors::SendableError;

pub fn startup(name: &str, verbose: u8, log_file: Option<&Path>) -> Result<(), SendableError> {
    logger::setup_logger(level_for_verbosity(verbose), log_file)?;
    log_panics::init();

    debug!("--- {} ---", name);
    Ok(())
}
