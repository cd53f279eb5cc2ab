pub mod data_export;
pub mod logger;
pub mod startup;
