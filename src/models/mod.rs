pub mod forecast;
pub mod run;

pub use forecast::ForecastRecord;
pub use run::ForecastRun;
