pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::pricing::NegativePolicy;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ventura-billing")]
#[command(about = "Quotation pricing tool for the Ventura billing portal")]
pub struct CliConfig {
    #[arg(long, default_value = "quotation.csv")]
    pub input_path: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, default_value = "reject")]
    pub negative_policy: NegativePolicy,

    #[arg(long, help = "Bundle the priced outputs into a ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn negative_policy(&self) -> NegativePolicy {
        self.negative_policy
    }

    fn compress_output(&self) -> bool {
        self.compress
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extensions(
            "input_path",
            std::slice::from_ref(&self.input_path),
            &["csv", "json"],
        )?;
        Ok(())
    }
}
