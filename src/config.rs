use crate::loader::DEFAULT_ENCODING;
use clap::Args;
use std::path::PathBuf;

/// Where the dataset lives and how it is encoded; shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Path to the universities CSV file
    #[arg(long = "csv", env = "FINDER_CSV", default_value = "universities.csv", global = true)]
    pub csv_path: PathBuf,

    /// Text encoding label of the CSV file (latin1, utf-8, ...)
    #[arg(long, env = "FINDER_ENCODING", default_value = DEFAULT_ENCODING, global = true)]
    pub encoding: String,
}

impl Default for DatasetArgs {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("universities.csv"),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}
