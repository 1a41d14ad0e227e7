use std::path::PathBuf;

pub struct DefaultsConfig {
    pub input_pattern: String,
    pub output_directory: PathBuf,
    pub summary: Option<PathBuf>,
    pub threads: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_pattern: "QM9/*.xyz".to_string(),
            output_directory: PathBuf::from("QM9_parsed"),
            summary: None,
            threads: num_cpus::get(),
        }
    }
}
