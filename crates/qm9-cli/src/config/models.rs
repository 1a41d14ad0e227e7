use qm9parse::engine::config::ConversionConfig;

pub struct AppConfig {
    pub core_config: ConversionConfig,
    pub strict: bool,
}
