use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the consent banner is anchored on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BannerPosition {
    #[default]
    BottomCenter,
    BottomLeft,
    BottomRight,
    Top,
    Middle,
}

/// Visual layout of the consent banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BannerLayout {
    #[default]
    Box,
    Cloud,
    Bar,
}

/// Colour theme of the consent banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BannerTheme {
    #[default]
    Light,
    DarkTurquoise,
    LightFunky,
    ElegantBlack,
    Custom,
}

/// Corner used by the floating preferences button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferencesButtonPosition {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Banner settings handed verbatim to the client as the `config` block of the
/// public consent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BannerSettings {
    pub enabled: bool,
    pub banner_position: BannerPosition,
    pub banner_layout: BannerLayout,
    pub theme: BannerTheme,
    /// Border radius in pixels.
    #[validate(range(max = 50))]
    pub border_radius: u32,
    pub flip_buttons: bool,
    pub equal_weight_buttons: bool,
    pub disable_page_interaction: bool,
    /// Days until the stored consent expires.
    #[validate(range(min = 1, max = 730))]
    pub cookie_expires_days: u32,
    pub show_preferences_button: bool,
    pub preferences_button_position: PreferencesButtonPosition,
    pub preferences_button_icon: String,
    pub custom_background_color: String,
    pub custom_text_color: String,
    pub custom_primary_button_bg_color: String,
    pub custom_primary_button_text_color: String,
    pub custom_secondary_button_bg_color: String,
    pub custom_secondary_button_text_color: String,
    pub google_consent_mode: bool,
    pub google_tag_manager_events: bool,
    pub matomo_tag_manager_events: bool,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            banner_position: BannerPosition::default(),
            banner_layout: BannerLayout::default(),
            theme: BannerTheme::default(),
            border_radius: 8,
            flip_buttons: false,
            equal_weight_buttons: true,
            disable_page_interaction: false,
            cookie_expires_days: 365,
            show_preferences_button: true,
            preferences_button_position: PreferencesButtonPosition::default(),
            preferences_button_icon: "🍪".to_string(),
            custom_background_color: "#ffffff".to_string(),
            custom_text_color: "#333333".to_string(),
            custom_primary_button_bg_color: "#0d6efd".to_string(),
            custom_primary_button_text_color: "#ffffff".to_string(),
            custom_secondary_button_bg_color: "#eeeeee".to_string(),
            custom_secondary_button_text_color: "#333333".to_string(),
            google_consent_mode: false,
            google_tag_manager_events: false,
            matomo_tag_manager_events: false,
        }
    }
}

/// Configuration options specific to the cookie-consent service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    /// Locale used when a request does not name one.
    pub default_locale: String,
    #[serde(default)]
    pub banner: BannerSettings,
}

#[cfg(feature = "server")]
impl ServerConfig {
    /// Load `config/default.yaml` (optional) overlaid with `APP_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `APP_BANNER__THEME`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("database_url", "app.db")?
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("default_locale", "de")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
