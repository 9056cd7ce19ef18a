//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to the JSON documents and is optional: stock defaults
//! are the base layer and the user file overrides any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! base_url = ""             # Absolute origin for canonical links ("" = relative)
//! resume_path = "/resume.pdf"
//! language = "en"
//! assets_dir = "assets"     # Copied verbatim to the output root
//!
//! [theme]
//! mode = "system"           # system | light | dark
//! accent = "#6366f1"
//!
//! [layout]
//! sections = ["hero", "about", "experience", "projects", "blog", "contact"]
//! latest_posts = 3
//!
//! [backdrop]
//! enabled = true
//! seed = 7
//! max_particles = 120
//! area_per_particle = 12000.0
//!
//! [contact]
//! endpoint = "/api/contact"
//! bind = "127.0.0.1:3000"
//!
//! [build]
//! max_threads = 4           # Omit for auto = CPU cores
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [theme]
//! mode = "dark"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The theme is an ordinary owned value: the generator carries it through a
//! render context rather than reading any process-wide state.

use crate::backdrop::{FieldParams, Rgba};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide settings (base URL, resume location, language).
    pub site: SiteSettings,
    /// Color scheme mode and palettes.
    pub theme: ThemeConfig,
    /// Which landing-page sections render, and in what order.
    pub layout: LayoutConfig,
    /// Particle field rendered behind the hero.
    pub backdrop: BackdropConfig,
    /// Contact relay endpoint and delivery settings.
    pub contact: ContactConfig,
    /// Page rendering parallelism.
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.site.resume_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "site.resume_path must be an absolute path (start with '/')".into(),
            ));
        }
        if !self.contact.endpoint.starts_with('/') {
            return Err(ConfigError::Validation(
                "contact.endpoint must start with '/'".into(),
            ));
        }
        if self.contact.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "contact.bind is not a socket address: {}",
                self.contact.bind
            )));
        }
        let mut seen = HashSet::new();
        for section in &self.layout.sections {
            if !seen.insert(section) {
                return Err(ConfigError::Validation(format!(
                    "layout.sections lists '{}' more than once",
                    section.as_str()
                )));
            }
        }
        if self.layout.latest_posts == 0 {
            return Err(ConfigError::Validation(
                "layout.latest_posts must be at least 1".into(),
            ));
        }
        parse_color("theme.accent", &self.theme.accent)?;
        self.backdrop.validate()
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    /// Absolute origin prepended to canonical links. Empty keeps links relative.
    pub base_url: String,
    /// Public path of the downloadable resume.
    pub resume_path: String,
    /// `lang` attribute of every page.
    pub language: String,
    /// Directory under the content root copied verbatim to the output root.
    pub assets_dir: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            resume_path: "/resume.pdf".to_string(),
            language: "en".to_string(),
            assets_dir: "assets".to_string(),
        }
    }
}

/// Which color scheme the site renders with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
    Light,
    Dark,
}

/// Theme settings: mode, accent color and the two palettes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    /// Accent used for links, badges and the scroll progress bar.
    pub accent: String,
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::System,
            accent: "#6366f1".to_string(),
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background color.
    pub background: String,
    /// Card and panel background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (captions, dates, stat labels).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f6f6f8".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0f".to_string(),
            surface: "#15151d".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#2a2a35".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// A landing-page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    About,
    Experience,
    Projects,
    Blog,
    Contact,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Hero,
        Section::About,
        Section::Experience,
        Section::Projects,
        Section::Blog,
        Section::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Blog => "blog",
            Section::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Sections rendered on the landing page, top to bottom.
    pub sections: Vec<Section>,
    /// Number of posts in the landing-page blog section.
    pub latest_posts: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sections: Section::ALL.to_vec(),
            latest_posts: 3,
        }
    }
}

/// Largest simulated viewport edge, in pixels.
pub const MAX_BACKDROP_SIZE: f64 = 8192.0;

/// Particle backdrop settings.
///
/// The field is simulated at build time for `warmup_frames` steps from a
/// fixed `seed`, so the same config always renders the same frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackdropConfig {
    pub enabled: bool,
    pub seed: u64,
    /// Viewport the frame is simulated in (the SVG scales to fit).
    pub width: f64,
    pub height: f64,
    pub warmup_frames: u32,
    pub max_particles: usize,
    /// Viewport pixels per particle.
    pub area_per_particle: f64,
    pub interaction_radius: f64,
    pub attraction: f64,
    pub connection_distance: f64,
    /// Velocity multiplier applied every frame, in `(0, 1]`.
    pub damping: f64,
    pub jitter: f64,
    /// Peak opacity of connection lines.
    pub line_opacity: f64,
    pub grid_spacing: f64,
    /// Particle colors, picked at random per particle.
    pub palette: Vec<String>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        let params = FieldParams::default();
        Self {
            enabled: true,
            seed: 7,
            width: 1440.0,
            height: 900.0,
            warmup_frames: 240,
            max_particles: params.max_particles,
            area_per_particle: params.area_per_particle,
            interaction_radius: params.interaction_radius,
            attraction: params.attraction,
            connection_distance: params.connection_distance,
            damping: params.damping,
            jitter: params.jitter,
            line_opacity: params.line_opacity,
            grid_spacing: params.grid_spacing,
            palette: vec![
                "#6366f1".to_string(),
                "#8b5cf6".to_string(),
                "#06b6d4".to_string(),
            ],
        }
    }
}

impl BackdropConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("width", self.width),
            ("height", self.height),
            ("area_per_particle", self.area_per_particle),
            ("interaction_radius", self.interaction_radius),
            ("attraction", self.attraction),
            ("connection_distance", self.connection_distance),
            ("damping", self.damping),
            ("jitter", self.jitter),
            ("line_opacity", self.line_opacity),
            ("grid_spacing", self.grid_spacing),
        ];
        for (key, value) in numbers {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "backdrop.{key} must be a finite number"
                )));
            }
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Validation(
                "backdrop.width and backdrop.height must be positive".into(),
            ));
        }
        if self.width > MAX_BACKDROP_SIZE || self.height > MAX_BACKDROP_SIZE {
            return Err(ConfigError::Validation(format!(
                "backdrop.width and backdrop.height must be at most {MAX_BACKDROP_SIZE}"
            )));
        }
        if self.area_per_particle <= 0.0 {
            return Err(ConfigError::Validation(
                "backdrop.area_per_particle must be positive".into(),
            ));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Validation(
                "backdrop.damping must be in (0, 1]".into(),
            ));
        }
        if self.interaction_radius <= 0.0 || self.connection_distance <= 0.0 {
            return Err(ConfigError::Validation(
                "backdrop.interaction_radius and backdrop.connection_distance must be positive"
                    .into(),
            ));
        }
        if self.attraction < 0.0 || self.jitter < 0.0 {
            return Err(ConfigError::Validation(
                "backdrop.attraction and backdrop.jitter must not be negative".into(),
            ));
        }
        if self.grid_spacing != 0.0 && self.grid_spacing < 1.0 {
            return Err(ConfigError::Validation(
                "backdrop.grid_spacing must be 0 (no grid) or at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.line_opacity) {
            return Err(ConfigError::Validation(
                "backdrop.line_opacity must be 0-1".into(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Validation(
                "backdrop.palette must not be empty".into(),
            ));
        }
        for color in &self.palette {
            parse_color("backdrop.palette", color)?;
        }
        Ok(())
    }

    /// Simulation parameters for the particle field.
    ///
    /// Palette entries were checked by `validate`; unparseable ones are skipped.
    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            max_particles: self.max_particles,
            area_per_particle: self.area_per_particle,
            interaction_radius: self.interaction_radius,
            attraction: self.attraction,
            connection_distance: self.connection_distance,
            damping: self.damping,
            jitter: self.jitter,
            line_opacity: self.line_opacity,
            grid_spacing: self.grid_spacing,
            palette: self
                .palette
                .iter()
                .filter_map(|c| Rgba::from_hex(c))
                .collect(),
            ..FieldParams::default()
        }
    }
}

/// Contact relay settings.
///
/// Which channel delivers a submission is decided per request from the
/// environment (`RESEND_API_KEY`, `FORMSPREE_ENDPOINT`); this table only holds
/// the values that do not vary between deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Path the form posts to.
    pub endpoint: String,
    /// Address `folio serve` listens on.
    pub bind: String,
    /// Email API endpoint used when `RESEND_API_KEY` is set.
    pub email_api_url: String,
    /// `from` header for email API deliveries.
    pub sender: String,
    /// Destination address. Falls back to the profile's contact email.
    /// `CONTACT_EMAIL` in the environment overrides both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub subject_prefix: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/contact".to_string(),
            bind: "127.0.0.1:3000".to_string(),
            email_api_url: "https://api.resend.com/emails".to_string(),
            sender: "Portfolio <onboarding@resend.dev>".to_string(),
            recipient: None,
            subject_prefix: "Portfolio contact".to_string(),
        }
    }
}

/// Page rendering parallelism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Maximum number of rendering threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &BuildConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

fn parse_color(key: &str, value: &str) -> Result<Rgba, ConfigError> {
    Rgba::from_hex(value)
        .ok_or_else(|| ConfigError::Validation(format!("{key}: '{value}' is not a #rrggbb color")))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Absolute origin for canonical links, e.g. "https://jane.dev". Empty = relative.
base_url = ""
# Public path of the downloadable resume. Put the file in assets/.
resume_path = "/resume.pdf"
language = "en"
# Directory under the content root copied verbatim to the output root.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# "system" follows prefers-color-scheme; "light" or "dark" pins one palette.
mode = "system"
accent = "#6366f1"

[theme.light]
background = "#ffffff"
surface = "#f6f6f8"
text = "#111111"
text_muted = "#666666"
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

[theme.dark]
background = "#0a0a0f"
surface = "#15151d"
text = "#eeeeee"
text_muted = "#999999"
border = "#2a2a35"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# Landing page layout
# ---------------------------------------------------------------------------
[layout]
# Sections top to bottom. Omit one to hide it; each may appear once.
sections = ["hero", "about", "experience", "projects", "blog", "contact"]
# Posts shown in the landing-page blog section.
latest_posts = 3

# ---------------------------------------------------------------------------
# Particle backdrop (simulated at build time, embedded as SVG)
# ---------------------------------------------------------------------------
[backdrop]
enabled = true
# Same seed + same settings = same picture on every build.
seed = 7
# Viewport in pixels, at most 8192 on each edge.
width = 1440.0
height = 900.0
warmup_frames = 240
# Particle count = min(width * height / area_per_particle, max_particles).
max_particles = 120
area_per_particle = 12000.0
interaction_radius = 150.0
attraction = 0.03
connection_distance = 120.0
damping = 0.98
jitter = 0.05
line_opacity = 0.35
# 0 disables the grid; otherwise at least 1.
grid_spacing = 48.0
palette = ["#6366f1", "#8b5cf6", "#06b6d4"]

# ---------------------------------------------------------------------------
# Contact relay (folio serve)
# ---------------------------------------------------------------------------
# Delivery channel is chosen per request from the environment:
#   RESEND_API_KEY set      -> email API
#   FORMSPREE_ENDPOINT set  -> form relay
#   neither                 -> submission is logged only
# CONTACT_EMAIL overrides the recipient.
[contact]
endpoint = "/api/contact"
bind = "127.0.0.1:3000"
email_api_url = "https://api.resend.com/emails"
sender = "Portfolio <onboarding@resend.dev>"
# recipient = "you@example.com"   # default: profile contact email
subject_prefix = "Portfolio contact"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Maximum page-rendering threads. Omit to auto-detect (= CPU cores).
# max_threads = 4
"##
}

/// Generate CSS custom properties for the theme.
///
/// `system` mode emits the light palette plus a `prefers-color-scheme: dark`
/// override; `light` and `dark` emit a single palette.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    let vars = |scheme: &ColorScheme, indent: &str| {
        format!(
            "{i}--color-bg: {};\n{i}--color-surface: {};\n{i}--color-text: {};\n{i}--color-text-muted: {};\n{i}--color-border: {};\n{i}--color-link: {};\n{i}--color-link-hover: {};",
            scheme.background,
            scheme.surface,
            scheme.text,
            scheme.text_muted,
            scheme.border,
            scheme.link,
            scheme.link_hover,
            i = indent,
        )
    };
    let accent = format!("    --color-accent: {};", theme.accent);
    match theme.mode {
        ThemeMode::Light => format!(":root {{\n{}\n{accent}\n}}", vars(&theme.light, "    ")),
        ThemeMode::Dark => format!(":root {{\n{}\n{accent}\n}}", vars(&theme.dark, "    ")),
        ThemeMode::System => format!(
            ":root {{\n{}\n{accent}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
            vars(&theme.light, "    "),
            vars(&theme.dark, "        "),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_validates() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_layout_has_every_section_in_order() {
        let config = SiteConfig::default();
        assert_eq!(config.layout.sections, Section::ALL.to_vec());
        assert_eq!(config.layout.latest_posts, 3);
    }

    #[test]
    fn default_backdrop_matches_field_defaults() {
        let config = BackdropConfig::default();
        assert_eq!(config.max_particles, 120);
        assert_eq!(config.area_per_particle, 12000.0);
        assert_eq!(config.damping, 0.98);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[theme.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.theme.light.background, "#fafafa");
        // Defaults preserved
        assert_eq!(config.theme.light.text, "#111111");
        assert_eq!(config.theme.dark.background, "#0a0a0f");
        assert_eq!(config.contact.endpoint, "/api/contact");
    }

    #[test]
    fn parse_theme_mode() {
        let config: SiteConfig = toml::from_str("[theme]\nmode = \"dark\"").unwrap();
        assert_eq!(config.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn parse_unknown_theme_mode_is_error() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\nmode = \"sepia\"");
        assert!(result.is_err());
    }

    #[test]
    fn parse_section_order() {
        let config: SiteConfig =
            toml::from_str("[layout]\nsections = [\"contact\", \"hero\"]").unwrap();
        assert_eq!(config.layout.sections, vec![Section::Contact, Section::Hero]);
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let mut config = SiteConfig::default();
        config.layout.sections = vec![Section::Hero, Section::About, Section::Hero];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hero"));
    }

    #[test]
    fn relative_resume_path_is_rejected() {
        let mut config = SiteConfig::default();
        config.site.resume_path = "resume.pdf".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let mut config = SiteConfig::default();
        config.contact.bind = "localhost".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_palette_color_is_rejected() {
        let mut config = SiteConfig::default();
        config.backdrop.palette = vec!["#6366f1".to_string(), "purple".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("purple"));
    }

    #[test]
    fn damping_out_of_range_is_rejected() {
        let mut config = SiteConfig::default();
        config.backdrop.damping = 1.5;
        assert!(config.validate().is_err());
        config.backdrop.damping = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_backdrop_values_are_rejected() {
        for overlay in [
            "[backdrop]\njitter = inf",
            "[backdrop]\nattraction = nan",
            "[backdrop]\nwidth = inf",
            "[backdrop]\nheight = -inf",
            "[backdrop]\ngrid_spacing = nan",
        ] {
            let overlay: toml::Value = toml::from_str(overlay).unwrap();
            let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
            assert!(
                err.to_string().contains("finite"),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn negative_jitter_and_attraction_are_rejected() {
        let mut config = SiteConfig::default();
        config.backdrop.jitter = -0.1;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.backdrop.attraction = -1.0;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.backdrop.jitter = 0.0;
        config.backdrop.attraction = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn oversized_backdrop_is_rejected() {
        let mut config = SiteConfig::default();
        config.backdrop.width = 1e9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn fractional_grid_spacing_is_rejected() {
        let mut config = SiteConfig::default();
        config.backdrop.grid_spacing = 0.001;
        assert!(config.validate().is_err());
        config.backdrop.grid_spacing = 0.0;
        config.validate().unwrap();
        config.backdrop.grid_spacing = 1.0;
        config.validate().unwrap();
    }

    #[test]
    fn field_params_carry_palette() {
        let config = BackdropConfig::default();
        let params = config.field_params();
        assert_eq!(params.palette.len(), 3);
        assert_eq!(params.max_particles, 120);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.theme.mode, ThemeMode::System);
        assert_eq!(config.site.resume_path, "/resume.pdf");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[contact]
recipient = "inbox@example.com"

[backdrop]
seed = 42
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(
            config.contact.recipient.as_deref(),
            Some("inbox@example.com")
        );
        assert_eq!(config.backdrop.seed, 42);
        // Untouched values keep their defaults
        assert_eq!(config.backdrop.max_particles, 120);
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[site]\nresume = \"/cv.pdf\"").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.layout.sections, defaults.layout.sections);
        assert_eq!(config.backdrop.palette, defaults.backdrop.palette);
        assert_eq!(config.theme.dark.surface, defaults.theme.dark.surface);
        assert_eq!(config.contact.email_api_url, defaults.contact.email_api_url);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("seed = 7").unwrap();
        let overlay: toml::Value = toml::from_str("seed = 9").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("seed").unwrap().as_integer(), Some(9));
    }

    #[test]
    fn merge_toml_preserves_sibling_keys() {
        let base: toml::Value = toml::from_str("[backdrop]\nseed = 7\nwidth = 1440.0").unwrap();
        let overlay: toml::Value = toml::from_str("[backdrop]\nseed = 9").unwrap();
        let merged = merge_toml(base, overlay);
        let backdrop = merged.get("backdrop").unwrap();
        assert_eq!(backdrop.get("seed").unwrap().as_integer(), Some(9));
        assert_eq!(backdrop.get("width").unwrap().as_float(), Some(1440.0));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("sections = [\"hero\", \"about\"]").unwrap();
        let overlay: toml::Value = toml::from_str("sections = [\"blog\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("sections").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // CSS generation tests
    // =========================================================================

    #[test]
    fn system_theme_css_has_dark_media_query() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--color-bg: #ffffff"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("--color-bg: #0a0a0f"));
        assert!(css.contains("--color-accent: #6366f1"));
    }

    #[test]
    fn pinned_dark_theme_css_has_no_media_query() {
        let theme = ThemeConfig {
            mode: ThemeMode::Dark,
            ..ThemeConfig::default()
        };
        let css = generate_theme_css(&theme);
        assert!(css.contains("--color-bg: #0a0a0f"));
        assert!(!css.contains("#ffffff"));
        assert!(!css.contains("@media"));
    }

    #[test]
    fn theme_css_includes_all_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        for var in [
            "--color-bg:",
            "--color-surface:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-link:",
            "--color-link-hover:",
        ] {
            assert!(css.contains(var), "missing {var}");
        }
    }

    // =========================================================================
    // Build config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&BuildConfig { max_threads: None }), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = BuildConfig {
            max_threads: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = BuildConfig {
            max_threads: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
