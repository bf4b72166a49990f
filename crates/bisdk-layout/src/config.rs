//! Responsive grid configuration.
//!
//! Defaults describe a 12 column grid. Every value can be overridden through
//! `BISDK_GRID_*` environment variables; parse failures are reported as
//! diagnostics and leave the default in place.

use std::env;
use std::fmt;

use crate::model::Breakpoint;

pub const ENV_GRID_COLUMNS: &str = "BISDK_GRID_COLUMNS";
pub const ENV_GRID_ROW_HEIGHT_PX: &str = "BISDK_GRID_ROW_HEIGHT_PX";
pub const ENV_GRID_MAX_HEIGHT_AS_RATIO_XS: &str = "BISDK_GRID_MAX_HEIGHT_AS_RATIO_XS";
/// Comma separated `screen=px` pairs, e.g. `xs=480,xl=1600`.
pub const ENV_GRID_CONTAINER_WIDTHS: &str = "BISDK_GRID_CONTAINER_WIDTHS";

/// Container width in pixels for each breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerWidths {
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
}

impl ContainerWidths {
    #[must_use]
    pub const fn for_screen(&self, screen: Breakpoint) -> u32 {
        match screen {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }

    fn set(&mut self, screen: Breakpoint, width: u32) {
        match screen {
            Breakpoint::Xs => self.xs = width,
            Breakpoint::Sm => self.sm = width,
            Breakpoint::Md => self.md = width,
            Breakpoint::Lg => self.lg = width,
            Breakpoint::Xl => self.xl = width,
        }
    }
}

impl Default for ContainerWidths {
    fn default() -> Self {
        Self {
            xs: 480,
            sm: 768,
            md: 970,
            lg: 1170,
            xl: 1400,
        }
    }
}

/// Grid geometry shared by sizing helpers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Number of grid columns in one row.
    pub columns_count: u32,
    pub container_widths: ContainerWidths,
    /// Upper bound for `heightAsRatio` on the xs breakpoint.
    pub max_height_as_ratio_xs: f64,
    /// Height of one grid row in pixels.
    pub row_height_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns_count: 12,
            container_widths: ContainerWidths::default(),
            max_height_as_ratio_xs: 40.0,
            row_height_px: 20,
        }
    }
}

/// Result of reading the configuration together with every diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfigParse {
    pub config: GridConfig,
    pub errors: Vec<GridConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl GridConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for GridConfigError {}

impl GridConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> GridConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> GridConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Width of a single grid column in pixels for a breakpoint.
    #[must_use]
    pub fn grid_column_width_px(&self, screen: Breakpoint) -> f64 {
        if self.columns_count == 0 {
            return 0.0;
        }
        f64::from(self.container_widths.for_screen(screen)) / f64::from(self.columns_count)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<GridConfigError>> {
        let mut errors = Vec::new();
        validate_positive("columns_count", self.columns_count, &mut errors);
        validate_positive("row_height_px", self.row_height_px, &mut errors);
        if !(self.max_height_as_ratio_xs.is_finite() && self.max_height_as_ratio_xs > 0.0) {
            errors.push(GridConfigError::new(
                "max_height_as_ratio_xs",
                self.max_height_as_ratio_xs.to_string(),
                "must be a positive number",
            ));
        }
        let widths = self.container_widths;
        for pair in Breakpoint::ALL.windows(2) {
            let (smaller, larger) = (pair[0], pair[1]);
            if widths.for_screen(smaller) > widths.for_screen(larger) {
                errors.push(GridConfigError::new(
                    "container_widths",
                    format!(
                        "{smaller}={},{larger}={}",
                        widths.for_screen(smaller),
                        widths.for_screen(larger)
                    ),
                    "widths must not shrink as the screen grows",
                ));
            }
        }
        validate_positive("container_widths.xs", widths.xs, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> GridConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = GridConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_GRID_COLUMNS) {
        match value.trim().parse::<u32>() {
            Ok(parsed) => config.columns_count = parsed,
            Err(_) => errors.push(GridConfigError::new(
                "columns_count",
                value,
                "expected unsigned integer",
            )),
        }
    }

    if let Some(value) = get(ENV_GRID_ROW_HEIGHT_PX) {
        match value.trim().parse::<u32>() {
            Ok(parsed) => config.row_height_px = parsed,
            Err(_) => errors.push(GridConfigError::new(
                "row_height_px",
                value,
                "expected unsigned integer",
            )),
        }
    }

    if let Some(value) = get(ENV_GRID_MAX_HEIGHT_AS_RATIO_XS) {
        match value.trim().parse::<f64>() {
            Ok(parsed) => config.max_height_as_ratio_xs = parsed,
            Err(_) => errors.push(GridConfigError::new(
                "max_height_as_ratio_xs",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_GRID_CONTAINER_WIDTHS) {
        for entry in value.split(',').filter(|entry| !entry.trim().is_empty()) {
            let parsed = entry.split_once('=').and_then(|(screen, width)| {
                let width = width.trim().parse::<u32>().ok()?;
                Some((Breakpoint::parse(screen)?, width))
            });
            match parsed {
                Some((screen, width)) => config.container_widths.set(screen, width),
                None => errors.push(GridConfigError::new(
                    "container_widths",
                    entry.trim(),
                    "expected <xs|sm|md|lg|xl>=<px>",
                )),
            }
        }
    }

    if let Err(mut invalid) = config.validate() {
        errors.append(&mut invalid);
    }

    GridConfigParse { config, errors }
}

fn validate_positive(field: &'static str, value: u32, errors: &mut Vec<GridConfigError>) {
    if value == 0 {
        errors.push(GridConfigError::new(
            field,
            value.to_string(),
            "must be >= 1",
        ));
    }
}
