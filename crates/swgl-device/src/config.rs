/// Maximum surface height accepted by the surface-creation entry points.
pub const OUTLINE_RESOLUTION: u32 = 8192;

const DISABLE_FAST_BLIT_ENV: &str = "SWGL_DISABLE_FAST_BLIT";
const MAX_SURFACE_HEIGHT_ENV: &str = "SWGL_MAX_SURFACE_HEIGHT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Allow the raw-copy blit strategies. When `false`, every copy goes through the generic
    /// converting blitter, which is useful for conformance comparisons.
    pub fast_paths: bool,
    /// Surfaces taller than this are rejected at creation time.
    pub max_surface_height: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            fast_paths: true,
            max_surface_height: OUTLINE_RESOLUTION,
        }
    }
}

impl DeviceConfig {
    /// Defaults, overridden by `SWGL_DISABLE_FAST_BLIT` and `SWGL_MAX_SURFACE_HEIGHT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if env_var_truthy(DISABLE_FAST_BLIT_ENV) {
            config.fast_paths = false;
        }
        if let Some(height) = std::env::var(MAX_SURFACE_HEIGHT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
        {
            config.max_surface_height = height;
        }
        config
    }
}

fn env_var_truthy(name: &str) -> bool {
    let Ok(raw) = std::env::var(name) else {
        return false;
    };

    is_truthy(&raw)
}

fn is_truthy(raw: &str) -> bool {
    let v = raw.trim();
    v == "1"
        || v.eq_ignore_ascii_case("true")
        || v.eq_ignore_ascii_case("yes")
        || v.eq_ignore_ascii_case("on")
}
