use serde::{Deserialize, Serialize};

/// Colour theme the engine is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Drawing backend the engine is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Bitmap canvas.
    #[default]
    Raster,
    /// Scalable vector output.
    Vector,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" | "canvas" => Ok(Backend::Raster),
            "vector" | "svg" => Ok(Backend::Vector),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// User-facing render toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderMode {
    pub theme: Theme,
    pub backend: Backend,
    /// Folded into the specification before apply; never forces recreation.
    pub decal_pattern_enabled: bool,
}

impl RenderMode {
    /// The part of the mode an engine instance is bound to at creation.
    pub fn engine_mode(&self) -> EngineMode {
        EngineMode {
            theme: self.theme,
            backend: self.backend,
        }
    }
}

/// Mode fields fixed for the lifetime of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineMode {
    pub theme: Theme,
    pub backend: Backend,
}

/// What the render controller must do with its instance before an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// No instance yet.
    Create,
    /// Push the new specification into the live instance.
    Reuse,
    /// Dispose the live instance, then create one with the new mode.
    Recreate,
}

/// Decide reuse vs. recreate from the live instance's mode and the next one.
pub fn plan_transition(current: Option<EngineMode>, next: EngineMode) -> ModeTransition {
    match current {
        None => ModeTransition::Create,
        Some(mode) if mode == next => ModeTransition::Reuse,
        Some(_) => ModeTransition::Recreate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(theme: Theme, backend: Backend) -> EngineMode {
        EngineMode { theme, backend }
    }

    #[test]
    fn test_plan_create_without_instance() {
        let next = mode(Theme::Light, Backend::Raster);
        assert_eq!(plan_transition(None, next), ModeTransition::Create);
    }

    #[test]
    fn test_plan_reuse_on_same_mode() {
        let m = mode(Theme::Dark, Backend::Vector);
        assert_eq!(plan_transition(Some(m), m), ModeTransition::Reuse);
    }

    #[test]
    fn test_plan_recreate_on_theme_or_backend_change() {
        let base = mode(Theme::Light, Backend::Raster);
        assert_eq!(
            plan_transition(Some(base), mode(Theme::Dark, Backend::Raster)),
            ModeTransition::Recreate
        );
        assert_eq!(
            plan_transition(Some(base), mode(Theme::Light, Backend::Vector)),
            ModeTransition::Recreate
        );
    }

    #[test]
    fn test_decal_toggle_does_not_change_engine_mode() {
        let off = RenderMode::default();
        let on = RenderMode {
            decal_pattern_enabled: true,
            ..off
        };
        assert_eq!(
            plan_transition(Some(off.engine_mode()), on.engine_mode()),
            ModeTransition::Reuse
        );
    }

    #[test]
    fn test_render_mode_serde_names() {
        let json = r#"{"theme":"dark","backend":"vector","decalPatternEnabled":true}"#;
        let mode: RenderMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode.theme, Theme::Dark);
        assert_eq!(mode.backend, Backend::Vector);
        assert!(mode.decal_pattern_enabled);
    }

    #[test]
    fn test_parse_backend_aliases() {
        assert_eq!("svg".parse::<Backend>(), Ok(Backend::Vector));
        assert_eq!("canvas".parse::<Backend>(), Ok(Backend::Raster));
        assert!("webgl".parse::<Backend>().is_err());
    }
}
