//! Level themes and small presentation helpers
//!
//! Kept free of browser types so the choices can be tested natively.

use glam::Vec2;

use crate::sim::{Environment, Weather};

/// Palette for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub cannonball: &'static str,
    pub trail: &'static str,
}

pub const THEMES: [Theme; 6] = [
    Theme {
        name: "Desert Wasteland",
        background: "#D2B48C",
        cannonball: "#8B4513",
        trail: "#CD853F",
    },
    Theme {
        name: "Deep Space",
        background: "#191970",
        cannonball: "#FFFFFF",
        trail: "#4169E1",
    },
    Theme {
        name: "Mystic Forest",
        background: "#228B22",
        cannonball: "#8B4513",
        trail: "#32CD32",
    },
    Theme {
        name: "Frozen Tundra",
        background: "#B0E0E6",
        cannonball: "#000080",
        trail: "#87CEEB",
    },
    Theme {
        name: "Volcanic Crater",
        background: "#8B0000",
        cannonball: "#FF4500",
        trail: "#FF6347",
    },
    Theme {
        name: "Ocean Depths",
        background: "#006994",
        cannonball: "#FFD700",
        trail: "#00CED1",
    },
];

/// Theme shown on `level`, cycling every six levels
pub fn theme_for_level(level: u32) -> &'static Theme {
    &THEMES[level as usize % THEMES.len()]
}

/// Crosshair wobble amplitude in pixels
pub fn crosshair_sway(env: &Environment) -> f32 {
    if env.weather == Weather::Wind {
        env.wind.abs() * 0.5 + 1.0
    } else {
        1.0
    }
}

/// Where the crosshair is drawn for a pointer at `aim`
pub fn crosshair_position(aim: Vec2, env: &Environment, time_ms: f64, sway_enabled: bool) -> Vec2 {
    if !sway_enabled {
        return aim;
    }
    let phase = (time_ms * 0.01) as f32;
    aim + Vec2::new(phase.sin(), phase.cos()) * crosshair_sway(env)
}

/// HUD wind readout, `None` when calm
pub fn wind_label(wind: f32) -> Option<String> {
    if wind == 0.0 {
        return None;
    }
    let direction = if wind > 0.0 { "Right" } else { "Left" };
    Some(format!("Wind: {:.1} {}", wind.abs(), direction))
}

/// Score with thousands separators
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_cycle() {
        assert_eq!(theme_for_level(1).name, "Deep Space");
        assert_eq!(theme_for_level(6).name, "Desert Wasteland");
        assert_eq!(theme_for_level(11), theme_for_level(5));
    }

    #[test]
    fn test_sway_grows_with_wind() {
        let calm = Environment::clear();
        assert_eq!(crosshair_sway(&calm), 1.0);
        let windy = Environment {
            weather: Weather::Wind,
            wind: -3.0,
        };
        assert_eq!(crosshair_sway(&windy), 2.5);
        // Rain carries no wind sway even if a value lingers
        let rain = Environment {
            weather: Weather::Rain,
            wind: 3.0,
        };
        assert_eq!(crosshair_sway(&rain), 1.0);
    }

    #[test]
    fn test_crosshair_stays_near_aim() {
        let aim = Vec2::new(300.0, 200.0);
        let env = Environment {
            weather: Weather::Wind,
            wind: 4.0,
        };
        for t in [0.0, 123.0, 99_999.0] {
            let p = crosshair_position(aim, &env, t, true);
            assert!(p.distance(aim) <= crosshair_sway(&env) + 1e-3);
        }
        assert_eq!(crosshair_position(aim, &env, 50.0, false), aim);
    }

    #[test]
    fn test_wind_label() {
        assert_eq!(wind_label(0.0), None);
        assert_eq!(wind_label(1.26).as_deref(), Some("Wind: 1.3 Right"));
        assert_eq!(wind_label(-0.5).as_deref(), Some("Wind: 0.5 Left"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(999), "999");
        assert_eq!(format_score(1_000), "1,000");
        assert_eq!(format_score(1_234_567), "1,234,567");
    }
}
