//! Difficulty profiles
//!
//! A profile is the full set of tuning constants for one run. Profiles are
//! either built in (Easy, Medium, Extreme) or loaded from JSON, and are
//! validated before they can reach the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::spawn::SpawnTable;
use super::state::ObstacleKind;
use crate::consts::{MAX_OBSTACLE_DISTANCE, MIN_OBSTACLE_DISTANCE, OBSTACLE_HITBOX_INSET};

/// Reasons a profile is rejected at load time
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile `{profile}`: {field} must be positive (got {value})")]
    NotPositive {
        profile: String,
        field: &'static str,
        value: f32,
    },
    #[error("profile `{profile}`: max speed {max} is below initial speed {initial}")]
    SpeedRange {
        profile: String,
        initial: f32,
        max: f32,
    },
    #[error("profile `{profile}`: {field} must be finite and not negative (got {value})")]
    Negative {
        profile: String,
        field: &'static str,
        value: f32,
    },
    #[error("profile `{profile}`: speed ramp interval must be at least one frame")]
    ZeroRampInterval { profile: String },
    #[error("profile `{profile}`: min frequency {min} must be in [1, {base}]")]
    FrequencyRange { profile: String, min: f32, base: f32 },
    #[error("profile `{profile}`: no obstacle kinds allowed")]
    NoObstacleKinds { profile: String },
    #[error("profile `{profile}`: spawn distance range {min}..{max} is empty")]
    DistanceRange { profile: String, min: f32, max: f32 },
    #[error("profile `{profile}`: shortest obstacle would be {height}px, too short to hit")]
    ObstacleHeight { profile: String, height: f32 },
    #[error("profile `{profile}`: spawn pattern weights must be non-negative and not all zero")]
    SpawnWeights { profile: String },
    #[error("profile `{profile}`: speed burst chance {chance} / factor {factor} out of range")]
    SpeedBurst {
        profile: String,
        chance: f32,
        factor: f32,
    },
    #[error("profile set is empty")]
    EmptySet,
    #[error("duplicate profile name `{0}`")]
    DuplicateName(String),
    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Background drawn behind the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum Background {
    /// Static vertical gradient
    Gradient { top: String, bottom: String },
    /// Colour sets cycled by the cosmetic timers
    Cycling,
}

/// Occasional faster movement for individual obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBurst {
    /// Per obstacle, per frame probability
    pub chance: f32,
    /// Multiplier on game speed when the burst fires
    pub factor: f32,
}

/// Where and how densely obstacles appear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRules {
    /// Lower bound of the random spawn distance beyond the right edge
    pub min_distance: f32,
    /// Upper bound of the random spawn distance
    pub max_distance: f32,
    /// Lower bound also grows with speed: `max(min_distance, k * speed)`
    pub min_distance_per_speed: f32,
    /// A spawn is suppressed while the last obstacle is within
    /// `spacing_base + spacing_per_speed * speed` of the right edge
    pub spacing_base: f32,
    pub spacing_per_speed: f32,
    /// Extra height added to every randomly sized obstacle
    #[serde(default)]
    pub height_bonus: f32,
    #[serde(default)]
    pub patterns: SpawnTable,
}

impl SpawnRules {
    /// Minimum gap from the right edge the last obstacle must have cleared
    pub fn min_spacing(&self, speed: f32) -> f32 {
        self.spacing_base + self.spacing_per_speed * speed
    }

    /// Smallest obstacle any pattern can produce: the shortest random roll
    /// lowered by the triple pattern's first step
    pub fn shortest_obstacle(&self) -> f32 {
        30.0 + self.height_bonus - 10.0
    }

    /// Lower bound of the spawn distance at the given speed
    pub fn distance_floor(&self, speed: f32) -> f32 {
        self.min_distance.max(self.min_distance_per_speed * speed)
    }
}

/// Immutable tuning constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub initial_speed: f32,
    pub speed_increase: f32,
    /// Frames between speed increases
    pub speed_ramp_frames: u64,
    pub max_speed: f32,
    /// Base spawn interval in frames, before speed is taken into account
    pub obstacle_frequency: f32,
    /// Floor for the spawn interval
    pub min_frequency: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Fractional gravity increase per unit of speed above initial
    #[serde(default)]
    pub gravity_speed_scale: f32,
    pub obstacle_kinds: Vec<ObstacleKind>,
    pub spawn: SpawnRules,
    #[serde(default)]
    pub speed_burst: Option<SpeedBurst>,
    pub background: Background,
    /// Enables shake, flashes, distractions and colour cycling
    #[serde(default)]
    pub chaos_effects: bool,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::medium()
    }
}

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            name: "Easy".to_string(),
            description: "Slower obstacles and bigger jumps. Perfect for beginners!".to_string(),
            initial_speed: 4.0,
            speed_increase: 0.3,
            speed_ramp_frames: 1000,
            max_speed: 8.0,
            obstacle_frequency: 100.0,
            min_frequency: 30.0,
            jump_force: 12.0,
            gravity: 0.5,
            gravity_speed_scale: 0.0,
            obstacle_kinds: vec![ObstacleKind::Boba, ObstacleKind::Dumpling, ObstacleKind::Sushi],
            spawn: SpawnRules {
                min_distance: MIN_OBSTACLE_DISTANCE,
                max_distance: MAX_OBSTACLE_DISTANCE,
                min_distance_per_speed: 200.0,
                spacing_base: 120.0,
                spacing_per_speed: 10.0,
                height_bonus: 0.0,
                patterns: SpawnTable::single_only(),
            },
            speed_burst: None,
            background: Background::Gradient {
                top: "#87CEEB".to_string(),
                bottom: "#e0f7fa".to_string(),
            },
            chaos_effects: false,
        }
    }

    pub fn medium() -> Self {
        Self {
            name: "Medium".to_string(),
            description: "Balanced gameplay with all obstacle types. A good challenge!".to_string(),
            initial_speed: 5.0,
            speed_increase: 0.4,
            speed_ramp_frames: 1000,
            max_speed: 10.0,
            obstacle_frequency: 80.0,
            min_frequency: 30.0,
            jump_force: 12.0,
            gravity: 0.55,
            gravity_speed_scale: 0.0,
            obstacle_kinds: ObstacleKind::ALL.to_vec(),
            spawn: SpawnRules {
                min_distance: MIN_OBSTACLE_DISTANCE - 50.0,
                max_distance: MAX_OBSTACLE_DISTANCE,
                min_distance_per_speed: 200.0,
                spacing_base: 120.0,
                spacing_per_speed: 10.0,
                height_bonus: 5.0,
                patterns: SpawnTable::single_only(),
            },
            speed_burst: None,
            background: Background::Gradient {
                top: "#ffb347".to_string(),
                bottom: "#ffcc33".to_string(),
            },
            chaos_effects: false,
        }
    }

    pub fn extreme() -> Self {
        Self {
            name: "Extreme".to_string(),
            description: "Double obstacles, visual distractions, and screen shake. For the truly insane!"
                .to_string(),
            initial_speed: 10.0,
            speed_increase: 0.9,
            speed_ramp_frames: 400,
            max_speed: 18.0,
            obstacle_frequency: 30.0,
            min_frequency: 15.0,
            jump_force: 11.0,
            gravity: 0.7,
            gravity_speed_scale: 0.08,
            obstacle_kinds: vec![ObstacleKind::Ramen, ObstacleKind::Takoyaki],
            spawn: SpawnRules {
                min_distance: MIN_OBSTACLE_DISTANCE - 100.0,
                max_distance: MAX_OBSTACLE_DISTANCE,
                min_distance_per_speed: 100.0,
                spacing_base: 80.0,
                spacing_per_speed: 3.0,
                height_bonus: 10.0,
                patterns: SpawnTable {
                    single: 0.3,
                    double: 0.3,
                    triple: 0.2,
                    staggered: 0.2,
                },
            },
            speed_burst: Some(SpeedBurst {
                chance: 0.1,
                factor: 1.5,
            }),
            background: Background::Cycling,
            chaos_effects: true,
        }
    }

    /// The three stock profiles, easiest first
    pub fn builtin() -> Vec<Self> {
        vec![Self::easy(), Self::medium(), Self::extreme()]
    }

    /// Parse and validate a single profile
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Apex height of a jump from the ground, ignoring speed scaling
    pub fn max_jump_height(&self) -> f32 {
        (self.jump_force * self.jump_force) / (2.0 * self.gravity)
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> Result<(), ProfileError> {
        let name = || self.name.clone();
        let positive = |field: &'static str, value: f32| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ProfileError::NotPositive {
                    profile: name(),
                    field,
                    value,
                })
            }
        };

        positive("initial_speed", self.initial_speed)?;
        positive("max_speed", self.max_speed)?;
        positive("jump_force", self.jump_force)?;
        positive("gravity", self.gravity)?;
        positive("obstacle_frequency", self.obstacle_frequency)?;

        let non_negative = |field: &'static str, value: f32| {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ProfileError::Negative {
                    profile: name(),
                    field,
                    value,
                })
            }
        };

        non_negative("speed_increase", self.speed_increase)?;
        non_negative("gravity_speed_scale", self.gravity_speed_scale)?;
        non_negative("spawn.min_distance_per_speed", self.spawn.min_distance_per_speed)?;
        non_negative("spawn.spacing_base", self.spawn.spacing_base)?;
        non_negative("spawn.spacing_per_speed", self.spawn.spacing_per_speed)?;

        if self.max_speed < self.initial_speed {
            return Err(ProfileError::SpeedRange {
                profile: name(),
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }
        if self.speed_ramp_frames == 0 {
            return Err(ProfileError::ZeroRampInterval { profile: name() });
        }
        if self.min_frequency < 1.0 || self.min_frequency > self.obstacle_frequency {
            return Err(ProfileError::FrequencyRange {
                profile: name(),
                min: self.min_frequency,
                base: self.obstacle_frequency,
            });
        }
        if self.obstacle_kinds.is_empty() {
            return Err(ProfileError::NoObstacleKinds { profile: name() });
        }

        let spawn = &self.spawn;
        if !(spawn.min_distance >= 0.0 && spawn.max_distance.is_finite())
            || spawn.min_distance > spawn.max_distance
        {
            return Err(ProfileError::DistanceRange {
                profile: name(),
                min: spawn.min_distance,
                max: spawn.max_distance,
            });
        }
        let shortest = spawn.shortest_obstacle();
        if !(shortest > 2.0 * OBSTACLE_HITBOX_INSET) {
            return Err(ProfileError::ObstacleHeight {
                profile: name(),
                height: shortest,
            });
        }
        if !spawn.patterns.is_valid() {
            return Err(ProfileError::SpawnWeights { profile: name() });
        }

        if let Some(burst) = self.speed_burst {
            if !(0.0..=1.0).contains(&burst.chance) || !(burst.factor >= 1.0 && burst.factor.is_finite()) {
                return Err(ProfileError::SpeedBurst {
                    profile: name(),
                    chance: burst.chance,
                    factor: burst.factor,
                });
            }
        }

        Ok(())
    }
}

/// An ordered, validated list of selectable profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSet {
    profiles: Vec<DifficultyProfile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            profiles: DifficultyProfile::builtin(),
        }
    }
}

impl ProfileSet {
    /// Build a set, validating every profile and rejecting duplicate names
    pub fn new(profiles: Vec<DifficultyProfile>) -> Result<Self, ProfileError> {
        if profiles.is_empty() {
            return Err(ProfileError::EmptySet);
        }
        for (i, profile) in profiles.iter().enumerate() {
            profile.validate()?;
            if profiles[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&profile.name))
            {
                return Err(ProfileError::DuplicateName(profile.name.clone()));
            }
        }
        Ok(Self { profiles })
    }

    /// Parse a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profiles: Vec<DifficultyProfile> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DifficultyProfile> {
        self.profiles.get(index)
    }

    /// Case-insensitive lookup by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DifficultyProfile> {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        for profile in DifficultyProfile::builtin() {
            assert!(profile.validate().is_ok(), "{} failed validation", profile.name);
        }
        assert!(ProfileSet::default().len() == 3);
    }

    #[test]
    fn test_rejects_max_below_initial() {
        let mut profile = DifficultyProfile::easy();
        profile.max_speed = 3.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::SpeedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_gravity() {
        let mut profile = DifficultyProfile::medium();
        profile.gravity = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::NotPositive { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_frequency_and_kinds() {
        let mut profile = DifficultyProfile::medium();
        profile.min_frequency = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::FrequencyRange { .. })
        ));

        let mut profile = DifficultyProfile::medium();
        profile.obstacle_kinds.clear();
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::NoObstacleKinds { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_burst_and_weights() {
        let mut profile = DifficultyProfile::extreme();
        profile.speed_burst = Some(SpeedBurst {
            chance: 1.5,
            factor: 1.5,
        });
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::SpeedBurst { .. })
        ));

        let mut profile = DifficultyProfile::extreme();
        profile.spawn.patterns = SpawnTable {
            single: 0.0,
            double: 0.0,
            triple: 0.0,
            staggered: 0.0,
        };
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::SpawnWeights { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_spawn_rules() {
        let mut profile = DifficultyProfile::easy();
        profile.spawn.height_bonus = -100.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::ObstacleHeight { .. })
        ));

        let mut profile = DifficultyProfile::medium();
        profile.spawn.spacing_base = -1.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::Negative { field: "spawn.spacing_base", .. })
        ));

        let mut profile = DifficultyProfile::medium();
        profile.spawn.spacing_per_speed = -3.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::Negative { field: "spawn.spacing_per_speed", .. })
        ));

        let mut profile = DifficultyProfile::medium();
        profile.spawn.min_distance_per_speed = -200.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::Negative { field: "spawn.min_distance_per_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut profile = DifficultyProfile::medium();
        profile.speed_increase = f32::NAN;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::Negative { field: "speed_increase", .. })
        ));

        let mut profile = DifficultyProfile::extreme();
        profile.gravity_speed_scale = f32::INFINITY;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::Negative { field: "gravity_speed_scale", .. })
        ));

        let mut profile = DifficultyProfile::extreme();
        profile.spawn.height_bonus = f32::NAN;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::ObstacleHeight { .. })
        ));
    }

    #[test]
    fn test_every_valid_profile_spawns_hittable_obstacles() {
        use crate::sim::spawn::plan_spawn;
        use rand::SeedableRng;

        let mut profile = DifficultyProfile::extreme();
        profile.spawn.height_bonus = -9.0;
        assert!(profile.validate().is_ok());

        let mut rng = rand_pcg::Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            let plan = plan_spawn(&profile, 800.0, profile.initial_speed, &mut rng);
            for obstacle in plan.obstacles {
                assert!(obstacle.height > 2.0 * OBSTACLE_HITBOX_INSET);
            }
        }
    }

    #[test]
    fn test_json_roundtrip_and_errors() {
        let json = serde_json::to_string(&DifficultyProfile::extreme()).unwrap();
        let parsed = DifficultyProfile::from_json(&json).unwrap();
        assert_eq!(parsed, DifficultyProfile::extreme());

        assert!(matches!(
            DifficultyProfile::from_json("{ not json"),
            Err(ProfileError::Json(_))
        ));
    }

    #[test]
    fn test_profile_set_from_json() {
        let json = r##"[
            {
                "name": "Chill",
                "initial_speed": 3.0,
                "speed_increase": 0.2,
                "speed_ramp_frames": 1200,
                "max_speed": 6.0,
                "obstacle_frequency": 120.0,
                "min_frequency": 40.0,
                "jump_force": 13.0,
                "gravity": 0.5,
                "obstacle_kinds": ["boba", "sushi"],
                "spawn": {
                    "min_distance": 700.0,
                    "max_distance": 1300.0,
                    "min_distance_per_speed": 200.0,
                    "spacing_base": 150.0,
                    "spacing_per_speed": 10.0
                },
                "background": { "style": "gradient", "top": "#000", "bottom": "#333" }
            }
        ]"##;
        let set = ProfileSet::from_json(json).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.position("chill"), Some(0));
        let chill = set.get(0).unwrap();
        assert_eq!(chill.spawn.patterns, SpawnTable::single_only());
        assert_eq!(chill.speed_burst, None);
        assert!(!chill.chaos_effects);
    }

    #[test]
    fn test_profile_set_rejects_duplicates_and_empty() {
        assert!(matches!(ProfileSet::new(vec![]), Err(ProfileError::EmptySet)));
        let result = ProfileSet::new(vec![DifficultyProfile::easy(), DifficultyProfile::easy()]);
        assert!(matches!(result, Err(ProfileError::DuplicateName(_))));
    }

    #[test]
    fn test_max_jump_height() {
        // 12^2 / (2 * 0.5)
        assert_eq!(DifficultyProfile::easy().max_jump_height(), 144.0);
    }

    #[test]
    fn test_spawn_rules_helpers() {
        let rules = DifficultyProfile::easy().spawn;
        assert_eq!(rules.min_spacing(4.0), 160.0);
        assert_eq!(rules.distance_floor(2.0), 600.0);
        assert_eq!(rules.distance_floor(5.0), 1000.0);
    }
}
