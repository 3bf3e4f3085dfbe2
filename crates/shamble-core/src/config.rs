//! Behavior tuning.
//!
//! Every field falls back to the compile-time default in [`crate::constants`],
//! so a JSON file only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleTuning {
    pub min_secs: f32,
    pub max_secs: f32,
}

impl Default for IdleTuning {
    fn default() -> Self {
        Self {
            min_secs: IDLE_MIN_SECS,
            max_secs: IDLE_MAX_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolTuning {
    pub turn_on_spot_threshold: f32,
    pub slerp_speed: f32,
    pub speed: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            turn_on_spot_threshold: PATROL_TURN_ON_SPOT_THRESHOLD,
            slerp_speed: PATROL_SLERP_SPEED,
            speed: PATROL_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertedTuning {
    pub max_duration: f32,
    pub waypoint_angle_threshold: f32,
    pub threat_angle_threshold: f32,
    pub direction_change_time: f32,
    /// Degrees per second while scanning.
    pub turn_speed: f32,
}

impl Default for AlertedTuning {
    fn default() -> Self {
        Self {
            max_duration: ALERTED_MAX_DURATION,
            waypoint_angle_threshold: ALERTED_WAYPOINT_ANGLE_THRESHOLD,
            threat_angle_threshold: ALERTED_THREAT_ANGLE_THRESHOLD,
            direction_change_time: ALERTED_DIRECTION_CHANGE_TIME,
            turn_speed: ALERTED_TURN_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    pub speed: f32,
    pub slerp_speed: f32,
    pub repath_distance_multiplier: f32,
    pub repath_visual_min: f32,
    pub repath_visual_max: f32,
    pub repath_audio_min: f32,
    pub repath_audio_max: f32,
    pub max_duration: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            speed: PURSUIT_SPEED,
            slerp_speed: PURSUIT_SLERP_SPEED,
            repath_distance_multiplier: PURSUIT_REPATH_DISTANCE_MULTIPLIER,
            repath_visual_min: PURSUIT_REPATH_VISUAL_MIN,
            repath_visual_max: PURSUIT_REPATH_VISUAL_MAX,
            repath_audio_min: PURSUIT_REPATH_AUDIO_MIN,
            repath_audio_max: PURSUIT_REPATH_AUDIO_MAX,
            max_duration: PURSUIT_MAX_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub speed: f32,
    pub stopping_distance: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            speed: 0.0,
            stopping_distance: ATTACK_STOPPING_DISTANCE,
            look_at_weight: ATTACK_LOOK_AT_WEIGHT,
            look_at_angle_threshold: ATTACK_LOOK_AT_ANGLE_THRESHOLD,
            slerp_speed: ATTACK_SLERP_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingTuning {
    pub satisfied_threshold: f32,
    pub slerp_speed: f32,
    pub layer: String,
    pub state: String,
}

impl Default for FeedingTuning {
    fn default() -> Self {
        Self {
            satisfied_threshold: FEEDING_SATISFIED_THRESHOLD,
            slerp_speed: FEEDING_SLERP_SPEED,
            layer: FEEDING_LAYER.to_string(),
            state: FEEDING_STATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagdollTuning {
    pub impulse_threshold: f32,
    pub wait_secs: f32,
    pub blend_secs: f32,
    pub transition_secs: f32,
}

impl Default for RagdollTuning {
    fn default() -> Self {
        Self {
            impulse_threshold: RAGDOLL_IMPULSE_THRESHOLD,
            wait_secs: REANIMATION_WAIT_SECS,
            blend_secs: REANIMATION_BLEND_SECS,
            transition_secs: REANIMATION_TRANSITION_SECS,
        }
    }
}

/// Complete tuning for one agent's state machine and body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub stopping_distance: StoppingDistance,
    pub idle: IdleTuning,
    pub patrol: PatrolTuning,
    pub alerted: AlertedTuning,
    pub pursuit: PursuitTuning,
    pub attack: AttackTuning,
    pub feeding: FeedingTuning,
    pub ragdoll: RagdollTuning,
}

/// Machine-wide target trigger radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoppingDistance(pub f32);

impl Default for StoppingDistance {
    fn default() -> Self {
        Self(DEFAULT_STOPPING_DISTANCE)
    }
}

impl AiTuning {
    /// Parse and validate tuning from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: AiTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make timers or blends meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle.min_secs < 0.0 || self.idle.min_secs > self.idle.max_secs {
            return Err(ConfigError::InvalidRange {
                field: "idle",
                min: self.idle.min_secs,
                max: self.idle.max_secs,
            });
        }
        if self.pursuit.repath_visual_min > self.pursuit.repath_visual_max {
            return Err(ConfigError::InvalidRange {
                field: "pursuit.repath_visual",
                min: self.pursuit.repath_visual_min,
                max: self.pursuit.repath_visual_max,
            });
        }
        if self.pursuit.repath_audio_min > self.pursuit.repath_audio_max {
            return Err(ConfigError::InvalidRange {
                field: "pursuit.repath_audio",
                min: self.pursuit.repath_audio_min,
                max: self.pursuit.repath_audio_max,
            });
        }
        let positive = [
            ("stopping_distance", self.stopping_distance.0),
            ("alerted.max_duration", self.alerted.max_duration),
            ("pursuit.max_duration", self.pursuit.max_duration),
            ("ragdoll.blend_secs", self.ragdoll.blend_secs),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
