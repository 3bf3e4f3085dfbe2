//! Simulation constants and tuning defaults.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- State machine ---

/// Radius of the target trigger when `set_target` gives no explicit radius (m).
pub const DEFAULT_STOPPING_DISTANCE: f32 = 1.0;

// --- Perception ---

/// Sensor origin height above the agent's root (m).
pub const SENSOR_HEIGHT: f32 = 1.6;

/// Default sensor volume radius (m).
pub const SENSOR_RADIUS: f32 = 10.0;

/// Default melee reach, measured from the agent root (m).
pub const MELEE_RADIUS: f32 = 1.5;

/// Food is ignored while satisfaction is above this level.
pub const FOOD_INTEREST_THRESHOLD: f32 = 0.9;

// --- Idle ---

pub const IDLE_MIN_SECS: f32 = 10.0;
pub const IDLE_MAX_SECS: f32 = 60.0;

// --- Patrol ---

/// Steering deviation (degrees) above which a patrolling agent stops to turn on the spot.
pub const PATROL_TURN_ON_SPOT_THRESHOLD: f32 = 80.0;
pub const PATROL_SLERP_SPEED: f32 = 5.0;
pub const PATROL_SPEED: f32 = 1.0;

// --- Alerted ---

pub const ALERTED_MAX_DURATION: f32 = 10.0;
pub const ALERTED_WAYPOINT_ANGLE_THRESHOLD: f32 = 90.0;
pub const ALERTED_THREAT_ANGLE_THRESHOLD: f32 = 10.0;
pub const ALERTED_DIRECTION_CHANGE_TIME: f32 = 1.5;
/// Scan turn rate (degrees per second).
pub const ALERTED_TURN_SPEED: f32 = 45.0;

// --- Pursuit ---

pub const PURSUIT_SPEED: f32 = 1.0;
pub const PURSUIT_SLERP_SPEED: f32 = 5.0;
pub const PURSUIT_REPATH_DISTANCE_MULTIPLIER: f32 = 0.035;
pub const PURSUIT_REPATH_VISUAL_MIN: f32 = 0.05;
pub const PURSUIT_REPATH_VISUAL_MAX: f32 = 5.0;
pub const PURSUIT_REPATH_AUDIO_MIN: f32 = 0.25;
pub const PURSUIT_REPATH_AUDIO_MAX: f32 = 5.0;
pub const PURSUIT_MAX_DURATION: f32 = 40.0;

// --- Attack ---

pub const ATTACK_STOPPING_DISTANCE: f32 = 1.0;
pub const ATTACK_LOOK_AT_WEIGHT: f32 = 0.7;
pub const ATTACK_LOOK_AT_ANGLE_THRESHOLD: f32 = 15.0;
pub const ATTACK_SLERP_SPEED: f32 = 5.0;
/// Attack variants are drawn from `1..ATTACK_VARIANT_LIMIT`.
pub const ATTACK_VARIANT_LIMIT: i32 = 100;

// --- Feeding ---

pub const FEEDING_SATISFIED_THRESHOLD: f32 = 0.9;
pub const FEEDING_SLERP_SPEED: f32 = 5.0;
pub const FEEDING_LAYER: &str = "Cinematic";
pub const FEEDING_STATE: &str = "Feeding";

// --- Damage & ragdoll ---

/// Impulse magnitude above which a hit moves a segment / knocks the agent down.
pub const RAGDOLL_IMPULSE_THRESHOLD: f32 = 1.0;
pub const HEAD_REACTION_ANGLE: f32 = 10.0;
pub const UPPER_BODY_REACTION_ANGLE: f32 = 20.0;
pub const REANIMATION_WAIT_SECS: f32 = 3.0;
pub const REANIMATION_BLEND_SECS: f32 = 1.5;
/// Window after reanimation starts during which the body root is realigned.
pub const REANIMATION_TRANSITION_SECS: f32 = 0.1;
/// Height above the recorded hip from which the floor probe is cast (m).
pub const FLOOR_PROBE_LIFT: f32 = 0.25;
/// Max distance when snapping a reanimated body onto the navigation mesh (m).
pub const NAVMESH_SNAP_DISTANCE: f32 = 25.0;

// --- Characteristics ---

pub const DEFAULT_HEALTH: i32 = 100;
pub const DEFAULT_FOV: f32 = 50.0;
pub const DEFAULT_UPPER_BODY_THRESHOLD: i32 = 30;
pub const DEFAULT_LIMP_THRESHOLD: i32 = 30;
pub const DEFAULT_CRAWL_THRESHOLD: i32 = 90;
pub const DEFAULT_REPLENISH_RATE: f32 = 0.5;
pub const DEFAULT_DEPLETION_RATE: f32 = 0.1;

// --- Sound ---

/// Emitters whose decay time is at or below this never interpolate.
pub const SOUND_MIN_DECAY: f32 = 0.02;
/// Animator `screaming` curve level above which a scream is in progress.
pub const SCREAMING_CURVE_THRESHOLD: f32 = 0.1;
pub const DEFAULT_SCREAM_RADIUS: f32 = 20.0;

// --- Headless host ---

/// Walking speed at a normalized locomotion speed of 1 (m/s).
pub const WALK_SPEED: f32 = 1.4;
/// Seconds a scream emitter takes to fade out.
pub const SCREAM_DECAY_SECS: f32 = 3.0;
/// Seconds the animator's `screaming` curve takes to fall back to zero.
pub const SCREAM_CURVE_SECS: f32 = 2.0;
/// Reach of the player's flashlight beam (m).
pub const FLASHLIGHT_RANGE: f32 = 20.0;
/// Half-angle of the flashlight cone (degrees).
pub const FLASHLIGHT_HALF_ANGLE: f32 = 20.0;
/// Height of the player's collider centre; the flashlight is held there too (m).
pub const PLAYER_CENTER_HEIGHT: f32 = 0.9;
pub const PLAYER_RADIUS: f32 = 0.4;
/// Radius of the sphere that stands in for an agent's body (m).
pub const AGENT_BODY_RADIUS: f32 = 0.4;
/// Height of the agent's hips above its root while standing (m).
pub const AGENT_HIP_HEIGHT: f32 = 1.0;
pub const FOOD_RADIUS: f32 = 0.3;
