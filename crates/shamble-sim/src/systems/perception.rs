//! Perception system: finds the stimuli overlapping each agent's sensor
//! volume and reports them as trigger enter/stay/exit events.

use std::collections::BTreeMap;

use glam::Vec3;
use hecs::World;

use shamble_ai::services::PhysicsQuery;
use shamble_ai::{Agent, Stimulus, StimulusSource};
use shamble_core::constants::*;
use shamble_core::enums::{BoneControlMode, TriggerPhase};
use shamble_core::types::{angle_between, flatten, ColliderId};

use crate::components::{Food, Player, SensorContacts, SoundSource};
use crate::world_setup::player_center;

/// A stimulus and the volume it occupies.
struct Candidate {
    stimulus: Stimulus,
    volume: Volume,
}

enum Volume {
    Sphere { radius: f32 },
    /// Light cone from `stimulus.position` along `direction`.
    Cone { direction: Vec3, range: f32 },
}

impl Candidate {
    /// Whether the volume reaches a sensor sphere.
    fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        let apex = self.stimulus.position;
        match self.volume {
            Volume::Sphere { radius: own } => apex.distance(center) <= radius + own,
            Volume::Cone { direction, range } => {
                let to_sensor = center - apex;
                to_sensor.length() <= range && angle_between(direction, to_sensor) <= FLASHLIGHT_HALF_ANGLE
            }
        }
    }
}

fn gather(world: &World) -> (Vec<Candidate>, Option<Vec3>) {
    let mut candidates = Vec::new();
    let mut player_position = None;

    for (_, player) in world.query::<&Player>().iter() {
        player_position = Some(player.position);
        let center = player_center(player.position);
        candidates.push(Candidate {
            stimulus: Stimulus {
                collider: player.collider,
                position: center,
                source: StimulusSource::Player,
            },
            volume: Volume::Sphere { radius: PLAYER_RADIUS },
        });
        if let Some(light) = player.flashlight {
            candidates.push(Candidate {
                stimulus: Stimulus {
                    collider: light.collider,
                    position: center,
                    source: StimulusSource::Flashlight {
                        range: FLASHLIGHT_RANGE,
                    },
                },
                volume: Volume::Cone {
                    direction: light.direction,
                    range: FLASHLIGHT_RANGE,
                },
            });
        }
    }

    for (_, source) in world.query::<&SoundSource>().iter() {
        if !source.emitter.is_enabled() {
            continue;
        }
        let radius = source.emitter.radius();
        candidates.push(Candidate {
            stimulus: Stimulus {
                collider: source.collider,
                position: source.emitter.position,
                source: StimulusSource::SoundEmitter { radius },
            },
            volume: Volume::Sphere { radius },
        });
    }

    for (_, food) in world.query::<&Food>().iter() {
        candidates.push(Candidate {
            stimulus: Stimulus {
                collider: food.collider,
                position: food.position,
                source: StimulusSource::Food,
            },
            volume: Volume::Sphere { radius: FOOD_RADIUS },
        });
    }

    (candidates, player_position)
}

/// Clear each agent's threat buffers, refresh its melee flag and feed it
/// this tick's sensor events.
pub fn run(world: &mut World, physics: &dyn PhysicsQuery, dt: f32) {
    let (candidates, player_position) = gather(world);

    for (_entity, (agent, contacts)) in world.query_mut::<(&mut Agent, &mut SensorContacts)>() {
        agent.fixed_update(Some(physics), dt);

        let animated = agent.bone_control() == BoneControlMode::Animated;
        agent.mind.in_melee_range = animated
            && player_position.is_some_and(|player| {
                flatten(player - agent.body.position).length() <= agent.mind.characteristics.melee_radius
            });

        let sensor = agent.body.sensor_origin();
        let reach = agent.mind.sensor_radius();
        let overlapping: BTreeMap<ColliderId, Stimulus> = candidates
            .iter()
            .filter(|candidate| candidate.overlaps(sensor, reach))
            .map(|candidate| (candidate.stimulus.collider, candidate.stimulus))
            .collect();

        for (collider, stimulus) in &overlapping {
            let phase = if contacts.inside.contains_key(collider) {
                TriggerPhase::Stay
            } else {
                TriggerPhase::Enter
            };
            agent.on_trigger_event(Some(physics), phase, stimulus);
        }
        for (collider, stimulus) in &contacts.inside {
            if !overlapping.contains_key(collider) {
                agent.on_trigger_event(Some(physics), TriggerPhase::Exit, stimulus);
            }
        }
        contacts.inside = overlapping;
    }
}
