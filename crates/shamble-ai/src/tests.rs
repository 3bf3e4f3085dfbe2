#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::{Arc, Mutex};

    use glam::{Quat, Vec3};
    use proptest::prelude::*;

    use shamble_core::components::Characteristics;
    use shamble_core::config::AiTuning;
    use shamble_core::enums::*;
    use shamble_core::events::AiEvent;
    use shamble_core::types::{AgentId, ColliderId, JointId, LayerMask};
    use shamble_core::waypoint::WaypointNetwork;

    use crate::agent::Agent;
    use crate::body::AgentBody;
    use crate::damage::DamageEvent;
    use crate::fsm::StateMachine;
    use crate::mind::AgentMind;
    use crate::profiles::get_profile;
    use crate::sensor::{Stimulus, StimulusSource};
    use crate::services::*;

    const AGENT: AgentId = AgentId(1);
    const PLAYER: ColliderId = ColliderId(10);
    const WALL: ColliderId = ColliderId(20);
    const OWN_BODY: ColliderId = ColliderId(30);
    const FLOOR: ColliderId = ColliderId(40);

    // --- Test doubles ---

    #[derive(Default)]
    struct NavState {
        destination: Option<Vec3>,
        destinations: Vec<Vec3>,
        position: Vec3,
        stopped: bool,
        disabled: bool,
        pending: bool,
        stale: bool,
        status: PathStatus,
        speed: f32,
        warped: Option<Vec3>,
    }

    struct MockNav(Arc<Mutex<NavState>>);

    impl Navigator for MockNav {
        fn set_destination(&mut self, destination: Vec3) {
            let mut s = self.0.lock().unwrap();
            s.destination = Some(destination);
            s.destinations.push(destination);
        }
        fn has_path(&self) -> bool {
            self.0.lock().unwrap().destination.is_some()
        }
        fn path_pending(&self) -> bool {
            self.0.lock().unwrap().pending
        }
        fn is_path_stale(&self) -> bool {
            self.0.lock().unwrap().stale
        }
        fn path_status(&self) -> PathStatus {
            self.0.lock().unwrap().status
        }
        fn remaining_distance(&self) -> f32 {
            let s = self.0.lock().unwrap();
            s.destination.map_or(0.0, |d| d.distance(s.position))
        }
        fn steering_target(&self) -> Vec3 {
            let s = self.0.lock().unwrap();
            s.destination.unwrap_or(s.position)
        }
        fn desired_velocity(&self) -> Vec3 {
            let s = self.0.lock().unwrap();
            let to = s.destination.unwrap_or(s.position) - s.position;
            to.normalize_or_zero() * s.speed
        }
        fn set_stopped(&mut self, stopped: bool) {
            self.0.lock().unwrap().stopped = stopped;
        }
        fn set_enabled(&mut self, enabled: bool) {
            self.0.lock().unwrap().disabled = !enabled;
        }
        fn is_enabled(&self) -> bool {
            !self.0.lock().unwrap().disabled
        }
        fn set_update_rotation(&mut self, _enabled: bool) {}
        fn set_speed(&mut self, speed: f32) {
            self.0.lock().unwrap().speed = speed;
        }
        fn position(&self) -> Vec3 {
            self.0.lock().unwrap().position
        }
        fn warp(&mut self, position: Vec3) {
            let mut s = self.0.lock().unwrap();
            s.position = position;
            s.warped = Some(position);
        }
        fn sample_position(&self, position: Vec3, _max_distance: f32) -> Option<Vec3> {
            Some(position)
        }
    }

    #[derive(Default)]
    struct AnimLog {
        floats: HashMap<String, f32>,
        ints: HashMap<String, i32>,
        bools: HashMap<String, bool>,
        triggers: Vec<String>,
        disabled: bool,
        active: Option<(String, String)>,
        look_at: Option<(Vec3, f32)>,
    }

    struct MockAnimator(Arc<Mutex<AnimLog>>);

    impl Animator for MockAnimator {
        fn set_float(&mut self, name: &str, value: f32) {
            self.0.lock().unwrap().floats.insert(name.to_string(), value);
        }
        fn set_int(&mut self, name: &str, value: i32) {
            self.0.lock().unwrap().ints.insert(name.to_string(), value);
        }
        fn set_bool(&mut self, name: &str, value: bool) {
            self.0.lock().unwrap().bools.insert(name.to_string(), value);
        }
        fn set_trigger(&mut self, name: &str) {
            self.0.lock().unwrap().triggers.push(name.to_string());
        }
        fn get_float(&self, name: &str) -> f32 {
            self.0.lock().unwrap().floats.get(name).copied().unwrap_or(0.0)
        }
        fn layer_weight(&self, _layer: &str) -> f32 {
            0.0
        }
        fn is_state_active(&self, layer: &str, state: &str) -> bool {
            self.0
                .lock()
                .unwrap()
                .active
                .as_ref()
                .is_some_and(|(l, s)| l == layer && s == state)
        }
        fn set_enabled(&mut self, enabled: bool) {
            self.0.lock().unwrap().disabled = !enabled;
        }
        fn is_enabled(&self) -> bool {
            !self.0.lock().unwrap().disabled
        }
        fn set_look_at(&mut self, position: Vec3, weight: f32) {
            self.0.lock().unwrap().look_at = Some((position, weight));
        }
    }

    #[derive(Default)]
    struct RigState {
        poses: Vec<JointPose>,
        head: Vec3,
        left_foot: Vec3,
        right_foot: Vec3,
        kinematic: bool,
        impulses: Vec<(JointId, Vec3)>,
    }

    struct MockRig(Arc<Mutex<RigState>>);

    impl Rig for MockRig {
        fn joints(&self) -> Vec<JointId> {
            (0..self.0.lock().unwrap().poses.len() as u32).map(JointId).collect()
        }
        fn root_joint(&self) -> Option<JointId> {
            Some(JointId(0))
        }
        fn joint_pose(&self, joint: JointId) -> Option<JointPose> {
            self.0.lock().unwrap().poses.get(joint.0 as usize).copied()
        }
        fn set_joint_world(&mut self, joint: JointId, position: Vec3, rotation: Quat) {
            if let Some(pose) = self.0.lock().unwrap().poses.get_mut(joint.0 as usize) {
                pose.position = position;
                pose.rotation = rotation;
            }
        }
        fn set_joint_local_rotation(&mut self, joint: JointId, rotation: Quat) {
            if let Some(pose) = self.0.lock().unwrap().poses.get_mut(joint.0 as usize) {
                pose.local_rotation = rotation;
            }
        }
        fn bone_position(&self, bone: HumanBone) -> Option<Vec3> {
            let s = self.0.lock().unwrap();
            Some(match bone {
                HumanBone::Hips => s.poses.first()?.position,
                HumanBone::Head => s.head,
                HumanBone::LeftFoot => s.left_foot,
                HumanBone::RightFoot => s.right_foot,
            })
        }
        fn set_segments_kinematic(&mut self, kinematic: bool) {
            self.0.lock().unwrap().kinematic = kinematic;
        }
        fn apply_impulse(&mut self, joint: JointId, impulse: Vec3) {
            self.0.lock().unwrap().impulses.push((joint, impulse));
        }
        fn pose_from_animation(&mut self, _root_position: Vec3, _root_rotation: Quat) {}
    }

    struct Sphere {
        collider: ColliderId,
        center: Vec3,
        radius: f32,
    }

    #[derive(Default)]
    struct MockPhysics {
        spheres: Vec<Sphere>,
        floor: bool,
        owners: HashMap<ColliderId, AgentId>,
    }

    impl MockPhysics {
        fn sphere(mut self, collider: ColliderId, center: Vec3, radius: f32) -> Self {
            self.spheres.push(Sphere {
                collider,
                center,
                radius,
            });
            self
        }

        fn owned_by(mut self, collider: ColliderId, agent: AgentId) -> Self {
            self.owners.insert(collider, agent);
            self
        }
    }

    impl PhysicsQuery for MockPhysics {
        fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, _mask: LayerMask) -> Vec<RayHit> {
            let mut hits = Vec::new();
            for s in &self.spheres {
                let oc = origin - s.center;
                let b = oc.dot(direction);
                let c = oc.length_squared() - s.radius * s.radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    continue;
                }
                let (t0, t1) = (-b - disc.sqrt(), -b + disc.sqrt());
                let t = if t0 >= 0.0 { t0 } else { t1 };
                if t >= 0.0 && t <= max_distance {
                    let point = origin + direction * t;
                    hits.push(RayHit {
                        distance: t,
                        point,
                        normal: (point - s.center).normalize_or_zero(),
                        collider: s.collider,
                    });
                }
            }
            if self.floor && direction.y < 0.0 && origin.y >= 0.0 {
                let t = origin.y / -direction.y;
                if t <= max_distance {
                    hits.push(RayHit {
                        distance: t,
                        point: origin + direction * t,
                        normal: Vec3::Y,
                        collider: FLOOR,
                    });
                }
            }
            hits
        }

        fn owner_of(&self, collider: ColliderId) -> Option<AgentId> {
            self.owners.get(&collider).copied()
        }
    }

    struct Handles {
        nav: Arc<Mutex<NavState>>,
        anim: Arc<Mutex<AnimLog>>,
        rig: Arc<Mutex<RigState>>,
    }

    fn standing_rig() -> RigState {
        let hips = JointPose {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::IDENTITY,
            local_rotation: Quat::IDENTITY,
        };
        let spine = JointPose {
            position: Vec3::new(0.0, 1.3, 0.0),
            rotation: Quat::IDENTITY,
            local_rotation: Quat::IDENTITY,
        };
        RigState {
            poses: vec![hips, spine],
            head: Vec3::new(0.0, 1.7, 0.0),
            left_foot: Vec3::new(-0.1, 0.0, 0.0),
            right_foot: Vec3::new(0.1, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn build(characteristics: Characteristics, tuning: AiTuning, states: &[StateId]) -> (Agent, Handles) {
        let handles = Handles {
            nav: Arc::new(Mutex::new(NavState::default())),
            anim: Arc::new(Mutex::new(AnimLog::default())),
            rig: Arc::new(Mutex::new(standing_rig())),
        };
        let body = AgentBody::default()
            .with_navigator(Box::new(MockNav(handles.nav.clone())))
            .with_animator(Box::new(MockAnimator(handles.anim.clone())))
            .with_rig(Box::new(MockRig(handles.rig.clone())));
        let mind = AgentMind::new(AGENT, characteristics, tuning, 7);
        let mut agent = Agent::new(mind, body, StateMachine::with_states(states));
        agent.start(None);
        (agent, handles)
    }

    fn default_agent() -> (Agent, Handles) {
        build(Characteristics::default(), AiTuning::default(), &StateId::ALL)
    }

    fn player_at(position: Vec3) -> Stimulus {
        Stimulus {
            collider: PLAYER,
            position,
            source: StimulusSource::Player,
        }
    }

    fn sound_at(collider: u64, position: Vec3, radius: f32) -> Stimulus {
        Stimulus {
            collider: ColliderId(collider),
            position,
            source: StimulusSource::SoundEmitter { radius },
        }
    }

    /// One host tick: fixed update, perception, behavior update.
    fn tick(agent: &mut Agent, physics: &MockPhysics, stimuli: &[Stimulus], dt: f32) {
        agent.fixed_update(Some(physics), dt);
        for stimulus in stimuli {
            agent.on_trigger_event(Some(physics), TriggerPhase::Stay, stimulus);
        }
        agent.update(Some(physics), dt);
    }

    fn events(agent: &mut Agent) -> Vec<AiEvent> {
        agent.drain_events().collect()
    }

    // --- State machine ---

    #[test]
    fn test_starts_in_idle() {
        let (mut agent, _) = default_agent();
        assert_eq!(agent.current_state(), Some(StateId::Idle));
        assert_eq!(
            events(&mut agent),
            vec![AiEvent::StateChanged {
                agent: AGENT,
                from: None,
                to: StateId::Idle
            }]
        );
    }

    #[test]
    fn test_scenario_a_idle_sees_player_then_pursues() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 5.0);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);

        tick(&mut agent, &physics, &[player_at(player)], 0.016);

        assert_eq!(agent.current_state(), Some(StateId::Pursuit));
        assert_eq!(agent.mind.target_kind(), TargetKind::VisualPlayer);
        assert!((agent.mind.target().distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_occluded_player_is_not_seen() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 5.0);
        let physics = MockPhysics::default()
            .sphere(PLAYER, player, 0.4)
            .sphere(WALL, Vec3::new(0.0, 1.6, 2.5), 0.5);

        tick(&mut agent, &physics, &[player_at(player)], 0.016);

        assert_eq!(agent.current_state(), Some(StateId::Idle));
        assert!(agent.mind.target().is_none());
    }

    #[test]
    fn test_own_body_does_not_block_sight() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 4.0);
        let physics = MockPhysics::default()
            .sphere(PLAYER, player, 0.4)
            .sphere(OWN_BODY, Vec3::new(0.0, 1.6, 0.2), 0.3)
            .owned_by(OWN_BODY, AGENT);

        agent.fixed_update(Some(&physics), 0.016);
        agent.on_trigger_event(Some(&physics), TriggerPhase::Enter, &player_at(player));

        assert_eq!(agent.mind.visual_threat.kind, TargetKind::VisualPlayer);
    }

    #[test]
    fn test_player_outside_fov_is_not_seen() {
        let (mut agent, _) = default_agent();
        // Directly to the right, far outside the 25 degree half-angle.
        let player = Vec3::new(4.0, 1.6, 0.0);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);

        agent.fixed_update(Some(&physics), 0.016);
        agent.on_trigger_event(Some(&physics), TriggerPhase::Enter, &player_at(player));

        assert!(agent.mind.visual_threat.is_none());
    }

    #[test]
    fn test_exit_events_are_ignored() {
        let (mut agent, _) = default_agent();
        agent.fixed_update(None, 0.016);
        agent.on_trigger_event(None, TriggerPhase::Exit, &sound_at(5, Vec3::new(0.0, 1.6, 3.0), 10.0));
        assert!(agent.mind.audio_threat.is_none());
    }

    #[test]
    fn test_faint_sound_is_rejected_by_poor_hearing() {
        let characteristics = Characteristics {
            hearing: 0.5,
            ..Default::default()
        };
        let (mut agent, _) = build(characteristics, AiTuning::default(), &StateId::ALL);
        agent.fixed_update(None, 0.016);
        // 8 / 10 = 0.8, scaled by 1.5 for half hearing: 1.2 > 1.
        agent.on_trigger_event(None, TriggerPhase::Stay, &sound_at(5, Vec3::new(0.0, 1.6, 8.0), 10.0));
        assert!(agent.mind.audio_threat.is_none());
        // 4 / 10 * 1.5 = 0.6.
        agent.on_trigger_event(None, TriggerPhase::Stay, &sound_at(6, Vec3::new(0.0, 1.6, 4.0), 10.0));
        assert_eq!(agent.mind.audio_threat.collider, Some(ColliderId(6)));
    }

    #[test]
    fn test_flashlight_acceptance_and_player_priority() {
        let characteristics = Characteristics {
            sight: 0.5,
            intelligence: 0.5,
            ..Default::default()
        };
        let (mut agent, _) = build(characteristics, AiTuning::default(), &StateId::ALL);
        let light = |range: f32| Stimulus {
            collider: ColliderId(50),
            position: Vec3::new(0.0, 1.6, 4.0),
            source: StimulusSource::Flashlight { range },
        };

        agent.fixed_update(None, 0.016);
        // 4 / 5 = 0.8 exceeds both sight and intelligence.
        agent.on_trigger_event(None, TriggerPhase::Stay, &light(5.0));
        assert!(agent.mind.visual_threat.is_none());
        // 4 / 10 = 0.4.
        agent.on_trigger_event(None, TriggerPhase::Stay, &light(10.0));
        assert_eq!(agent.mind.visual_threat.kind, TargetKind::VisualLight);

        // A buffered player blocks lights entirely.
        let player = Vec3::new(0.0, 1.6, 4.5);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);
        agent.fixed_update(Some(&physics), 0.016);
        agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &player_at(player));
        agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &light(10.0));
        assert_eq!(agent.mind.visual_threat.kind, TargetKind::VisualPlayer);
    }

    #[test]
    fn test_food_ignored_while_satisfied() {
        let (mut agent, _) = default_agent();
        let food_pos = Vec3::new(0.0, 1.0, 3.0);
        let physics = MockPhysics::default().sphere(ColliderId(60), food_pos, 0.5);
        let food = Stimulus {
            collider: ColliderId(60),
            position: food_pos,
            source: StimulusSource::Food,
        };

        agent.fixed_update(Some(&physics), 0.016);
        agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &food);
        assert!(agent.mind.visual_threat.is_none(), "fully fed agents ignore food");

        agent.mind.characteristics.satisfaction = 0.5;
        agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &food);
        assert_eq!(agent.mind.visual_threat.kind, TargetKind::VisualFood);

        // Any audio threat suppresses food.
        agent.fixed_update(Some(&physics), 0.016);
        agent.on_trigger_event(None, TriggerPhase::Stay, &sound_at(5, Vec3::new(0.0, 1.6, 2.0), 10.0));
        agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &food);
        assert!(agent.mind.visual_threat.is_none());
    }

    #[test]
    fn test_threats_clear_each_fixed_update() {
        let (mut agent, _) = default_agent();
        agent.fixed_update(None, 0.016);
        agent.on_trigger_event(None, TriggerPhase::Stay, &sound_at(5, Vec3::new(0.0, 1.6, 3.0), 10.0));
        assert!(!agent.mind.audio_threat.is_none());
        agent.fixed_update(None, 0.016);
        assert!(agent.mind.audio_threat.is_none());
    }

    #[test]
    fn test_scenario_b_patrol_advances_and_wraps() {
        let tuning = AiTuning::from_json_str(r#"{ "idle": { "min_secs": 0.0, "max_secs": 0.0 } }"#).unwrap();
        let (mut agent, handles) = build(Characteristics::default(), tuning, &StateId::ALL);
        let points = [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 0.0),
        ];
        agent.mind.waypoints = Some(Arc::new(WaypointNetwork::new("loop", points)));
        let physics = MockPhysics::default();

        tick(&mut agent, &physics, &[], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Patrol));
        assert_eq!(agent.mind.waypoint_cursor.index, Some(0));
        assert_eq!(agent.mind.target_kind(), TargetKind::Waypoint);

        for (arrive_at, expected_next) in [(0usize, 1usize), (1, 2), (2, 0)] {
            // Leave the trigger, then enter it at the waypoint.
            agent.body.position = Vec3::new(-10.0, 0.0, -10.0);
            agent.fixed_update(Some(&physics), 0.016);
            agent.body.position = points[arrive_at];
            agent.fixed_update(Some(&physics), 0.016);
            assert_eq!(agent.mind.waypoint_cursor.index, Some(expected_next));
            assert_eq!(agent.mind.target().position, points[expected_next]);
        }
        let destinations = handles.nav.lock().unwrap().destinations.clone();
        assert_eq!(destinations.last(), Some(&points[0]));
    }

    #[test]
    fn test_patrol_turns_on_the_spot_for_sharp_corners() {
        let tuning = AiTuning::from_json_str(r#"{ "idle": { "min_secs": 0.0, "max_secs": 0.0 } }"#).unwrap();
        let (mut agent, _) = build(Characteristics::default(), tuning, &StateId::ALL);
        // First waypoint is behind the agent.
        agent.mind.waypoints = Some(Arc::new(WaypointNetwork::new("behind", [Vec3::new(0.0, 0.0, -6.0)])));
        let physics = MockPhysics::default();

        tick(&mut agent, &physics, &[], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Patrol));
        tick(&mut agent, &physics, &[], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
    }

    #[test]
    fn test_scenario_c_head_shot_kills_and_ragdolls() {
        let characteristics = Characteristics {
            health: 40,
            ..Default::default()
        };
        let (mut agent, handles) = build(characteristics, AiTuning::default(), &StateId::ALL);
        events(&mut agent);

        let hit = DamageEvent::new(Vec3::new(0.0, 1.7, 0.1), Vec3::new(0.0, 0.0, 0.5), 50)
            .on(JointId(1), BodyRegion::Head);
        agent.take_damage(hit);

        assert_eq!(agent.mind.characteristics.health, 0);
        assert!(agent.is_dead());
        assert_eq!(agent.bone_control(), BoneControlMode::Ragdoll);
        assert_eq!(agent.current_state(), None);
        assert_eq!(agent.ragdoll().reanimation_in(), None, "the dead never get up");
        assert!(!handles.rig.lock().unwrap().kinematic);
        assert!(handles.rig.lock().unwrap().impulses.is_empty(), "weak impulse is not applied");

        let events = events(&mut agent);
        assert!(events.contains(&AiEvent::Died { agent: AGENT }));
        assert!(events
            .iter()
            .any(|e| matches!(e, AiEvent::RagdollStarted { agent: AGENT, .. })));
    }

    #[test]
    fn test_dead_agent_ignores_damage() {
        let characteristics = Characteristics {
            health: 10,
            ..Default::default()
        };
        let (mut agent, _) = build(characteristics, AiTuning::default(), &StateId::ALL);
        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::ZERO, 20).on(JointId(1), BodyRegion::Head));
        events(&mut agent);

        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 50.0, 20).on(JointId(1), BodyRegion::UpperBody));
        assert_eq!(agent.mind.characteristics.upper_body_damage, 0);
        assert!(events(&mut agent).is_empty());
        agent.heal(50);
        assert_eq!(agent.mind.characteristics.health, 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let characteristics = Characteristics {
            health: 90,
            max_health: 100,
            ..Default::default()
        };
        let (mut agent, _) = build(characteristics, AiTuning::default(), &StateId::ALL);
        agent.heal(-5);
        assert_eq!(agent.mind.characteristics.health, 90);
        agent.heal(25);
        assert_eq!(agent.mind.characteristics.health, 100);
    }

    #[test]
    fn test_scenario_d_feeding_until_satisfied() {
        let characteristics = Characteristics {
            satisfaction: 0.85,
            replenish_rate: 60.0,
            ..Default::default()
        };
        let (mut agent, handles) = build(characteristics, AiTuning::default(), &StateId::ALL);
        agent.force_state(StateId::Feeding);
        assert!(agent.mind.feeding);

        // Not replenishing until the eating animation plays.
        tick(&mut agent, &MockPhysics::default(), &[], 0.1);
        assert_eq!(agent.current_state(), Some(StateId::Feeding));
        assert_eq!(agent.mind.characteristics.satisfaction, 0.85);

        handles.anim.lock().unwrap().active = Some(("Cinematic".into(), "Feeding".into()));
        // 0.1 s * 60 / 100 = 0.06 -> 0.91.
        tick(&mut agent, &MockPhysics::default(), &[], 0.1);
        assert!((agent.mind.characteristics.satisfaction - 0.91).abs() < 1e-4);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
        assert!(!agent.mind.feeding, "exit clears the feeding flag");
    }

    #[test]
    fn test_feeding_interrupted_by_sound() {
        let (mut agent, _) = default_agent();
        agent.force_state(StateId::Feeding);
        tick(
            &mut agent,
            &MockPhysics::default(),
            &[sound_at(5, Vec3::new(0.0, 1.6, 3.0), 10.0)],
            0.016,
        );
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
        assert_eq!(agent.mind.target_kind(), TargetKind::Audio);
    }

    #[test]
    fn test_scenario_e_pursuit_times_out_to_patrol() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 6.0);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);
        let tuning = AiTuning::default();
        agent.mind.characteristics.sight = 1.0;

        tick(&mut agent, &physics, &[player_at(player)], 0.5);
        assert_eq!(agent.current_state(), Some(StateId::Pursuit));

        let mut ticks = 0;
        while agent.current_state() == Some(StateId::Pursuit) && ticks < 1000 {
            tick(&mut agent, &physics, &[player_at(player)], 0.5);
            ticks += 1;
        }
        assert_eq!(agent.current_state(), Some(StateId::Patrol));
        // Entered pursuit with zero elapsed; leaves once elapsed exceeds the max.
        let expected = (tuning.pursuit.max_duration / 0.5) as usize + 1;
        assert_eq!(ticks, expected);
    }

    #[test]
    fn test_pursuit_enters_attack_in_melee_range() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 3.0);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);

        tick(&mut agent, &physics, &[player_at(player)], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Pursuit));

        agent.mind.in_melee_range = true;
        tick(&mut agent, &physics, &[player_at(player)], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Attack));
        assert!((1..100).contains(&agent.mind.attack_type));
    }

    #[test]
    fn test_attack_loses_sight_goes_alerted() {
        let (mut agent, _) = default_agent();
        let player = Vec3::new(0.0, 1.6, 3.0);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);
        tick(&mut agent, &physics, &[player_at(player)], 0.016);
        agent.mind.in_melee_range = true;
        tick(&mut agent, &physics, &[player_at(player)], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Attack));

        tick(&mut agent, &physics, &[], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
        assert_eq!(agent.mind.attack_type, 0, "attack exit resets the variant");
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let (mut agent, _) = default_agent();
        agent.force_state(StateId::Attack);
        let rolled = agent.mind.attack_type;
        assert_ne!(rolled, 0);
        events(&mut agent);

        agent.force_state(StateId::Idle);
        assert_eq!(agent.mind.attack_type, 0, "attack exit resets the variant");
        agent.force_state(StateId::Attack);
        assert_ne!(agent.mind.attack_type, 0, "attack enter rolls a new variant");
        assert_eq!(
            events(&mut agent),
            vec![
                AiEvent::StateChanged {
                    agent: AGENT,
                    from: Some(StateId::Attack),
                    to: StateId::Idle
                },
                AiEvent::StateChanged {
                    agent: AGENT,
                    from: Some(StateId::Idle),
                    to: StateId::Attack
                },
            ]
        );
    }

    #[test]
    fn test_forcing_current_state_is_a_no_op() {
        let (mut agent, _) = default_agent();
        agent.force_state(StateId::Alerted);
        events(&mut agent);
        agent.mind.seeking = 1;

        agent.force_state(StateId::Alerted);
        assert!(events(&mut agent).is_empty());
        assert_eq!(agent.mind.seeking, 1, "alerted enter did not run again");
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
    }

    #[test]
    fn test_attack_look_at_weight_ramps() {
        let (mut agent, handles) = default_agent();
        agent.set_target(TargetKind::VisualPlayer, Some(PLAYER), Vec3::new(0.0, 0.0, 1.0));
        agent.force_state(StateId::Attack);
        for _ in 0..10 {
            agent.animator_ik(0.1);
        }
        let (_, weight) = handles.anim.lock().unwrap().look_at.unwrap();
        assert!(weight > 0.3 && weight < 0.7, "weight {weight} eases toward 0.7");

        // Target behind: weight decays again.
        agent.set_target(TargetKind::VisualPlayer, Some(PLAYER), Vec3::new(0.0, 0.0, -1.0));
        agent.animator_ik(0.5);
        let (_, decayed) = handles.anim.lock().unwrap().look_at.unwrap();
        assert!(decayed < weight);
    }

    #[test]
    fn test_alerted_turns_to_pursue_audio_ahead() {
        let (mut agent, _) = default_agent();
        let sound = sound_at(5, Vec3::new(0.0, 1.6, 6.0), 20.0);

        tick(&mut agent, &MockPhysics::default(), &[sound], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
        tick(&mut agent, &MockPhysics::default(), &[sound], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Pursuit));
    }

    #[test]
    fn test_alerted_scans_toward_audio_behind() {
        let characteristics = Characteristics {
            intelligence: 1.0,
            ..Default::default()
        };
        let (mut agent, _) = build(characteristics, AiTuning::default(), &StateId::ALL);
        // Behind and to the right.
        let sound = sound_at(5, Vec3::new(3.0, 1.6, -4.0), 20.0);
        tick(&mut agent, &MockPhysics::default(), &[sound], 0.016);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));

        for _ in 0..4 {
            tick(&mut agent, &MockPhysics::default(), &[sound], 0.5);
        }
        assert_eq!(agent.mind.seeking, 1, "turns right toward the sound");
        assert!(agent.body.forward().x > 0.0);
    }

    // --- Root motion ---

    /// Final rotation without and with a root-rotation request.
    fn rotations(mut run: impl FnMut(&mut Agent)) -> (Quat, Quat) {
        let turned = {
            let (mut agent, _) = default_agent();
            run(&mut agent);
            agent.body.rotation
        };
        let held = {
            let (mut agent, _) = default_agent();
            agent.body.add_root_motion_request(0, 1);
            run(&mut agent);
            agent.body.rotation
        };
        (turned, held)
    }

    #[test]
    fn test_root_rotation_holds_patrol_heading() {
        let (turned, held) = rotations(|agent| {
            agent.mind.waypoints = Some(Arc::new(WaypointNetwork::new("ahead", [Vec3::new(2.0, 0.0, 8.0)])));
            agent.force_state(StateId::Patrol);
            let physics = MockPhysics::default();
            for _ in 0..5 {
                tick(agent, &physics, &[], 0.1);
            }
            assert_eq!(agent.current_state(), Some(StateId::Patrol));
        });
        assert_ne!(turned, Quat::IDENTITY);
        assert_eq!(held, Quat::IDENTITY);
    }

    #[test]
    fn test_root_rotation_holds_pursuit_heading() {
        let player = Vec3::new(1.0, 1.6, 4.5);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);
        let (turned, held) = rotations(|agent| {
            for _ in 0..6 {
                tick(agent, &physics, &[player_at(player)], 0.1);
            }
            assert_eq!(agent.current_state(), Some(StateId::Pursuit));
        });
        assert_ne!(turned, Quat::IDENTITY);
        assert_eq!(held, Quat::IDENTITY);
    }

    #[test]
    fn test_root_rotation_holds_alerted_heading() {
        let sound = sound_at(5, Vec3::new(3.0, 1.6, -4.0), 20.0);
        let (turned, held) = rotations(|agent| {
            agent.mind.characteristics.intelligence = 1.0;
            tick(agent, &MockPhysics::default(), &[sound], 0.016);
            for _ in 0..4 {
                tick(agent, &MockPhysics::default(), &[sound], 0.5);
            }
            assert_eq!(agent.current_state(), Some(StateId::Alerted));
            assert_eq!(agent.mind.seeking, 1, "intent is still expressed");
        });
        assert_ne!(turned, Quat::IDENTITY);
        assert_eq!(held, Quat::IDENTITY);
    }

    #[test]
    fn test_root_rotation_holds_attack_heading() {
        let player = Vec3::new(0.6, 1.6, 2.4);
        let physics = MockPhysics::default().sphere(PLAYER, player, 0.4);
        let (turned, held) = rotations(|agent| {
            tick(agent, &physics, &[player_at(player)], 0.1);
            agent.mind.in_melee_range = true;
            tick(agent, &physics, &[player_at(player)], 0.1);
            assert_eq!(agent.current_state(), Some(StateId::Attack));
            assert_eq!(agent.body.rotation, Quat::IDENTITY, "pursuit hands over before turning");
            tick(agent, &physics, &[player_at(player)], 0.1);
            assert_eq!(agent.current_state(), Some(StateId::Attack));
        });
        assert_ne!(turned, Quat::IDENTITY);
        assert_eq!(held, Quat::IDENTITY);
    }

    #[test]
    fn test_unregistered_state_falls_back_to_idle() {
        let tuning = AiTuning::from_json_str(r#"{ "pursuit": { "max_duration": 0.5 } }"#).unwrap();
        let (mut agent, _) = build(Characteristics::default(), tuning, &[StateId::Idle, StateId::Pursuit]);
        agent.force_state(StateId::Pursuit);
        // Pursuit times out toward Patrol, which this agent does not have.
        tick(&mut agent, &MockPhysics::default(), &[], 1.0);
        assert_eq!(agent.current_state(), Some(StateId::Idle));
    }

    #[test]
    fn test_missing_idle_leaves_machine_inactive() {
        let (mut agent, _) = build(Characteristics::default(), AiTuning::default(), &[StateId::Pursuit]);
        assert_eq!(agent.current_state(), None);
        tick(&mut agent, &MockPhysics::default(), &[], 0.016);
        assert_eq!(agent.current_state(), None);
    }

    #[test]
    fn test_clear_target_is_idempotent() {
        let fresh = AgentMind::new(AGENT, Characteristics::default(), AiTuning::default(), 1);
        let mut mind = AgentMind::new(AGENT, Characteristics::default(), AiTuning::default(), 1);
        mind.set_target(TargetKind::Audio, Some(ColliderId(3)), Vec3::ONE, 4.0);
        assert!(mind.target_trigger().enabled);
        mind.clear_target();
        mind.clear_target();
        assert_eq!(mind.target(), fresh.target());
        assert_eq!(mind.target_trigger(), fresh.target_trigger());
    }

    #[test]
    fn test_satisfaction_depletes_with_speed() {
        let (mut agent, handles) = default_agent();
        agent.mind.speed = 2.0;
        agent.mind.characteristics.depletion_rate = 10.0;
        agent.update(None, 1.0);
        // 10 * 1 s / 100 * 2^3
        assert!((agent.mind.characteristics.satisfaction - 0.2).abs() < 1e-5);
        let anim = handles.anim.lock().unwrap();
        assert_eq!(anim.ints.get(params::STATE), Some(&StateId::Idle.ordinal()));
    }

    // --- Damage & ragdoll ---

    #[test]
    fn test_hit_from_left_plays_head_right_reaction() {
        let (mut agent, handles) = default_agent();
        let hit = DamageEvent::new(Vec3::new(-1.0, 1.7, 0.0), Vec3::new(0.2, 0.0, 0.0), 10)
            .on(JointId(1), BodyRegion::Head)
            .from_instigator(Vec3::new(-3.0, 0.0, 5.0));
        agent.take_damage(hit);

        assert_eq!(agent.bone_control(), BoneControlMode::Animated);
        assert_eq!(agent.mind.characteristics.health, 90);
        let anim = handles.anim.lock().unwrap();
        assert_eq!(anim.ints.get(params::HIT_TYPE), Some(&(HitReaction::HeadRight as i32)));
        assert!(anim.triggers.iter().any(|t| t == params::HIT));
    }

    #[test]
    fn test_instigator_behind_forces_ragdoll() {
        let (mut agent, _) = default_agent();
        let hit = DamageEvent::new(Vec3::new(0.0, 1.2, -0.2), Vec3::new(0.0, 0.0, 0.3), 5)
            .on(JointId(1), BodyRegion::UpperBody)
            .from_instigator(Vec3::new(0.0, 0.0, -4.0));
        agent.take_damage(hit);
        assert_eq!(agent.bone_control(), BoneControlMode::Ragdoll);
        assert_eq!(agent.ragdoll().reanimation_in(), Some(AiTuning::default().ragdoll.wait_secs));
    }

    #[test]
    fn test_lower_body_hit_forces_ragdoll() {
        let (mut agent, handles) = default_agent();
        agent.take_damage(DamageEvent::new(Vec3::new(0.0, 0.4, 0.2), Vec3::ZERO, 5).on(JointId(1), BodyRegion::LowerBody));
        assert_eq!(agent.bone_control(), BoneControlMode::Ragdoll);
        assert_eq!(agent.mind.characteristics.lower_body_damage, 5);
        assert!(handles.nav.lock().unwrap().disabled);
        assert!(handles.anim.lock().unwrap().disabled);
        assert!(!agent.body.hit_collider_enabled);
        assert!(agent.body.voice_muted);
    }

    #[test]
    fn test_ragdoll_round_trip_returns_alerted() {
        let (mut agent, handles) = default_agent();
        agent.body.position = Vec3::new(0.0, 0.5, 0.0);
        let physics = MockPhysics {
            floor: true,
            ..Default::default()
        };
        let hit = DamageEvent::new(Vec3::new(0.0, 1.2, 0.2), Vec3::new(0.0, 0.0, 5.0), 5).on(JointId(1), BodyRegion::UpperBody);
        agent.take_damage(hit);
        assert_eq!(agent.bone_control(), BoneControlMode::Ragdoll);
        assert_eq!(handles.rig.lock().unwrap().impulses.len(), 1);

        let mut guard = 0;
        while agent.bone_control() == BoneControlMode::Ragdoll && guard < 100 {
            tick(&mut agent, &physics, &[], 0.25);
            guard += 1;
        }
        assert_eq!(agent.bone_control(), BoneControlMode::RagdollToAnimated);
        assert!(handles.rig.lock().unwrap().kinematic);
        assert!(!handles.anim.lock().unwrap().disabled, "animator back on for the stand-up");
        assert_eq!(agent.current_state(), None, "behaviors wait for the blend");

        while agent.bone_control() == BoneControlMode::RagdollToAnimated && guard < 200 {
            tick(&mut agent, &physics, &[], 0.05);
            agent.late_update(Some(&physics), 0.05);
            guard += 1;
        }
        assert_eq!(agent.bone_control(), BoneControlMode::Animated);
        assert_eq!(agent.current_state(), Some(StateId::Alerted));
        assert!(!handles.nav.lock().unwrap().disabled);
        assert!(agent.body.hit_collider_enabled);
        assert!(!agent.body.voice_muted);
        assert!(agent.body.position.y.abs() < 1e-4, "snapped onto the floor");

        let events = events(&mut agent);
        assert!(events.contains(&AiEvent::Reanimated { agent: AGENT }));
    }

    #[test]
    fn test_hit_while_ragdolled_restarts_reanimation() {
        let (mut agent, _) = default_agent();
        let wait = AiTuning::default().ragdoll.wait_secs;
        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5).on(JointId(1), BodyRegion::UpperBody));
        tick(&mut agent, &MockPhysics::default(), &[], 2.0);
        assert!((agent.ragdoll().reanimation_in().unwrap() - (wait - 2.0)).abs() < 1e-5);

        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5).on(JointId(1), BodyRegion::UpperBody));
        assert_eq!(agent.ragdoll().reanimation_in(), Some(wait));
        assert_eq!(agent.mind.characteristics.upper_body_damage, 10);
    }

    #[test]
    fn test_untargeted_hit_while_ragdolled_restarts_reanimation() {
        let (mut agent, _) = default_agent();
        let wait = AiTuning::default().ragdoll.wait_secs;
        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5).on(JointId(1), BodyRegion::UpperBody));
        tick(&mut agent, &MockPhysics::default(), &[], 2.0);
        let health = agent.mind.characteristics.health;

        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5));
        assert_eq!(agent.ragdoll().reanimation_in(), Some(wait));
        assert_eq!(agent.mind.characteristics.health, health);
        assert_eq!(agent.mind.characteristics.upper_body_damage, 5);
    }

    #[test]
    fn test_hit_during_blend_ragdolls_again() {
        let (mut agent, _) = default_agent();
        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5).on(JointId(1), BodyRegion::UpperBody));
        tick(&mut agent, &MockPhysics::default(), &[], 5.0);
        assert_eq!(agent.bone_control(), BoneControlMode::RagdollToAnimated);

        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::X * 0.1, 1).on(JointId(1), BodyRegion::UpperBody));
        assert_eq!(agent.bone_control(), BoneControlMode::Ragdoll);
        assert!(agent.ragdoll().snapshots().is_empty());
    }

    fn reanimate_with_root(rotation: Quat) -> (Agent, Handles) {
        let (mut agent, handles) = default_agent();
        handles.rig.lock().unwrap().poses[0].rotation = rotation;
        agent.take_damage(DamageEvent::new(Vec3::ZERO, Vec3::Z * 3.0, 5).on(JointId(1), BodyRegion::UpperBody));
        tick(&mut agent, &MockPhysics::default(), &[], 5.0);
        (agent, handles)
    }

    #[test]
    fn test_reanimate_from_back_when_alignment_axis_points_up() {
        // Rotating -90 degrees about X tips +Z up.
        let (mut agent, handles) = reanimate_with_root(Quat::from_rotation_x(-FRAC_PI_2));
        assert!(handles
            .anim
            .lock()
            .unwrap()
            .triggers
            .iter()
            .any(|t| t == params::REANIMATE_FROM_BACK));
        assert!(events(&mut agent).contains(&AiEvent::ReanimationStarted {
            agent: AGENT,
            from: ReanimateFrom::Back
        }));
        assert_eq!(agent.ragdoll().snapshots().len(), 2);
    }

    #[test]
    fn test_reanimate_from_front_when_alignment_axis_points_down() {
        let (mut agent, handles) = reanimate_with_root(Quat::from_rotation_x(FRAC_PI_2));
        assert!(handles
            .anim
            .lock()
            .unwrap()
            .triggers
            .iter()
            .any(|t| t == params::REANIMATE_FROM_FRONT));
        assert!(events(&mut agent).contains(&AiEvent::ReanimationStarted {
            agent: AGENT,
            from: ReanimateFrom::Front
        }));
    }

    // --- Scream ---

    #[test]
    fn test_scream_spawns_once_per_scream() {
        let (mut agent, handles) = default_agent();
        events(&mut agent);
        assert!(agent.scream());
        assert!(matches!(
            events(&mut agent).as_slice(),
            [AiEvent::Screamed { agent: AGENT, .. }]
        ));

        // Scream curve still high: already screaming, nothing new spawned.
        handles.anim.lock().unwrap().floats.insert(params::SCREAMING.into(), 0.8);
        assert!(agent.scream());
        assert!(events(&mut agent).is_empty());
    }

    #[test]
    fn test_scream_refused_without_animator_or_in_cinematic() {
        let mut bare = Agent::new(
            AgentMind::new(AGENT, Characteristics::default(), AiTuning::default(), 1),
            AgentBody::default(),
            StateMachine::with_states(&StateId::ALL),
        );
        assert!(!bare.scream());

        let (mut agent, _) = default_agent();
        agent.mind.cinematic = true;
        assert!(!agent.scream());
    }

    #[test]
    fn test_profiles_register_expected_states() {
        let stalker = get_profile(Archetype::Stalker);
        assert!(!stalker.states.contains(&StateId::Feeding));
        assert!(stalker.random_patrol);
        let crawler = get_profile(Archetype::Crawler);
        assert!(crawler.characteristics.is_crawling());
        for archetype in [Archetype::Shambler, Archetype::Glutton] {
            assert_eq!(get_profile(archetype).states.len(), StateId::COUNT);
        }
    }

    // --- Properties ---

    proptest! {
        #[test]
        fn prop_closest_sound_wins(distances in prop::collection::vec(0.5f32..40.0, 1..12)) {
            let mut mind = AgentMind::new(AGENT, Characteristics::default(), AiTuning::default(), 3);
            let mut body = AgentBody::default();
            let mut machine = StateMachine::with_states(&StateId::ALL);
            let mut cx = crate::fsm::StateContext { mind: &mut mind, body: &mut body, physics: None, dt: 0.016 };
            machine.start(&mut cx);
            machine.fixed_update(&mut cx);
            for (i, d) in distances.iter().enumerate() {
                let stimulus = sound_at(100 + i as u64, Vec3::new(0.0, 1.6, *d), 100.0);
                machine.trigger_event(&mut cx, TriggerPhase::Stay, &stimulus);
            }
            let closest = distances.iter().copied().fold(f32::INFINITY, f32::min);
            prop_assert!((cx.mind.audio_threat.distance - closest).abs() < 1e-4);
        }

        #[test]
        fn prop_nearest_player_sighting_wins(distances in prop::collection::vec(0.8f32..4.5, 1..10)) {
            let (mut agent, _) = default_agent();
            let mut physics = MockPhysics::default();
            for d in &distances {
                physics = physics.sphere(PLAYER, Vec3::new(0.0, 1.6, *d), 0.2);
            }
            agent.fixed_update(Some(&physics), 0.016);
            let mut nearest = f32::INFINITY;
            for d in &distances {
                agent.on_trigger_event(Some(&physics), TriggerPhase::Stay, &player_at(Vec3::new(0.0, 1.6, *d)));
                nearest = nearest.min(*d);
                prop_assert_eq!(agent.mind.visual_threat.kind, TargetKind::VisualPlayer);
                prop_assert!((agent.mind.visual_threat.distance - nearest).abs() < 1e-4);
            }
        }

        #[test]
        fn prop_health_never_rises_from_damage(
            hits in prop::collection::vec((-20i32..80, 0u8..3, 0.0f32..4.0, any::<bool>()), 1..16)
        ) {
            let (mut agent, _) = default_agent();
            let mut last = agent.mind.characteristics.health;
            for (amount, region, impulse, behind) in hits {
                let region = match region {
                    0 => BodyRegion::Head,
                    1 => BodyRegion::UpperBody,
                    _ => BodyRegion::LowerBody,
                };
                let mut hit = DamageEvent::new(Vec3::new(0.3, 1.5, 0.2), Vec3::Z * impulse, amount)
                    .on(JointId(1), region);
                if behind {
                    hit = hit.from_instigator(Vec3::new(0.0, 0.0, -2.0));
                }
                agent.take_damage(hit);
                let health = agent.mind.characteristics.health;
                prop_assert!(health <= last);
                prop_assert!(health >= 0);
                last = health;
            }
        }
    }
}
