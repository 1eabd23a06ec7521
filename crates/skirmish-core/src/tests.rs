#[cfg(test)]
mod tests {
    use crate::commands::{InputFrame, PlayerCommand};
    use crate::config::*;
    use crate::enums::*;
    use crate::events::SimEvent;
    use crate::presentation::{projectile_sprite, sprite_frame};
    use crate::state::FrameSnapshot;
    use crate::types::{secs_to_ticks, Position, SimTime};

    fn melee_enemy() -> ArchetypeParams {
        ArchetypeParams {
            faction: Faction::Enemy,
            speed: 90.0,
            attack_range: 200.0,
            stop_distance: 180.0,
            detection_range: 400.0,
            retreat_distance: None,
            max_health: 50.0,
            armor: 0.0,
            attacks: vec![AttackSpec {
                name: "slash".into(),
                frames: 6,
                hit_window: [2, 3],
                damage: 10.0,
                range: 60.0,
                cooldown_ticks: 30,
                area: AreaPolicy::FirstTarget,
                trigger: AttackTrigger::Combo,
                delivery: Delivery::Melee,
            }],
            hurt_frames: 2,
            death_frames: 4,
            idle_frames: 4,
            move_frames: 6,
            ticks_per_frame: 1,
            dead_duration_ticks: 30,
            patrol_radius: 50.0,
            charge_ticks: 0,
            combo_window_ticks: 0,
        }
    }

    fn hero() -> ArchetypeParams {
        ArchetypeParams {
            faction: Faction::Hero,
            ..melee_enemy()
        }
    }

    fn table() -> ArchetypeTable {
        let mut table = ArchetypeTable::default();
        table.insert("grunt", melee_enemy());
        table.insert("warden", hero());
        table
    }

    fn wave(species: &str, count: u32) -> WaveSpec {
        WaveSpec {
            enemies: vec![SpeciesCount {
                species: species.into(),
                count,
            }],
            base_x: 600.0,
            base_y: 380.0,
            spacing: 60.0,
            jitter_x: 0.0,
            jitter_y: 0.0,
            layout: LayoutPattern::Line,
            cluster_size: 3,
            wave_amplitude: 40.0,
            trigger: SpawnTrigger::Immediate,
        }
    }

    fn level(waves: Vec<WaveSpec>) -> LevelPlan {
        LevelPlan {
            name: "test".into(),
            hero: "warden".into(),
            hero_start: Position::new(100.0, 380.0),
            bounds: ArenaBounds::default(),
            waves,
        }
    }

    #[test]
    fn test_facing_sign_and_faces() {
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Right.sign(), 1.0);
        assert!(Facing::Right.faces(10.0));
        assert!(!Facing::Right.faces(-10.0));
        assert!(Facing::Left.faces(-0.5));
        assert!(Facing::Left.faces(0.0), "Zero offset counts as in front");
        assert_eq!(Facing::toward(0.0, Facing::Left), Facing::Left);
        assert_eq!(Facing::toward(-3.0, Facing::Right), Facing::Left);
    }

    #[test]
    fn test_animation_lock_states() {
        assert!(!ActorState::Idle.is_animation_locked());
        assert!(!ActorState::Move.is_animation_locked());
        assert!(ActorState::Attack(0).is_animation_locked());
        assert!(ActorState::Hurt.is_animation_locked());
        assert!(ActorState::Dead.is_animation_locked());
    }

    #[test]
    fn test_resolution_order_is_declaration_order() {
        let mut sorted = AttackCategory::RESOLUTION_ORDER;
        sorted.sort();
        assert_eq!(sorted, AttackCategory::RESOLUTION_ORDER);
        assert_eq!(AttackCategory::RESOLUTION_ORDER[0], AttackCategory::HeroMelee);
        assert_eq!(
            AttackCategory::RESOLUTION_ORDER[4],
            AttackCategory::EnemyProjectile
        );
    }

    #[test]
    fn test_threshold_example_is_valid() {
        // attack 200 / stop 180 / detection 400 is an accepted configuration.
        assert!(melee_enemy().validate("grunt").is_ok());
    }

    #[test]
    fn test_attack_range_beyond_detection_rejected() {
        let mut params = melee_enemy();
        params.attack_range = 500.0;
        let err = params.validate("grunt").unwrap_err();
        assert!(matches!(err, ConfigError::UnreachableState { .. }));
    }

    #[test]
    fn test_retreat_must_be_inside_stop_distance() {
        let mut params = melee_enemy();
        params.retreat_distance = Some(190.0);
        assert!(matches!(
            params.validate("archer").unwrap_err(),
            ConfigError::UnreachableState { .. }
        ));
        params.retreat_distance = Some(120.0);
        assert!(params.validate("archer").is_ok());
        assert!(params.capabilities().kiting);
    }

    #[test]
    fn test_hit_window_outside_frames_rejected() {
        let mut params = melee_enemy();
        params.attacks[0].hit_window = [4, 6];
        assert!(matches!(
            params.validate("grunt").unwrap_err(),
            ConfigError::InvalidAttack { .. }
        ));
    }

    #[test]
    fn test_empty_wave_rejected() {
        let plan = level(vec![wave("grunt", 2), wave("grunt", 0)]);
        let err = plan.validate(&table()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyWave { wave: 1 }));
    }

    #[test]
    fn test_unknown_species_rejected() {
        let plan = level(vec![wave("dragon", 1)]);
        assert!(matches!(
            plan.validate(&table()).unwrap_err(),
            ConfigError::UnknownSpecies { .. }
        ));
    }

    #[test]
    fn test_hero_as_enemy_rejected() {
        let plan = level(vec![wave("warden", 1)]);
        assert!(matches!(
            plan.validate(&table()).unwrap_err(),
            ConfigError::WrongFaction { .. }
        ));
    }

    #[test]
    fn test_oversized_wave_rejected() {
        let mut w = wave("grunt", u32::MAX);
        w.enemies.push(SpeciesCount {
            species: "grunt".into(),
            count: 2,
        });
        assert_eq!(w.total_count(), u64::from(u32::MAX) + 2);
        let err = level(vec![w]).validate(&table()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "got {err:?}");

        let limit = crate::constants::MAX_WAVE_ENEMIES as u32;
        assert!(level(vec![wave("grunt", limit)]).validate(&table()).is_ok());
        assert!(matches!(
            level(vec![wave("grunt", limit + 1)]).validate(&table()).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut w = wave("grunt", 1);
        w.trigger = SpawnTrigger::AfterPreviousCleared { delay_secs: -1.0 };
        let plan = level(vec![wave("grunt", 1), w]);
        assert!(plan.validate(&table()).is_err());
    }

    #[test]
    fn test_level_plan_from_json() {
        let json = r#"{
            "name": "json-level",
            "hero": "warden",
            "hero_start": { "x": 100.0, "y": 380.0 },
            "waves": [
                { "enemies": [{ "species": "grunt", "count": 2 }],
                  "base_x": 600.0, "base_y": 380.0, "spacing": 50.0 },
                { "enemies": [{ "species": "grunt", "count": 4 }],
                  "base_x": 900.0, "base_y": 380.0, "spacing": 100.0,
                  "layout": "ARENA",
                  "trigger": { "type": "AfterPreviousCleared", "delay_secs": 1.0 } }
            ]
        }"#;
        let plan = LevelPlan::from_json(json, &table()).unwrap();
        assert_eq!(plan.waves.len(), 2);
        assert_eq!(plan.waves[0].layout, LayoutPattern::Line);
        assert_eq!(plan.waves[0].trigger, SpawnTrigger::Immediate);
        assert_eq!(plan.waves[1].layout, LayoutPattern::Arena);
        assert_eq!(
            plan.waves[1].trigger,
            SpawnTrigger::AfterPreviousCleared { delay_secs: 1.0 }
        );
        assert_eq!(plan.total_enemies(), 6);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = LevelPlan::from_json("{ not json", &table()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_archetype_table_json_defaults() {
        let json = r#"{
            "bat": {
                "faction": "Enemy", "speed": 120.0,
                "attack_range": 40.0, "stop_distance": 30.0, "detection_range": 300.0,
                "max_health": 10.0, "hurt_frames": 2, "death_frames": 3,
                "attacks": [{ "name": "bite", "frames": 4, "hit_window": [1, 2],
                              "damage": 3.0, "range": 40.0, "cooldown_ticks": 20 }]
            }
        }"#;
        let table = ArchetypeTable::from_json(json).unwrap();
        let bat = table.get("bat").unwrap();
        assert!(matches!(bat.attacks[0].delivery, Delivery::Melee));
        assert_eq!(bat.dead_duration_ticks, crate::constants::DEFAULT_DEAD_DURATION_TICKS);
        assert_eq!(bat.attacks[0].category(Faction::Enemy), AttackCategory::EnemyMelee);
    }

    #[test]
    fn test_expanded_species_order() {
        let w = WaveSpec {
            enemies: vec![
                SpeciesCount {
                    species: "a".into(),
                    count: 2,
                },
                SpeciesCount {
                    species: "b".into(),
                    count: 1,
                },
            ],
            ..wave("a", 0)
        };
        assert_eq!(w.expanded_species(), vec!["a", "a", "b"]);
        assert_eq!(w.total_count(), 3);
    }

    #[test]
    fn test_input_merge_keeps_edges() {
        let mut frame = InputFrame {
            move_axis: Some(1.0),
            attack_pressed: true,
            ..Default::default()
        };
        frame.merge(InputFrame {
            move_axis: Some(-3.0),
            jump: true,
            ..Default::default()
        });
        assert!(frame.attack_pressed, "Earlier press must survive a later frame");
        assert!(frame.jump);
        assert_eq!(frame.axis(), -1.0, "Axis is clamped to [-1, 1]");
        let held = frame.held();
        assert!(!held.attack_pressed && !held.jump);
        assert_eq!(held.axis(), -1.0);
    }

    #[test]
    fn test_intent_without_axis_keeps_held_axis() {
        let mut frame = InputFrame {
            move_axis: Some(1.0),
            ..Default::default()
        }
        .held();
        frame.merge(InputFrame {
            jump: true,
            ..Default::default()
        });
        assert_eq!(frame.axis(), 1.0, "A jump must not cancel held movement");
        frame.merge(InputFrame {
            move_axis: Some(0.0),
            ..Default::default()
        });
        assert_eq!(frame.axis(), 0.0, "An explicit zero stops");
        assert_eq!(InputFrame::default().axis(), 0.0);

        let parsed: InputFrame = serde_json::from_str(r#"{ "attack_pressed": true }"#).unwrap();
        assert_eq!(parsed.move_axis, None);
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(1.0), 60);
        assert_eq!(secs_to_ticks(0.5), 30);
        assert_eq!(secs_to_ticks(0.1), 6);
        assert_eq!(secs_to_ticks(-2.0), 0);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        // 60 ticks at 60Hz = 1 second
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sprite_mapping() {
        let s = sprite_frame("grunt", ActorState::Attack(1), 3);
        assert_eq!(s.sheet, "grunt/attack2");
        assert_eq!(s.frame, 3);
        assert_eq!(sprite_frame("grunt", ActorState::Dead, 0).sheet, "grunt/dead");
        let p = projectile_sprite(ProjectileKind::Explosive, ProjectilePhase::Exploding, 2);
        assert_eq!(p.sheet, "orb/explode");
    }

    #[test]
    fn test_command_and_event_serde() {
        let cmd = PlayerCommand::StartLevel {
            level: LevelId::Siege,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("StartLevel"));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(json, serde_json::to_string(&back).unwrap());

        let event = SimEvent::WaveSpawned { wave: 2, count: 5 };
        let json = serde_json::to_string(&event).unwrap();
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = FrameSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert_eq!(back.phase, GamePhase::Idle);
    }
}
