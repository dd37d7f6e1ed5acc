//! Property-based checks for the universal invariants: the ones that must
//! hold after any tick, independent of how play got there. Each test drives
//! the relevant model method directly across a swept range of inputs rather
//! than a handful of hand-picked examples.

use depths_of_the_abyss_core::model::player::COMBO_WINDOW;
use depths_of_the_abyss_core::model::{AoeField, Player, Projectile, StatusEffect, Weapon};
use depths_of_the_abyss_core::enums::{Element, OwnerTag, StatusKind};
use depths_of_the_abyss_core::status::tick_statuses;
use proptest::prelude::*;

fn aoe(lifetime: f64, periodic: bool, tick_interval: f64) -> AoeField {
    AoeField {
        center_x: 0.0,
        center_y: 0.0,
        radius: 32.0,
        damage: 10.0,
        element: Element::Physical,
        owner: OwnerTag::Player,
        delay: 0.0,
        tick_interval,
        lifetime,
        tick_timer: 0.0,
        periodic,
        detonated: false,
    }
}

fn status(duration: f64) -> StatusEffect {
    StatusEffect {
        kind: StatusKind::Burn,
        remaining_duration: duration,
        tick_amount: 2.0,
        tick_interval: 1.0,
        tick_accumulator: 0.0,
        source: None,
        source_is_player: true,
    }
}

proptest! {
    // For every AoE: lifetime >= 0 always, and it's removed exactly when
    // lifetime reaches 0.
    #[test]
    fn aoe_lifetime_never_goes_negative_and_expires_at_zero(
        initial_lifetime in 0.1f64..10.0,
        dt in 0.001f64..1.0,
        ticks in 1u32..200,
    ) {
        let mut field = aoe(initial_lifetime, false, 1.0);
        for _ in 0..ticks {
            field.tick(dt);
            prop_assert!(field.lifetime >= 0.0);
        }
        if field.lifetime == 0.0 {
            prop_assert!(field.expired());
        }
    }

    // Periodic AoEs never detonate (single-shot flag stays false) and still
    // never go lifetime-negative.
    #[test]
    fn periodic_aoe_lifetime_stays_non_negative(
        initial_lifetime in 0.1f64..10.0,
        tick_interval in 0.05f64..1.0,
        dt in 0.001f64..0.5,
        ticks in 1u32..200,
    ) {
        let mut field = aoe(initial_lifetime, true, tick_interval);
        for _ in 0..ticks {
            field.tick(dt);
            prop_assert!(field.lifetime >= 0.0);
        }
    }

    // For every projectile: integrating never produces a non-finite
    // position, and a velocity already within max_speed is left untouched
    // by integration (only steering changes heading).
    #[test]
    fn projectile_position_stays_finite_under_integration(
        vx in -500.0f64..500.0,
        vy in -500.0f64..500.0,
        dt in 0.0001f64..0.1,
        steps in 1u32..500,
    ) {
        let max_speed = 500.0;
        prop_assume!((vx * vx + vy * vy).sqrt() <= max_speed);
        let mut projectile = Projectile {
            x: 0.0,
            y: 0.0,
            vx,
            vy,
            speed: (vx * vx + vy * vy).sqrt(),
            max_speed,
            damage: 10.0,
            element: Element::Physical,
            owner: OwnerTag::Enemy,
            lifetime: 5.0,
            piercing: false,
            explode_radius: None,
            homing_target: None,
            pierced: std::collections::HashSet::new(),
            combo_index: 0,
            source_id: None,
        };
        for _ in 0..steps {
            projectile.integrate(dt);
            prop_assert!(projectile.x.is_finite());
            prop_assert!(projectile.y.is_finite());
            let speed = (projectile.vx * projectile.vx + projectile.vy * projectile.vy).sqrt();
            prop_assert!(speed <= projectile.max_speed + 1e-9);
        }
    }

    // For every status effect: duration stays > 0 while attached, and it is
    // removed exactly when it reaches 0 — never lingers, never goes negative.
    #[test]
    fn status_duration_never_negative_and_removed_at_zero(
        initial_duration in 0.1f64..20.0,
        dt in 0.01f64..2.0,
        ticks in 1u32..100,
    ) {
        let mut statuses = vec![status(initial_duration)];
        for _ in 0..ticks {
            tick_statuses(&mut statuses, dt);
            if let Some(s) = statuses.first() {
                prop_assert!(s.remaining_duration > 0.0, "an attached status must have positive remaining duration");
            }
        }
    }

    // combo_counter > 0 => combo_timer > 0, across any sequence of hits and
    // elapsed time.
    #[test]
    fn combo_counter_implies_positive_combo_timer(
        hit_pattern in prop::collection::vec(any::<bool>(), 1..50),
        dt in 0.01f64..0.5,
    ) {
        let mut player = Player::new(Weapon::starter_sword());
        for register_hit in hit_pattern {
            if register_hit {
                player.register_hit();
            }
            player.decay_combo(dt);
            if player.combo_counter > 0 {
                prop_assert!(player.combo_timer > 0.0);
            }
        }
    }

    // The combo window constant itself must be positive, or the invariant
    // above would be vacuous.
    #[test]
    fn combo_window_constant_is_positive(_unused in 0u8..1) {
        prop_assert!(COMBO_WINDOW > 0.0);
    }
}
