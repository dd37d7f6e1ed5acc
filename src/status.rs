//! Status/timer system: ticking, stacking, mutual exclusion.

use crate::model::status::StatusEffect;

/// Add or refresh `incoming` onto `effects`, honoring stacking rules:
/// the same `kind` refreshes (not stacks) duration to the max of existing and
/// incoming; mutually exclusive kinds cancel the previous one.
pub fn apply_status(effects: &mut Vec<StatusEffect>, incoming: StatusEffect) {
    effects.retain(|e| !e.kind.excludes(incoming.kind));

    if let Some(existing) = effects.iter_mut().find(|e| e.kind == incoming.kind) {
        existing.remaining_duration = existing.remaining_duration.max(incoming.remaining_duration);
        existing.tick_amount = incoming.tick_amount;
        existing.tick_interval = incoming.tick_interval;
    } else {
        effects.push(incoming);
    }
}

/// Ticks every effect, returning `(kind, amount, is_heal, source_is_player)` for
/// each tick boundary crossed this frame, and removes expired effects.
pub fn tick_statuses(effects: &mut Vec<StatusEffect>, dt: f64) -> Vec<(crate::enums::StatusKind, f64, bool, bool)> {
    let mut pulses = Vec::new();
    for effect in effects.iter_mut() {
        if let Some(amount) = effect.tick(dt) {
            pulses.push((effect.kind, amount, effect.is_heal(), effect.source_is_player));
        }
    }
    effects.retain(|e| !e.expired());
    pulses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::StatusKind;

    fn burn(duration: f64) -> StatusEffect {
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

    #[test]
    fn same_kind_refreshes_to_max_duration() {
        let mut effects = vec![burn(2.0)];
        apply_status(&mut effects, burn(5.0));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].remaining_duration, 5.0);

        apply_status(&mut effects, burn(1.0));
        assert_eq!(effects[0].remaining_duration, 5.0);
    }

    #[test]
    fn mutually_exclusive_kinds_cancel_previous() {
        let mut effects = vec![StatusEffect {
            kind: StatusKind::Freeze,
            remaining_duration: 3.0,
            tick_amount: 0.0,
            tick_interval: 1.0,
            tick_accumulator: 0.0,
            source: None,
            source_is_player: true,
        }];
        apply_status(
            &mut effects,
            StatusEffect {
                kind: StatusKind::Haste,
                remaining_duration: 3.0,
                tick_amount: 0.0,
                tick_interval: 1.0,
                tick_accumulator: 0.0,
                source: None,
                source_is_player: true,
            },
        );
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, StatusKind::Haste);
    }

    #[test]
    fn removed_when_duration_reaches_zero() {
        let mut effects = vec![burn(0.5)];
        tick_statuses(&mut effects, 1.0);
        assert!(effects.is_empty());
    }
}
