#![forbid(unsafe_code)]

//! Property tests for the resolve cascade.

use glyphfall_core::{ElementId, FrameQueue, XorShift64};
use glyphfall_scramble::alphabet::is_separator;
use glyphfall_scramble::engine::resolve_frame;
use glyphfall_scramble::{Alphabet, RunState, ScrambleEngine, TickOutcome};
use proptest::prelude::*;

const EL: ElementId = ElementId::new(3);

fn run(engine: &mut ScrambleEngine, queue: &mut FrameQueue, limit: usize) -> usize {
    let mut ticks = 0;
    while ticks < limit && !queue.begin_frame().is_empty() {
        engine.tick(queue);
        ticks += 1;
    }
    ticks
}

proptest! {
    #[test]
    fn every_run_ends_on_the_source(
        source in "[A-Za-z0-9 ]{0,40}",
        speed in 0.01f64..2.0,
        seed in any::<u64>(),
    ) {
        let mut queue = FrameQueue::new();
        let rng = XorShift64::new(seed);
        let mut engine =
            ScrambleEngine::new(EL, source.clone(), speed, Alphabet::default(), rng).unwrap();
        engine.start(&mut queue);
        run(&mut engine, &mut queue, 100_000);

        prop_assert_eq!(engine.state(), RunState::Resolved);
        prop_assert_eq!(engine.value(), source.as_str());
        prop_assert!(queue.is_idle());
    }

    #[test]
    fn tick_count_matches_last_resolvable_position(
        source in "[A-Z][A-Z ]{0,30}",
        speed in 0.02f64..1.0,
        seed in any::<u64>(),
    ) {
        let mut queue = FrameQueue::new();
        let rng = XorShift64::new(seed);
        let mut engine =
            ScrambleEngine::new(EL, source.clone(), speed, Alphabet::default(), rng).unwrap();
        engine.start(&mut queue);
        let ticks = run(&mut engine, &mut queue, 100_000) as u64;

        let expected = source
            .chars()
            .enumerate()
            .filter(|(_, c)| !is_separator(*c))
            .map(|(i, _)| resolve_frame(i, speed))
            .max()
            .unwrap_or(1);
        prop_assert_eq!(ticks, expected);
        prop_assert_eq!(ticks, engine.frames_to_resolve());
    }

    #[test]
    fn unresolved_positions_show_alphabet_symbols(
        source in "[a-z]{1,20}",
        symbols in "[#*%@]{1,4}",
        seed in any::<u64>(),
    ) {
        let alphabet = Alphabet::new(&symbols).unwrap();
        let mut queue = FrameQueue::new();
        let mut engine =
            ScrambleEngine::new(EL, source.clone(), 0.04, alphabet, XorShift64::new(seed)).unwrap();
        engine.start(&mut queue);
        loop {
            for (i, resolved) in engine.resolved().iter().enumerate() {
                if !resolved {
                    prop_assert!(symbols.contains(engine.render()[i]));
                }
            }
            if queue.begin_frame().is_empty() || engine.tick(&mut queue) == TickOutcome::Resolved {
                break;
            }
        }
        prop_assert_eq!(engine.value(), source.as_str());
    }

    #[test]
    fn resolved_set_is_always_a_prefix_plus_separators(
        source in "[A-Z ]{1,30}",
        speed in 0.02f64..0.5,
    ) {
        let mut queue = FrameQueue::new();
        let mut engine =
            ScrambleEngine::new(EL, source.clone(), speed, Alphabet::default(), XorShift64::new(1))
                .unwrap();
        engine.start(&mut queue);
        let chars: Vec<char> = source.chars().collect();
        while !queue.begin_frame().is_empty() {
            engine.tick(&mut queue);
            let resolved = engine.resolved();
            let mut seen_unresolved = false;
            for (i, c) in chars.iter().enumerate() {
                if is_separator(*c) {
                    prop_assert!(resolved[i]);
                    continue;
                }
                if !resolved[i] {
                    seen_unresolved = true;
                } else {
                    prop_assert!(!seen_unresolved, "position {} resolved after a gap", i);
                }
            }
        }
    }
}
