#![no_main]

//! Session command fuzzer.
//!
//! Drives a started match with arbitrary command sequences and checks the
//! state invariants after every command:
//! 1. Dead units are off the board
//! 2. Options are only held while their action is active
//! 3. An ended match leaves no status and no selection behind

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::Phase;
use skirmish::{
    FixedDice, Hero, HeroName, MatchSession, PlayerId, Position, RulesConfig, SlotId, Stat,
    UnitKey,
};

/// A fuzzer-generated session command.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Select { unit: u8 },
    Deselect,
    ShowMoves { unit: u8 },
    ShowAttacks { unit: u8 },
    Click { x: i8, y: i8 },
    StatDelta { unit: u8, stat: u8, delta: i16 },
    HqDelta { player: bool, delta: i16 },
    Place { unit: u8, x: i8, y: i8, remove: bool },
    Advance { ms: u16 },
    Reset,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    heroes: [[u8; 3]; 2],
    dice: u16,
    commands: Vec<FuzzCommand>,
}

fn unit_key(index: u8) -> UnitKey {
    let player = if index % 2 == 0 { PlayerId::One } else { PlayerId::Two };
    let slot = SlotId::ALL[usize::from(index / 2) % SlotId::ALL.len()];
    UnitKey::new(player, slot)
}

fn hero(index: u8) -> Hero {
    Hero::template(HeroName::ALL[usize::from(index) % HeroName::ALL.len()])
}

fuzz_target!(|input: SessionInput| {
    let Ok(mut session) =
        MatchSession::with_dice(RulesConfig::default(), FixedDice(u32::from(input.dice)))
    else {
        return;
    };
    for (player, picks) in PlayerId::ALL.into_iter().zip(input.heroes) {
        for pick in picks {
            session.add_hero(player, hero(pick));
        }
    }
    if session.start_match().is_err() {
        return;
    }

    for command in input.commands.into_iter().take(256) {
        let _ = match command {
            FuzzCommand::Select { unit } => session.select_hero(unit_key(unit)).map(|_| ()),
            FuzzCommand::Deselect => {
                session.deselect_hero();
                Ok(())
            }
            FuzzCommand::ShowMoves { unit } => session.show_move_options(unit_key(unit)).map(|_| ()),
            FuzzCommand::ShowAttacks { unit } => {
                session.show_attack_options(unit_key(unit)).map(|_| ())
            }
            FuzzCommand::Click { x, y } => session
                .click_square(Position::new(i32::from(x), i32::from(y)))
                .map(|_| ()),
            FuzzCommand::StatDelta { unit, stat, delta } => {
                let stat = Stat::ALL[usize::from(stat) % Stat::ALL.len()];
                session.apply_stat_delta(unit_key(unit), stat, i32::from(delta))
            }
            FuzzCommand::HqDelta { player, delta } => {
                let player = if player { PlayerId::One } else { PlayerId::Two };
                session.apply_hq_delta(player, i32::from(delta))
            }
            FuzzCommand::Place { unit, x, y, remove } => {
                let position = (!remove).then(|| Position::new(i32::from(x), i32::from(y)));
                session.set_position(unit_key(unit), position).map(|_| ())
            }
            FuzzCommand::Advance { ms } => {
                session.advance_clock(u64::from(ms));
                Ok(())
            }
            FuzzCommand::Reset => {
                session.reset_match();
                Ok(())
            }
        };

        match session.status() {
            Some(status) => {
                for unit in status.units() {
                    if !unit.is_alive() {
                        assert!(unit.position.is_none(), "dead unit still placed");
                    }
                }
                let selection = session.selection();
                if selection.move_options.is_some() {
                    assert_eq!(session.phase(), Phase::MoveActive);
                }
                if selection.attack_options.is_some() {
                    assert_eq!(session.phase(), Phase::AttackActive);
                }
            }
            None => {
                assert!(!session.in_game());
                assert_eq!(session.phase(), Phase::Idle);
            }
        }
    }
});
