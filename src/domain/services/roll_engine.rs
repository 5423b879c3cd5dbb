//! Roll engine - pure dice rules for every die variant
//!
//! The engine never touches a random source directly. Every function takes a
//! `throw` callback that returns a uniform value in `1..=sides` for one
//! physical die throw, so production code can pass a real RNG and tests can
//! replay a fixed sequence of draws.

use crate::domain::value_objects::{
    AdditiveOutcome, DieVariant, ExplodingOutcome, OnesDigit, PercentileOutcome,
    PercentileRequest, PoolRequest, RollOutcome, RollRequest,
};

/// Face that triggers another throw on an exploding die
const EXPLODING_FACE: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    #[error("A target number is required for a skill roll")]
    MissingTarget,
    #[error("Modifier is too large")]
    ModifierOutOfRange,
}

/// Raw d10 values drawn for one percentile roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileDraws {
    pub tens: u8,
    pub ones: u8,
    pub assist: u8,
}

/// Roll any request, dispatching on its variant
pub fn roll(
    request: &RollRequest,
    throw: impl FnMut(u8) -> u8,
) -> Result<RollOutcome, RollError> {
    match request {
        RollRequest::Percentile(params) => {
            roll_percentile(params, throw).map(RollOutcome::Percentile)
        }
        RollRequest::Additive(params) => {
            roll_additive(params, throw).map(RollOutcome::Additive)
        }
        RollRequest::Exploding(params) => {
            roll_exploding(params, throw).map(RollOutcome::Exploding)
        }
    }
}

/// Percentile skill roll.
///
/// Always draws three d10 (tens, ones, assist) even when the roll is not
/// assisted, so a recorded draw sequence replays identically either way.
pub fn roll_percentile(
    request: &PercentileRequest,
    mut throw: impl FnMut(u8) -> u8,
) -> Result<PercentileOutcome, RollError> {
    let target = match request.target {
        Some(target) if target > 0 => target,
        _ => return Err(RollError::MissingTarget),
    };

    let sides = DieVariant::Percentile.sides();
    let draws = PercentileDraws {
        tens: throw(sides),
        ones: throw(sides),
        assist: throw(sides),
    };

    Ok(resolve_percentile(draws, target, request))
}

/// Apply the percentile rules to a set of raw draws
pub fn resolve_percentile(
    draws: PercentileDraws,
    target: u8,
    request: &PercentileRequest,
) -> PercentileOutcome {
    let mut tens = ten_as_zero(draws.tens);
    let assist = ten_as_zero(draws.assist);

    let ones = if tens == 1 && draws.ones == 10 {
        OnesDigit::DoubleZero
    } else if draws.ones == 10 {
        OnesDigit::Digit(1)
    } else {
        OnesDigit::Digit(draws.ones)
    };

    if request.assisted {
        tens = tens.min(assist);
    }

    let final_pair = flip_pair(tens, ones.numeric(), request);
    let parsed_value = parse_pair(final_pair);

    PercentileOutcome {
        tens_digit: tens,
        ones_digit: ones,
        assist_digit: assist,
        final_pair,
        parsed_value,
        target,
        flip_to_fail: request.flip_to_fail,
        flip_to_succeed: request.flip_to_succeed,
        assisted: request.assisted,
        is_success: parsed_value <= target,
        is_critical: final_pair[0] == final_pair[1],
        is_sublime: parsed_value == 1 || parsed_value == 100,
    }
}

/// Reorder the digit pair for flip rules. Both flips cancel out.
fn flip_pair(tens: u8, ones: u8, request: &PercentileRequest) -> [u8; 2] {
    match (request.flip_to_fail, request.flip_to_succeed) {
        (true, false) => [tens.max(ones), tens.min(ones)],
        (false, true) => [tens.min(ones), tens.max(ones)],
        _ => [tens, ones],
    }
}

/// Read a digit pair as a value in 1..=100; `[0, 0]` is 100.
pub fn parse_pair(pair: [u8; 2]) -> u8 {
    match pair {
        [0, 0] => 100,
        [tens, ones] => tens * 10 + ones,
    }
}

fn ten_as_zero(raw: u8) -> u8 {
    if raw == 10 {
        0
    } else {
        raw
    }
}

/// Sum of `num_dice` d10 plus the modifier.
///
/// `num_dice` must already be validated to 1..=20.
pub fn roll_additive(
    request: &PoolRequest,
    mut throw: impl FnMut(u8) -> u8,
) -> Result<AdditiveOutcome, RollError> {
    let sides = DieVariant::Additive.sides();
    let rolls: Vec<u8> = (0..request.num_dice).map(|_| throw(sides)).collect();

    Ok(AdditiveOutcome {
        total: total(&rolls, request)?,
        rolls,
        modifier: request.modifier.clone(),
    })
}

/// `num_dice` d6 where every six chains into another throw.
///
/// Chains are appended per source die, in the order of the initial throws.
pub fn roll_exploding(
    request: &PoolRequest,
    mut throw: impl FnMut(u8) -> u8,
) -> Result<ExplodingOutcome, RollError> {
    let sides = DieVariant::Exploding.sides();
    let initial_rolls: Vec<u8> = (0..request.num_dice).map(|_| throw(sides)).collect();

    let mut rolls = initial_rolls.clone();
    for _ in initial_rolls.iter().filter(|&&face| face == EXPLODING_FACE) {
        loop {
            let face = throw(sides);
            rolls.push(face);
            if face != EXPLODING_FACE {
                break;
            }
        }
    }

    Ok(ExplodingOutcome {
        total: total(&rolls, request)?,
        initial_rolls,
        rolls,
        modifier: request.modifier.clone(),
    })
}

fn sum(rolls: &[u8]) -> i32 {
    rolls.iter().map(|&face| i32::from(face)).sum()
}

/// Dice sum plus modifier, refusing to wrap
fn total(rolls: &[u8], request: &PoolRequest) -> Result<i32, RollError> {
    sum(rolls)
        .checked_add(request.modifier_value())
        .ok_or(RollError::ModifierOutOfRange)
}
