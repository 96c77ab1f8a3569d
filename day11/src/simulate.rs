use std::fmt;

use itertools::Itertools;
use log::{debug, trace};

use crate::monkey::{Monkey, Troop};

pub const PART1_ROUNDS: usize = 20;
pub const PART1_RELIEF: i64 = 3;
pub const PART2_ROUNDS: usize = 10_000;

/// How worry levels are kept in check after each inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relief {
    Divide(i64),
    Modulo(i64),
}

impl Relief {
    pub fn apply(self, worry_lvl: i64) -> Option<i64> {
        match self {
            Relief::Divide(d) => worry_lvl.checked_div(d),
            Relief::Modulo(m) => worry_lvl.checked_rem(m),
        }
    }
}

impl fmt::Display for Relief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relief::Divide(d) => write!(f, "division by {d}"),
            Relief::Modulo(m) => write!(f, "modulo {m}"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("monkey {monkey}: operation on worry level {worry_lvl} overflowed")]
    Operation { monkey: usize, worry_lvl: i64 },

    #[error("monkey {monkey}: cannot apply {relief} to worry level {worry_lvl}")]
    Relief {
        monkey: usize,
        worry_lvl: i64,
        relief: Relief,
    },

    #[error("monkey {monkey} tests divisibility by zero")]
    ZeroTest { monkey: usize },

    #[error("monkey {from} tried to throw to nonexisting monkey {to}")]
    NoSuchMonkey { from: usize, to: usize },

    #[error("monkey business needs at least two monkeys, got {0}")]
    TooFewMonkeys(usize),

    #[error("product of the test divisors overflows")]
    DivisorOverflow,
}

/// Monkey `i` inspects and throws everything it holds, in order.
///
/// Items thrown to a later monkey are handled on that monkey's turn; items
/// thrown to an earlier one wait for the next round.
pub fn take_turn(monkeys: &mut [Monkey], i: usize, relief: Relief) -> Result<(), SimulationError> {
    let (operation, test) = (monkeys[i].operation, monkeys[i].test);

    while let Some(worry_lvl) = monkeys[i].items.pop_front() {
        monkeys[i].inspections += 1;

        let new_worry_lvl = operation
            .apply(worry_lvl)
            .ok_or(SimulationError::Operation { monkey: i, worry_lvl })?;
        let new_worry_lvl = relief.apply(new_worry_lvl).ok_or(SimulationError::Relief {
            monkey: i,
            worry_lvl: new_worry_lvl,
            relief,
        })?;

        let throw_to = test
            .throw_to(new_worry_lvl)
            .ok_or(SimulationError::ZeroTest { monkey: i })?;

        monkeys
            .get_mut(throw_to)
            .ok_or(SimulationError::NoSuchMonkey {
                from: i,
                to: throw_to,
            })?
            .items
            .push_back(new_worry_lvl);
    }

    Ok(())
}

pub fn run(monkeys: &mut [Monkey], rounds: usize, relief: Relief) -> Result<(), SimulationError> {
    for round in 0..rounds {
        for i in 0..monkeys.len() {
            take_turn(monkeys, i, relief)?;
        }
        trace!("round {round} done: {:?}", inspection_counts(monkeys));
    }

    debug!(
        "{rounds} rounds with {relief}: inspections {}",
        inspection_counts(monkeys).iter().join(", ")
    );

    Ok(())
}

pub fn inspection_counts(monkeys: &[Monkey]) -> Vec<u64> {
    monkeys.iter().map(|m| m.inspections).collect()
}

/// Product of the two highest inspection counts.
pub fn monkey_business(monkeys: &[Monkey]) -> Result<u64, SimulationError> {
    if monkeys.len() < 2 {
        return Err(SimulationError::TooFewMonkeys(monkeys.len()));
    }

    Ok(inspection_counts(monkeys)
        .into_iter()
        .sorted_unstable_by(|a, b| b.cmp(a))
        .take(2)
        .product())
}

impl Troop {
    /// Runs a fresh copy of the parsed monkeys; the troop itself is left as parsed.
    pub fn simulate(&self, rounds: usize, relief: Relief) -> Result<Vec<Monkey>, SimulationError> {
        let mut monkeys = self.monkeys.clone();
        run(&mut monkeys, rounds, relief)?;
        Ok(monkeys)
    }
}

pub fn part1(troop: &Troop) -> Result<u64, SimulationError> {
    monkey_business(&troop.simulate(PART1_ROUNDS, Relief::Divide(PART1_RELIEF))?)
}

pub fn part2(troop: &Troop) -> Result<u64, SimulationError> {
    let divisor_product = troop
        .divisor_product
        .ok_or(SimulationError::DivisorOverflow)?;
    monkey_business(&troop.simulate(PART2_ROUNDS, Relief::Modulo(divisor_product))?)
}
