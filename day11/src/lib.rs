pub mod monkey;
pub mod parse;
pub mod simulate;

pub use monkey::{Monkey, OpRhs, Operation, Test, Troop};
pub use parse::{parse_troop, ParseError};
pub use simulate::{
    inspection_counts, monkey_business, part1, part2, run, take_turn, Relief, SimulationError,
};
