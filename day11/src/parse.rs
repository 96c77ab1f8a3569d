use std::{collections::VecDeque, str::FromStr};

use log::debug;
use nom::{
    bytes::complete::take,
    character::complete::anychar,
    combinator::rest,
    sequence::{preceded, tuple},
    Finish, IResult,
};

use crate::monkey::{Monkey, OpRhs, Operation, Test, Troop};

/// Column of the operator in a trimmed `Operation: new = old * 19` line.
const OPERATOR_COLUMN: usize = 21;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: `{prefix}` before any `Monkey` header")]
    OrphanLine { line: usize, prefix: &'static str },

    #[error("line {line}: operation is too short to hold an operator and operand")]
    TruncatedOperation { line: usize },

    #[error("line {line}: unknown operator `{op}`")]
    UnknownOperator { line: usize, op: char },

    #[error("monkey {monkey} has no `{missing}` line")]
    Incomplete { monkey: usize, missing: &'static str },
}

impl ParseError {
    /// Input line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::OrphanLine { line, .. }
            | ParseError::TruncatedOperation { line }
            | ParseError::UnknownOperator { line, .. } => Some(*line),
            ParseError::Incomplete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LineKind {
    StartingItems,
    Operation,
    Test,
}

impl LineKind {
    const ALL: [LineKind; 3] = [LineKind::StartingItems, LineKind::Operation, LineKind::Test];

    fn prefix(self) -> &'static str {
        match self {
            LineKind::StartingItems => "Starting items",
            LineKind::Operation => "Operation",
            LineKind::Test => "Test",
        }
    }

    fn of(l: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| l.starts_with(kind.prefix()))
    }
}

#[derive(Debug, Default)]
struct MonkeyDraft {
    items: VecDeque<i64>,
    operation: Option<Operation>,
    test: Option<Test>,
}

impl MonkeyDraft {
    fn finish(self, monkey: usize) -> Result<Monkey, ParseError> {
        let operation = self.operation.ok_or(ParseError::Incomplete {
            monkey,
            missing: "Operation",
        })?;
        let test = self.test.ok_or(ParseError::Incomplete {
            monkey,
            missing: "Test",
        })?;

        Ok(Monkey::new(self.items, operation, test))
    }
}

fn parse_starting_items(l: &str) -> impl Iterator<Item = i64> + '_ {
    let list = l.split_once(':').map_or("", |(_, list)| list).trim();

    list.split(", ")
        .filter(move |_| !list.is_empty())
        .map(util::number_or_zero)
}

fn parse_operator_and_rhs(i: &str) -> IResult<&str, (char, &str)> {
    preceded(take(OPERATOR_COLUMN), tuple((anychar, preceded(take(1usize), rest))))(i)
}

fn last_token(l: &str) -> &str {
    l.rsplit(' ').next().unwrap_or_default()
}

/// Malformed targets count as monkey 0; negative ones point past every monkey.
fn parse_pass_to(l: Option<&str>) -> usize {
    let target = l.map_or(0, |l| util::number_or_zero(last_token(l)));
    usize::try_from(target).unwrap_or(usize::MAX)
}

pub fn parse_troop(input: &str) -> Result<Troop, ParseError> {
    let mut drafts: Vec<MonkeyDraft> = Vec::new();
    let mut lines = input.lines().map(str::trim).enumerate().map(|(i, l)| (i + 1, l));

    while let Some((line, l)) = lines.next() {
        if l.starts_with("Monkey") {
            drafts.push(MonkeyDraft::default());
            continue;
        }

        let Some(kind) = LineKind::of(l) else {
            continue;
        };

        let current = drafts.last_mut().ok_or(ParseError::OrphanLine {
            line,
            prefix: kind.prefix(),
        })?;

        match kind {
            LineKind::StartingItems => current.items.extend(parse_starting_items(l)),
            LineKind::Operation => {
                let (_, (op, rhs)) = parse_operator_and_rhs(l)
                    .finish()
                    .map_err(|_| ParseError::TruncatedOperation { line })?;

                current.operation = Some(
                    Operation::from_operator(op, OpRhs::from_token(rhs))
                        .ok_or(ParseError::UnknownOperator { line, op })?,
                );
            }
            LineKind::Test => {
                let divisible_by = util::number_or_zero(last_token(l));
                let true_pass_to = parse_pass_to(lines.next().map(|(_, l)| l));
                let false_pass_to = parse_pass_to(lines.next().map(|(_, l)| l));

                current.test = Some(Test {
                    divisible_by,
                    true_pass_to,
                    false_pass_to,
                });
            }
        }
    }

    let monkeys = drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| draft.finish(i))
        .collect::<Result<Vec<_>, _>>()?;

    let troop = Troop::new(monkeys);
    debug!(
        "parsed {} monkeys, divisor product {:?}",
        troop.monkeys().len(),
        troop.divisor_product()
    );

    Ok(troop)
}

impl FromStr for Troop {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_troop(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");
    const TWO_MONKEYS: &str = include_str!("../data/two_monkeys");

    #[test]
    fn one_monkey_per_header() {
        let troop: Troop = TEST_INPUT.parse().unwrap();
        let headers = TEST_INPUT.lines().filter(|l| l.starts_with("Monkey")).count();
        assert_eq!(troop.monkeys().len(), headers);
        assert_eq!(troop.divisor_product(), Some(23 * 19 * 13 * 17));
    }

    #[test]
    fn starting_items_in_order() {
        let troop: Troop = TEST_INPUT.parse().unwrap();
        let items: Vec<Vec<i64>> = troop
            .monkeys()
            .iter()
            .map(|m| m.items.iter().copied().collect())
            .collect();
        assert_eq!(
            items,
            vec![
                vec![79, 98],
                vec![54, 65, 75, 74],
                vec![79, 60, 97],
                vec![74],
            ]
        );
        assert!(troop.monkeys().iter().all(|m| m.inspections == 0));
    }

    #[test]
    fn operations_and_tests() {
        let troop: Troop = TEST_INPUT.parse().unwrap();
        let m = troop.monkeys();
        assert_eq!(m[0].operation, Operation::Multiply(OpRhs::Int(19)));
        assert_eq!(m[1].operation, Operation::Add(OpRhs::Int(6)));
        assert_eq!(m[2].operation, Operation::Multiply(OpRhs::Old));
        assert_eq!(
            m[3].test,
            Test {
                divisible_by: 17,
                true_pass_to: 0,
                false_pass_to: 1
            }
        );
    }

    #[test]
    fn empty_starting_items() {
        let troop: Troop = TWO_MONKEYS.parse().unwrap();
        assert!(troop.monkeys()[1].items.is_empty());
    }

    #[test]
    fn malformed_numbers_become_zero() {
        let input = "Monkey 0:\n  Starting items: 4, x, 6\n  Operation: new = old + 2\n  Test: divisible by seven\n    If true: throw to monkey one\n";
        let troop: Troop = input.parse().unwrap();
        let m = &troop.monkeys()[0];
        assert_eq!(m.items, VecDeque::from([4, 0, 6]));
        assert_eq!(
            m.test,
            Test {
                divisible_by: 0,
                true_pass_to: 0,
                false_pass_to: 0
            }
        );
    }

    #[test]
    fn negative_target_points_past_every_monkey() {
        let input = "Monkey 0:\n  Operation: new = old + 1\n  Test: divisible by 2\n    If true: throw to monkey -1\n    If false: throw to monkey one\n";
        let troop: Troop = input.parse().unwrap();
        let test = troop.monkeys()[0].test;
        assert_eq!(test.true_pass_to, usize::MAX);
        assert_eq!(test.false_pass_to, 0);
    }

    #[test]
    fn non_numeric_operand_means_old() {
        let input = "Monkey 0:\n  Operation: new = old + old\n  Test: divisible by 2\n    If true: throw to monkey 0\n    If false: throw to monkey 0\n";
        let troop: Troop = input.parse().unwrap();
        assert_eq!(troop.monkeys()[0].operation, Operation::Add(OpRhs::Old));
    }

    #[test]
    fn zero_operand_means_old() {
        let input = "Monkey 0:\n  Operation: new = old * 0\n  Test: divisible by 2\n    If true: throw to monkey 0\n    If false: throw to monkey 0\n";
        let troop: Troop = input.parse().unwrap();
        assert_eq!(troop.monkeys()[0].operation, Operation::Multiply(OpRhs::Old));
    }

    #[test]
    fn orphan_line() {
        let err = "  Starting items: 1\nMonkey 0:\n".parse::<Troop>().unwrap_err();
        assert_eq!(
            err,
            ParseError::OrphanLine {
                line: 1,
                prefix: "Starting items"
            }
        );
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn truncated_operation() {
        let err = "Monkey 0:\n  Operation: new = old *\n"
            .parse::<Troop>()
            .unwrap_err();
        assert_eq!(err, ParseError::TruncatedOperation { line: 2 });
    }

    #[test]
    fn unknown_operator() {
        let err = "Monkey 0:\n\n  Operation: new = old % 3\n"
            .parse::<Troop>()
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownOperator { line: 3, op: '%' });
    }

    #[test]
    fn incomplete_monkey() {
        let err = "Monkey 0:\n  Starting items: 1\n  Operation: new = old + 1\n"
            .parse::<Troop>()
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::Incomplete {
                monkey: 0,
                missing: "Test"
            }
        );
        assert_eq!(err.line(), None);
    }
}
