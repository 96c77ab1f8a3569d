use std::collections::VecDeque;

use num::Integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRhs {
    Int(i64),
    Old,
}

impl OpRhs {
    /// Zero, or anything that is not an integer, refers back to the old value.
    pub fn from_token(token: &str) -> Self {
        match util::number(token) {
            Some(0) | None => OpRhs::Old,
            Some(n) => OpRhs::Int(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add(OpRhs),
    Subtract(OpRhs),
    Multiply(OpRhs),
    Divide(OpRhs),
}

impl Operation {
    pub fn from_operator(op: char, rhs: OpRhs) -> Option<Self> {
        match op {
            '+' => Some(Operation::Add(rhs)),
            '-' => Some(Operation::Subtract(rhs)),
            '*' => Some(Operation::Multiply(rhs)),
            '/' => Some(Operation::Divide(rhs)),
            _ => None,
        }
    }

    /// New worry level, or `None` on overflow or division by zero.
    pub fn apply(&self, old: i64) -> Option<i64> {
        match *self {
            Operation::Add(x) => match x {
                OpRhs::Int(y) => old.checked_add(y),
                OpRhs::Old => old.checked_add(old),
            },
            Operation::Subtract(x) => match x {
                OpRhs::Int(y) => old.checked_sub(y),
                OpRhs::Old => Some(0),
            },
            Operation::Multiply(x) => match x {
                OpRhs::Int(y) => old.checked_mul(y),
                OpRhs::Old => old.checked_mul(old),
            },
            Operation::Divide(x) => match x {
                OpRhs::Int(y) => old.checked_div(y),
                OpRhs::Old => Some(1),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Test {
    pub divisible_by: i64,
    pub true_pass_to: usize,
    pub false_pass_to: usize,
}

impl Test {
    /// `None` when the divisor is zero.
    pub fn throw_to(&self, worry_lvl: i64) -> Option<usize> {
        if self.divisible_by == 0 {
            return None;
        }

        if worry_lvl.is_multiple_of(&self.divisible_by) {
            Some(self.true_pass_to)
        } else {
            Some(self.false_pass_to)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monkey {
    pub items: VecDeque<i64>,
    pub operation: Operation,
    pub test: Test,
    pub inspections: u64,
}

impl Monkey {
    pub fn new(items: impl IntoIterator<Item = i64>, operation: Operation, test: Test) -> Self {
        Self {
            items: items.into_iter().collect(),
            operation,
            test,
            inspections: 0,
        }
    }
}

/// Parsed monkeys, kept untouched so every run starts from the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Troop {
    pub(crate) monkeys: Vec<Monkey>,
    pub(crate) divisor_product: Option<i64>,
}

impl Troop {
    pub fn new(monkeys: Vec<Monkey>) -> Self {
        let divisor_product = monkeys
            .iter()
            .try_fold(1i64, |acc, m| acc.checked_mul(m.test.divisible_by));

        Self {
            monkeys,
            divisor_product,
        }
    }

    pub fn monkeys(&self) -> &[Monkey] {
        &self.monkeys
    }

    /// Product of every test divisor; worry levels modulo this keep all tests intact.
    /// `None` when it does not fit in an `i64`.
    pub fn divisor_product(&self) -> Option<i64> {
        self.divisor_product
    }
}
