use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseOperationError {
    #[error("unknown operation: {0}")]
    Unknown(String),
}

/// The four arithmetic operations the tutor explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operations, in teaching order. Handy for uniform random draws.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// The symbol used when reading a problem back to the child.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    /// Accepts symbols and the words a child (or a speech recognizer) would
    /// produce: `+`, `plus`, `x`, `times`, `divided by`, and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "plus" | "add" => Ok(Operation::Add),
            "-" | "minus" | "subtract" | "take away" => Ok(Operation::Subtract),
            "x" | "*" | "×" | "times" | "multiply" | "multiplied by" => Ok(Operation::Multiply),
            "/" | "÷" | "divide" | "divided" | "divided by" | "share" => Ok(Operation::Divide),
            other => Err(ParseOperationError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_and_words() {
        assert_eq!("+".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("Plus".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("x".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!("times".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!("divided by".parse::<Operation>().unwrap(), Operation::Divide);
        assert_eq!("take away".parse::<Operation>().unwrap(), Operation::Subtract);
    }

    #[test]
    fn rejects_garbage() {
        let err = "percent".parse::<Operation>().unwrap_err();
        assert_eq!(err, ParseOperationError::Unknown("percent".to_string()));
    }

    #[test]
    fn displays_as_symbol() {
        assert_eq!(Operation::Multiply.to_string(), "×");
        assert_eq!(Operation::Divide.to_string(), "÷");
    }
}
