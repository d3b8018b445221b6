use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

/// Length unit for every coordinate and dimension in a model. Declared once
/// at construction and echoed verbatim into the `.units` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Km,
    M,
    Cm,
    Mm,
    Um,
    In,
    Mils,
}

impl Unit {
    pub fn token(self) -> &'static str {
        match self {
            Unit::Km => "km",
            Unit::M => "m",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Um => "um",
            Unit::In => "in",
            Unit::Mils => "mils",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Unit {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" => Ok(Unit::Km),
            "m" => Ok(Unit::M),
            "cm" => Ok(Unit::Cm),
            "mm" => Ok(Unit::Mm),
            "um" => Ok(Unit::Um),
            "in" => Ok(Unit::In),
            "mils" => Ok(Unit::Mils),
            _ => Err(ArgumentError::UnknownUnit(s.to_string())),
        }
    }
}
