//! Abstract syntax for compiled rule files.

use std::fmt;
use std::str::FromStr;

/// A parsed rule file: an ordered list of `check` blocks, in source
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFile {
    pub checks: Vec<CheckBlock>,
}

/// One `check host` or `check service <name>` block and its rules.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckBlock {
    pub target: CheckTarget,
    /// Init system named by `with init <name>`; `None` means the
    /// registry default.
    pub init: Option<String>,
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTarget {
    Host,
    Service(String),
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckTarget::Host => f.write_str("host"),
            CheckTarget::Service(name) => f.write_str(name),
        }
    }
}

/// One `if ... then ...` rule. The condition is never empty; the
/// grammar requires at least one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef {
    pub condition: ConditionExpr,
    pub window: Window,
    pub actions: Vec<Action>,
}

/// Condition tree: comparisons over metric paths, joined by `and`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionExpr {
    Compare {
        metric: String,
        op: CompareOp,
        threshold: f64,
    },
    And(Box<ConditionExpr>, Box<ConditionExpr>),
}

impl ConditionExpr {
    /// Leftmost metric path; used to derive rule identifiers.
    pub fn first_metric(&self) -> &str {
        match self {
            ConditionExpr::Compare { metric, .. } => metric,
            ConditionExpr::And(lhs, _) => lhs.first_metric(),
        }
    }
}

/// Debounce qualifier: how long a condition must hold before the rule
/// transitions. `Immediate` (no `for` clause) means a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Immediate,
    Cycles(u32),
    Seconds(u64),
}

/// Actions a rule may reference in its `then` clause. Unknown action
/// names are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Alert,
    Restart,
    Reload,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(Action::Alert),
            "restart" => Ok(Action::Restart),
            "reload" => Ok(Action::Reload),
            _ => Err(format!("unknown action: {s}")),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Alert => f.write_str("alert"),
            Action::Restart => f.write_str("restart"),
            Action::Reload => f.write_str("reload"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LessThan),
            ">=" => Ok(Self::GreaterEqual),
            "<=" => Ok(Self::LessEqual),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            _ => Err(format!("unknown compare operator: {s}")),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
            Self::GreaterEqual => write!(f, ">="),
            Self::LessEqual => write!(f, "<="),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

impl CompareOp {
    pub fn check(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThan => value < threshold,
            Self::GreaterEqual => value >= threshold,
            Self::LessEqual => value <= threshold,
            Self::Equal => value == threshold,
            Self::NotEqual => value != threshold,
        }
    }
}
