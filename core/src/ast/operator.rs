//! Operator and kind enums. These are terminals: walkers never descend
//! into them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Equality,
    StrictEquality,
    LessThan,
    GreaterThan,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
            Self::Division => "/",
            Self::Equality => "==",
            Self::StrictEquality => "===",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negation,
    LogicalNot,
    Typeof,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negation => "-",
            Self::LogicalNot => "!",
            Self::Typeof => "typeof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    Addition,
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Addition => "+=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodDefinitionKind {
    Constructor,
    Method,
    Get,
    Set,
}
