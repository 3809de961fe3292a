//! Decoding of declared member types into wrapper chains.
//!
//! A declared type such as `Option<Vec<'a, Statement<'a>>>` is read as a
//! chain of wrappers (`[Option, Sequence]`) around an element type
//! (`Statement`). Lifetimes are ignored, paths are reduced to their last
//! segment, and `&'a str` is the terminal element `&str`.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::error::TypeExprError;
use crate::{String, ToOwned, ToString, Vec};

/// One layer of indirection around a member's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    /// `Option<T>`: the element may be absent.
    Option,
    /// `Vec<'a, T>`: zero or more elements.
    Sequence,
    /// `Box<'a, T>`: the element lives behind an arena pointer.
    BoxedRef,
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Wrapper::Option => "Option",
            Wrapper::Sequence => "Vec",
            Wrapper::BoxedRef => "Box",
        })
    }
}

/// Wrappers from outermost to innermost.
pub type WrapperChain = SmallVec<[Wrapper; 2]>;

/// The wrapper chains walkers know how to unwrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// `T`
    Direct,
    /// `Option<T>`
    Optional,
    /// `Box<T>`
    Boxed,
    /// `Option<Box<T>>`
    OptionalBoxed,
    /// `Vec<T>`
    Sequence,
    /// `Option<Vec<T>>`
    OptionalSequence,
    /// `Vec<Option<T>>`
    SequenceOfOptional,
    /// `Vec<Box<T>>`
    SequenceOfBoxed,
}

impl FieldShape {
    /// Classify a wrapper chain, or `None` if walkers cannot unwrap it.
    pub fn from_wrappers(wrappers: &[Wrapper]) -> Option<Self> {
        let shape = match wrappers {
            [] => Self::Direct,
            [Wrapper::Option] => Self::Optional,
            [Wrapper::BoxedRef] => Self::Boxed,
            [Wrapper::Option, Wrapper::BoxedRef] => Self::OptionalBoxed,
            [Wrapper::Sequence] => Self::Sequence,
            [Wrapper::Option, Wrapper::Sequence] => Self::OptionalSequence,
            [Wrapper::Sequence, Wrapper::Option] => Self::SequenceOfOptional,
            [Wrapper::Sequence, Wrapper::BoxedRef] => Self::SequenceOfBoxed,
            _ => return None,
        };
        Some(shape)
    }

    pub fn wrappers(self) -> &'static [Wrapper] {
        match self {
            Self::Direct => &[],
            Self::Optional => &[Wrapper::Option],
            Self::Boxed => &[Wrapper::BoxedRef],
            Self::OptionalBoxed => &[Wrapper::Option, Wrapper::BoxedRef],
            Self::Sequence => &[Wrapper::Sequence],
            Self::OptionalSequence => &[Wrapper::Option, Wrapper::Sequence],
            Self::SequenceOfOptional => &[Wrapper::Sequence, Wrapper::Option],
            Self::SequenceOfBoxed => &[Wrapper::Sequence, Wrapper::BoxedRef],
        }
    }

    /// The whole member may be absent.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::Optional | Self::OptionalBoxed | Self::OptionalSequence
        )
    }

    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            Self::Sequence
                | Self::OptionalSequence
                | Self::SequenceOfOptional
                | Self::SequenceOfBoxed
        )
    }

    pub fn is_boxed(self) -> bool {
        matches!(
            self,
            Self::Boxed | Self::OptionalBoxed | Self::SequenceOfBoxed
        )
    }
}

/// A declared member type reduced to its wrapper chain and element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    wrappers: WrapperChain,
    element: String,
}

impl TypeExpr {
    /// Parse declared type text.
    ///
    /// ```
    /// use arbor_model::{TypeExpr, Wrapper};
    ///
    /// let expr = TypeExpr::parse("Option<Vec<'a, Statement<'a>>>").unwrap();
    /// assert_eq!(expr.wrappers(), &[Wrapper::Option, Wrapper::Sequence]);
    /// assert_eq!(expr.element(), "Statement");
    /// ```
    pub fn parse(text: &str) -> Result<Self, TypeExprError> {
        let tree = Parser::new(text).parse()?;

        let mut wrappers = WrapperChain::new();
        let mut current = &tree;
        loop {
            match current {
                Ty::Path { name, args } => {
                    let wrapper = match name.as_str() {
                        "Option" => Some(Wrapper::Option),
                        "Vec" => Some(Wrapper::Sequence),
                        "Box" => Some(Wrapper::BoxedRef),
                        _ => None,
                    };
                    match (wrapper, args.as_slice()) {
                        (Some(wrapper), [inner]) => {
                            wrappers.push(wrapper);
                            current = inner;
                        }
                        (None, []) => {
                            return Ok(Self {
                                wrappers,
                                element: name.clone(),
                            });
                        }
                        _ => {
                            return Err(TypeExprError::UnsupportedWrapper {
                                wrapper: current.to_string(),
                            });
                        }
                    }
                }
                Ty::Ref(inner) => {
                    return match &**inner {
                        Ty::Path { name, args } if name == "str" && args.is_empty() => Ok(Self {
                            wrappers,
                            element: "&str".to_owned(),
                        }),
                        other => Err(TypeExprError::UnsupportedReference {
                            target: other.to_string(),
                        }),
                    };
                }
            }
        }
    }

    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub(crate) fn into_parts(self) -> (WrapperChain, String) {
        (self.wrappers, self.element)
    }

    /// Classify the wrapper chain.
    pub fn shape(&self) -> Result<FieldShape, TypeExprError> {
        FieldShape::from_wrappers(&self.wrappers).ok_or_else(|| TypeExprError::UnsupportedChain {
            chain: self.to_string(),
        })
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for wrapper in &self.wrappers {
            write!(f, "{wrapper}<")?;
        }
        f.write_str(&self.element)?;
        for _ in &self.wrappers {
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Parsed type text. Lifetime arguments are dropped while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ty {
    Path { name: String, args: Vec<Ty> },
    Ref(Box<Ty>),
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Path { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Ty::Ref(inner) => write!(f, "&{inner}"),
        }
    }
}

struct Parser<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }

    fn parse(mut self) -> Result<Ty, TypeExprError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(TypeExprError::Empty);
        }
        let ty = self.ty()?;
        self.skip_ws();
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(ty)
    }

    fn ty(&mut self) -> Result<Ty, TypeExprError> {
        self.skip_ws();
        match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                self.skip_ws();
                if self.peek() == Some(b'\'') {
                    self.lifetime()?;
                    self.skip_ws();
                }
                self.eat_keyword("mut");
                let inner = self.ty()?;
                Ok(Ty::Ref(Box::new(inner)))
            }
            Some(c) if is_ident_start(c) => self.path(),
            Some(_) => Err(self.unexpected()),
            None => Err(self.end()),
        }
    }

    fn path(&mut self) -> Result<Ty, TypeExprError> {
        let mut name = self.ident()?;
        while self.text[self.pos..].starts_with("::") {
            self.pos += 2;
            name = self.ident()?;
        }

        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b'<') {
            self.pos += 1;
            loop {
                self.skip_ws();
                match self.peek() {
                    Some(b'>') => {
                        self.pos += 1;
                        break;
                    }
                    Some(b'\'') => self.lifetime()?,
                    Some(_) => args.push(self.ty()?),
                    None => return Err(self.end()),
                }
                self.skip_ws();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b'>') => {}
                    Some(_) => return Err(self.unexpected()),
                    None => return Err(self.end()),
                }
            }
        }
        Ok(Ty::Path { name, args })
    }

    fn ident(&mut self) -> Result<String, TypeExprError> {
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some(_) => return Err(self.unexpected()),
            None => return Err(self.end()),
        }
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        Ok(self.text[start..self.pos].to_owned())
    }

    fn lifetime(&mut self) -> Result<(), TypeExprError> {
        // Skip the quote, then the name.
        self.pos += 1;
        self.ident().map(|_| ())
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.text.as_bytes()[self.pos..];
        let matches = rest.starts_with(keyword.as_bytes())
            && !rest
                .get(keyword.len())
                .is_some_and(|&c| is_ident_continue(c));
        if matches {
            self.pos += keyword.len();
            self.skip_ws();
        }
        matches
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn unexpected(&self) -> TypeExprError {
        let found = self.text[self.pos..]
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_default();
        TypeExprError::Unexpected {
            text: self.text.to_owned(),
            found,
            position: self.pos,
        }
    }

    fn end(&self) -> TypeExprError {
        TypeExprError::UnexpectedEnd {
            text: self.text.to_owned(),
        }
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
