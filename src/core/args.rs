//! Predicate arguments
//!
//! A bisection argument is either a single value or a tuple of positional
//! values. When the shape is known at compile time, plain tuples work
//! directly and [`Unpack`] spreads them into an n-ary predicate. When the
//! shape is only known at run time (values typed on the command line),
//! [`Args`] carries it explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar or a tuple of positional arguments, decided once when the
/// argument list is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Args<T> {
    Scalar(T),
    Tuple(Vec<T>),
}

impl<T> Args<T> {
    /// All positional components; a scalar yields a single component.
    pub fn components(&self) -> &[T] {
        match self {
            Args::Scalar(value) => std::slice::from_ref(value),
            Args::Tuple(values) => values,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.components().first()
    }

    pub fn len(&self) -> usize {
        self.components().len()
    }

    pub fn is_empty(&self) -> bool {
        self.components().is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Args::Scalar(_))
    }
}

impl Args<String> {
    /// Parse one token: without `separator` it is a scalar, otherwise the
    /// trimmed components form a tuple.
    ///
    /// # Examples
    /// ```
    /// use toolbelt::core::args::Args;
    ///
    /// assert_eq!(Args::parse("1386", ','), Args::Scalar("1386".to_string()));
    /// assert_eq!(
    ///     Args::parse("1386, tag", ','),
    ///     Args::Tuple(vec!["1386".to_string(), "tag".to_string()])
    /// );
    /// ```
    pub fn parse(token: &str, separator: char) -> Self {
        if token.contains(separator) {
            Args::Tuple(
                token
                    .split(separator)
                    .map(|part| part.trim().to_string())
                    .collect(),
            )
        } else {
            Args::Scalar(token.trim().to_string())
        }
    }

    pub fn parse_list<S: AsRef<str>>(tokens: &[S], separator: char) -> Vec<Self> {
        tokens
            .iter()
            .map(|token| Self::parse(token.as_ref(), separator))
            .collect()
    }
}

impl<T> From<T> for Args<T> {
    fn from(value: T) -> Self {
        Args::Scalar(value)
    }
}

impl<T: fmt::Display> fmt::Display for Args<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

/// Spread a tuple into the positional parameters of `f`.
pub trait Unpack<F, R> {
    fn unpack_into(&self, f: &mut F) -> R;
}

macro_rules! impl_unpack {
    ($($name:ident),+) => {
        impl<F, R, $($name),+> Unpack<F, R> for ($($name,)+)
        where
            F: FnMut($(&$name),+) -> R,
        {
            #[allow(non_snake_case)]
            fn unpack_into(&self, f: &mut F) -> R {
                let ($($name,)+) = self;
                f($($name),+)
            }
        }
    };
}

impl_unpack!(A);
impl_unpack!(A, B);
impl_unpack!(A, B, C);
impl_unpack!(A, B, C, D);
impl_unpack!(A, B, C, D, E);
impl_unpack!(A, B, C, D, E, G);
