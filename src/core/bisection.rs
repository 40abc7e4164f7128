//! Generalized bisection search
//!
//! Finds the boundary of an ordered argument list: the last argument (seen
//! from the side that produces the expected result) for which a predicate
//! still returns the expected result. The list must be monotonic with
//! respect to the predicate, e.g. `[true, true, false, false]` or its
//! reverse; the orientation is detected from the two extremities.
//!
//! ```
//! use toolbelt::core::bisection::bisect;
//!
//! let args: Vec<u32> = (0..1600).collect();
//! let boundary = bisect(|i: &u32| *i >= 1386, &args)?;
//! assert_eq!(*boundary.value, 1386);
//! # Ok::<(), toolbelt::error::BisectError>(())
//! ```

use crate::core::args::Unpack;
use crate::error::BisectError;
use serde::Serialize;
use std::fmt::Debug;

/// Which extremity of the list produces the expected result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Expected results on the left, the boundary is searched rightwards.
    LeftToRight,
    /// Expected results on the right, the boundary is searched leftwards.
    RightToLeft,
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Boundary<T> {
    /// Position of `value` in the argument list
    pub index: usize,
    pub value: T,
    /// Number of predicate evaluations performed
    pub probes: usize,
    pub orientation: Orientation,
}

impl<A: Clone> Boundary<&A> {
    /// Detach the result from the borrowed argument list.
    pub fn cloned(self) -> Boundary<A> {
        Boundary {
            index: self.index,
            value: self.value.clone(),
            probes: self.probes,
            orientation: self.orientation,
        }
    }
}

impl<T> Boundary<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Boundary<U> {
        Boundary {
            index: self.index,
            value: f(self.value),
            probes: self.probes,
            orientation: self.orientation,
        }
    }
}

/// Search options: the result to bound and whether an all-expected list is
/// acceptable.
#[derive(Debug, Clone)]
pub struct Bisection<R> {
    expected_result: R,
    allow_all_expected: bool,
}

impl Default for Bisection<bool> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<R> Bisection<R>
where
    R: PartialEq + Debug,
{
    pub fn new(expected_result: R) -> Self {
        Self {
            expected_result,
            allow_all_expected: false,
        }
    }

    /// Accept lists where both extremities produce the expected result. The
    /// list is then considered ascending and its last argument is returned.
    pub fn allow_all_expected(mut self, allow: bool) -> Self {
        self.allow_all_expected = allow;
        self
    }

    pub fn expected_result(&self) -> &R {
        &self.expected_result
    }

    /// Search with an infallible predicate.
    pub fn search<'a, A, F>(
        &self,
        args: &'a [A],
        mut predicate: F,
    ) -> Result<Boundary<&'a A>, BisectError>
    where
        F: FnMut(&A) -> R,
    {
        self.try_search(args, |arg| Ok::<R, BisectError>(predicate(arg)))
    }

    /// Search with tuple arguments spread into an n-ary predicate.
    ///
    /// ```
    /// use toolbelt::core::bisection::Bisection;
    ///
    /// let args: Vec<(u32, &str)> = (0..10_000).map(|x| (x, "tag")).collect();
    /// let boundary = Bisection::default()
    ///     .search_unpacked(&args, |i: &u32, _tag: &&str| *i >= 1386)?;
    /// assert_eq!(*boundary.value, (1386, "tag"));
    /// # Ok::<(), toolbelt::error::BisectError>(())
    /// ```
    pub fn search_unpacked<'a, A, F>(
        &self,
        args: &'a [A],
        mut predicate: F,
    ) -> Result<Boundary<&'a A>, BisectError>
    where
        A: Unpack<F, R>,
    {
        self.search(args, |arg| arg.unpack_into(&mut predicate))
    }

    /// Search with a fallible predicate. The first predicate error aborts the
    /// search and is returned unchanged.
    pub fn try_search<'a, A, F, E>(
        &self,
        args: &'a [A],
        mut predicate: F,
    ) -> Result<Boundary<&'a A>, E>
    where
        F: FnMut(&A) -> Result<R, E>,
        E: From<BisectError>,
    {
        if args.len() < 2 {
            return Err(BisectError::TooFewArguments { len: args.len() }.into());
        }

        let mut probes = 0;
        let mut evaluate = |index: usize| -> Result<R, E> {
            let result = predicate(&args[index])?;
            probes += 1;
            log::debug!("Probe #{} at index {}: {:?}", probes, index, result);
            Ok(result)
        };

        let mut index_left = 0;
        let mut index_right = args.len() - 1;

        let left_result = evaluate(index_left)?;
        let right_result = evaluate(index_right)?;
        let left_expected = left_result == self.expected_result;
        let right_expected = right_result == self.expected_result;

        let (orientation, mut index_last_expected) = match (left_expected, right_expected) {
            (true, true) => {
                if !self.allow_all_expected {
                    return Err(BisectError::AmbiguousBoundary {
                        left: format!("{:?}", left_result),
                        right: format!("{:?}", right_result),
                    }
                    .into());
                }
                // Any all-expected list is read as ascending
                return Ok(Boundary {
                    index: index_right,
                    value: &args[index_right],
                    probes,
                    orientation: Orientation::LeftToRight,
                });
            }
            (false, false) => {
                return Err(BisectError::NoBoundary {
                    left: format!("{:?}", left_result),
                    right: format!("{:?}", right_result),
                }
                .into());
            }
            (true, false) => (Orientation::LeftToRight, index_left),
            (false, true) => (Orientation::RightToLeft, index_right),
        };

        let left_to_right = orientation == Orientation::LeftToRight;
        while index_left < index_right {
            let index_middle = (index_left + index_right) / 2;
            let matched = evaluate(index_middle)? == self.expected_result;
            if matched {
                index_last_expected = index_middle;
            }
            if matched == left_to_right {
                // Boundary lies at or right of the middle
                index_left = if index_middle > index_left {
                    index_middle
                } else {
                    index_middle + 1
                };
            } else {
                index_right = if index_middle < index_right {
                    index_middle
                } else {
                    index_middle - 1
                };
            }
        }

        log::debug!(
            "Bisection resolved index {} in {} probes ({:?})",
            index_last_expected,
            probes,
            orientation
        );

        Ok(Boundary {
            index: index_last_expected,
            value: &args[index_last_expected],
            probes,
            orientation,
        })
    }
}

/// Find the last argument for which `predicate` returns `true`.
pub fn bisect<A, F>(predicate: F, args: &[A]) -> Result<Boundary<&A>, BisectError>
where
    F: FnMut(&A) -> bool,
{
    Bisection::default().search(args, predicate)
}

/// Find the last argument for which `predicate` returns `expected_result`.
pub fn bisect_with<A, R, F>(
    predicate: F,
    args: &[A],
    expected_result: R,
    allow_all_expected: bool,
) -> Result<Boundary<&A>, BisectError>
where
    R: PartialEq + Debug,
    F: FnMut(&A) -> R,
{
    Bisection::new(expected_result)
        .allow_all_expected(allow_all_expected)
        .search(args, predicate)
}

/// Tuple-argument variant of [`bisect`].
pub fn bisect_unpacked<A, F>(predicate: F, args: &[A]) -> Result<Boundary<&A>, BisectError>
where
    A: Unpack<F, bool>,
{
    Bisection::default().search_unpacked(args, predicate)
}
