//! Named rectangular coordinate domains.
//!
//! A tensor exposes several domains over the same data: the mem domain its
//! buffer is laid out in, the natural domain of its logical components, the
//! access domain of its dispatch ids and the spectator domain of its
//! pass-through axes.

use std::fmt;

use crate::strides::linear_to_cartesian;

/// One named axis of a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainAxis {
    name: String,
    extent: usize,
}

impl DomainAxis {
    pub fn new(name: impl Into<String>, extent: usize) -> Self {
        Self {
            name: name.into(),
            extent,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn extent(&self) -> usize {
        self.extent
    }
}

/// Ordered list of named axes.
///
/// # Example
///
/// ```
/// use symtensors::domain::{Domain, DomainAxis};
///
/// let d = Domain::new(vec![DomainAxis::new("x", 2), DomainAxis::new("y", 3)]);
/// assert_eq!(d.size(), 6);
/// assert_eq!(d.iter().nth(4), Some(vec![1, 1]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    axes: Vec<DomainAxis>,
}

impl Domain {
    pub fn new(axes: Vec<DomainAxis>) -> Self {
        Self { axes }
    }

    #[inline]
    pub fn axes(&self) -> &[DomainAxis] {
        &self.axes
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn extents(&self) -> Vec<usize> {
        self.axes.iter().map(DomainAxis::extent).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.axes.iter().map(DomainAxis::name).collect()
    }

    /// Number of coordinates; 1 for a domain without axes.
    pub fn size(&self) -> usize {
        self.axes.iter().map(DomainAxis::extent).product()
    }

    /// Whether the domain contains no coordinate.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Position of the axis named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.name == name)
    }

    /// All coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        let extents = self.extents();
        (0..self.size()).map(move |linear| linear_to_cartesian(linear, &extents))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, axis) in self.axes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", axis.name, axis.extent)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<DomainAxis> for Domain {
    fn from_iter<I: IntoIterator<Item = DomainAxis>>(iter: I) -> Self {
        Self {
            axes: iter.into_iter().collect(),
        }
    }
}
