//! ## Custom Errors for Grit
//!
//! This module defines the errors that can be reported to callers of the tree API.

use crate::geometry::Point;
use std::error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents errors specific to invalid operations or parameters in Grit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GritError {
    /// Occurs when a rectangle's corners are not ordered bottom-left to top-right.
    InvalidRectangle {
        /// The bottom-left corner that was provided.
        bottom_left: Point,
        /// The top-right corner that was provided.
        top_right: Point,
    },
}

impl fmt::Display for GritError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GritError::InvalidRectangle {
                bottom_left,
                top_right,
            } => {
                write!(
                    f,
                    "Invalid rectangle: bottom-left corner {bottom_left} must not exceed top-right corner {top_right}"
                )
            }
        }
    }
}

impl Error for GritError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rectangle_display() {
        let err = GritError::InvalidRectangle {
            bottom_left: Point::new(5, 2),
            top_right: Point::new(1, 4),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid rectangle: bottom-left corner (5, 2) must not exceed top-right corner (1, 4)"
        );
    }
}
