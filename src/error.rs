// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for building payment chains.

use thiserror::Error;

/// Payment chain construction errors.
///
/// A deduction larger than the running amount floors the result at zero
/// instead of returning an error. Only exceeding the range of `Decimal`
/// fails, and only through the `try_` evaluation methods.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// A constructor parameter is outside its allowed range
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: &'static str,
    },

    /// Adjustment spec keyword is not recognized
    #[error("unknown adjustment `{0}`")]
    UnknownAdjustment(String),

    /// Adjustment spec has the wrong number of arguments or an unparsable value
    #[error("malformed adjustment `{0}`")]
    MalformedAdjustment(String),

    /// Running amount exceeded the largest representable decimal
    #[error("amount overflowed")]
    Overflow,
}

impl PaymentError {
    pub(crate) fn negative(field: &'static str) -> Self {
        Self::InvalidParameter {
            field,
            reason: "must not be negative",
        }
    }

    pub(crate) fn empty(field: &'static str) -> Self {
        Self::InvalidParameter {
            field,
            reason: "must not be empty",
        }
    }
}
