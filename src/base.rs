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

//! The value source at the bottom of every payment chain.

use crate::PaymentError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Symbol of the single implicit currency every amount is expressed in.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Decimal places shown in descriptions and quotes.
pub(crate) const DISPLAY_PRECISION: u32 = 2;

/// Rounds an amount for display, half away from zero.
pub(crate) fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `₹1234.50`.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", round_for_display(amount))
}

/// Base payment: a fixed, non-negative amount and the instrument it was made with.
///
/// The amount never changes after construction; every adjustment in a chain
/// starts from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasePayment {
    amount: Decimal,
    label: String,
}

impl BasePayment {
    /// Creates a base payment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for a negative `amount`.
    pub fn new(amount: Decimal, label: impl Into<String>) -> Result<Self, PaymentError> {
        if amount < Decimal::ZERO {
            return Err(PaymentError::negative("amount"));
        }
        Ok(Self {
            amount,
            label: label.into(),
        })
    }

    /// Zero amount, empty label. Placeholder while a chain is torn down.
    pub(crate) fn empty() -> Self {
        Self {
            amount: Decimal::ZERO,
            label: String::new(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `Base Payment (<label>)`.
    pub fn description(&self) -> String {
        format!("Base Payment ({})", self.label)
    }
}
