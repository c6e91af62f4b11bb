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

//! Payment chains.
//!
//! A [`Payment`] is either a [`BasePayment`] or an [`Adjustment`] wrapped
//! around another payment. Chains are built bottom-up by repeatedly wrapping
//! the current head:
//!
//! ```
//! use payment_chain::{Adjustment, Payment};
//! use rust_decimal_macros::dec;
//!
//! let payment = Payment::new(dec!(10000), "UPI")
//!     .unwrap()
//!     .wrap(Adjustment::gst())
//!     .wrap(Adjustment::processing_fee());
//!
//! assert_eq!(payment.apply(), dec!(11859));
//! assert_eq!(
//!     payment.describe(),
//!     "Base Payment (UPI) + GST @18% (₹1800.00) + Processing Fee (₹59.00)"
//! );
//! ```
//!
//! Nothing is cached: [`Payment::apply`] and [`Payment::describe`] walk the
//! whole chain on every call. Every walk is a loop, so chain depth is not
//! limited by the stack.

use crate::base::{BasePayment, DISPLAY_PRECISION, round_for_display};
use crate::{Adjustment, PaymentError};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::fmt;

pub enum Payment {
    /// Chain start: the untransformed base amount.
    Base(BasePayment),
    /// `step` applied to whatever `wrapped` evaluates to.
    Adjusted {
        step: Adjustment,
        wrapped: Box<Payment>,
    },
}

impl Payment {
    /// Starts a chain from a base amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for a negative `amount`.
    pub fn new(amount: Decimal, label: impl Into<String>) -> Result<Self, PaymentError> {
        BasePayment::new(amount, label).map(Self::Base)
    }

    /// Wraps this chain in `step`, returning the new head.
    #[must_use]
    pub fn wrap(self, step: Adjustment) -> Self {
        Self::Adjusted {
            step,
            wrapped: Box::new(self),
        }
    }

    /// Evaluates the chain and returns the final amount.
    ///
    /// Never negative. Saturates at [`Decimal::MAX`] on overflow; use
    /// [`Payment::try_apply`] to detect that case.
    pub fn apply(&self) -> Decimal {
        self.steps()
            .into_iter()
            .fold(self.base().amount(), |amount, step| step.apply(amount))
    }

    /// Evaluates the chain, failing instead of saturating.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Overflow`] if any step exceeds the range of [`Decimal`].
    pub fn try_apply(&self) -> Result<Decimal, PaymentError> {
        self.steps()
            .into_iter()
            .try_fold(self.base().amount(), |amount, step| step.try_apply(amount))
    }

    /// Returns the description of every step, source first.
    pub fn describe(&self) -> String {
        self.trace().1
    }

    /// Returns the value source at the bottom of the chain.
    pub fn base(&self) -> &BasePayment {
        let mut current = self;
        loop {
            match current {
                Self::Base(base) => return base,
                Self::Adjusted { wrapped, .. } => current = &**wrapped,
            }
        }
    }

    /// Returns the adjustments in the order they are applied.
    pub fn steps(&self) -> Vec<&Adjustment> {
        let mut steps = Vec::new();
        let mut current = self;
        while let Self::Adjusted { step, wrapped } = current {
            steps.push(step);
            current = &**wrapped;
        }
        steps.reverse();
        steps
    }

    /// Number of adjustments in the chain.
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut current = self;
        while let Self::Adjusted { wrapped, .. } = current {
            len += 1;
            current = &**wrapped;
        }
        len
    }

    /// Returns `true` when no adjustment has been applied.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Base(_))
    }

    /// Returns one [`LineItem`] per adjustment, in application order.
    pub fn breakdown(&self) -> Vec<LineItem> {
        let mut running = self.base().amount();
        self.steps()
            .into_iter()
            .map(|step| {
                let after = step.apply(running);
                let item = LineItem {
                    description: step.fragment(running).trim().to_string(),
                    before: running,
                    charge: after - running,
                    after,
                };
                running = after;
                item
            })
            .collect()
    }

    /// Summarises the chain for output.
    ///
    /// The total saturates like [`Payment::apply`].
    pub fn quote(&self) -> Quote {
        let (total, description) = self.trace();
        self.quote_with(total, description)
    }

    /// Summarises the chain, failing instead of saturating.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Overflow`] if any step exceeds the range of [`Decimal`].
    pub fn try_quote(&self) -> Result<Quote, PaymentError> {
        let base = self.base();
        let mut total = base.amount();
        let mut description = base.description();
        for step in self.steps() {
            description.push_str(&step.fragment(total));
            total = step.try_apply(total)?;
        }
        Ok(self.quote_with(total, description))
    }

    /// Final amount and full description in a single forward pass.
    fn trace(&self) -> (Decimal, String) {
        let base = self.base();
        let mut total = base.amount();
        let mut description = base.description();
        for step in self.steps() {
            description.push_str(&step.fragment(total));
            total = step.apply(total);
        }
        (total, description)
    }

    fn quote_with(&self, total: Decimal, description: String) -> Quote {
        let base = self.base();
        Quote {
            payment: base.label().to_string(),
            base: base.amount(),
            total,
            description,
        }
    }

    /// Moves the wrapped chain out, leaving an empty base in its place.
    fn detach(&mut self) -> Option<Payment> {
        match self {
            Self::Base(_) => None,
            Self::Adjusted { wrapped, .. } => Some(std::mem::replace(
                &mut **wrapped,
                Self::Base(BasePayment::empty()),
            )),
        }
    }
}

// The derived impls below would recurse once per step; these walk the chain
// in a loop so depth is bounded by memory, not by the stack.

impl Drop for Payment {
    fn drop(&mut self) {
        let mut next = self.detach();
        while let Some(mut payment) = next {
            next = payment.detach();
        }
    }
}

impl Clone for Payment {
    fn clone(&self) -> Self {
        self.steps()
            .into_iter()
            .fold(Self::Base(self.base().clone()), |payment, step| {
                payment.wrap(step.clone())
            })
    }
}

impl PartialEq for Payment {
    fn eq(&self, other: &Self) -> bool {
        self.base() == other.base() && self.steps() == other.steps()
    }
}

impl Eq for Payment {}

impl fmt::Debug for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payment")
            .field("base", self.base())
            .field("steps", &self.steps())
            .finish()
    }
}

impl From<BasePayment> for Payment {
    fn from(base: BasePayment) -> Self {
        Self::Base(base)
    }
}

/// Effect of a single adjustment within a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// The step's own description fragment, e.g. `+ GST @18% (₹1800.00)`.
    pub description: String,
    pub before: Decimal,
    /// Signed change: positive for fees, negative for deductions.
    pub charge: Decimal,
    pub after: Decimal,
}

/// Final state of a priced payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub payment: String,
    pub base: Decimal,
    pub total: Decimal,
    pub description: String,
}

impl Serialize for Quote {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Quote", 4)?;
        state.serialize_field("payment", &self.payment)?;
        state.serialize_field("base", &fixed(self.base))?;
        state.serialize_field("total", &fixed(self.total))?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}

/// Rounds for display and pads to exactly two decimal places.
fn fixed(amount: Decimal) -> Decimal {
    let mut rounded = round_for_display(amount);
    rounded.rescale(DISPLAY_PRECISION);
    rounded
}
