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

//! Canned payment scenarios used by the `demo` command.

use crate::{Adjustment, Payment, PaymentError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BASE_AMOUNT: Decimal = dec!(10000);
const CASHBACK: Decimal = dec!(500);

/// A titled payment with the narration printed around it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub title: &'static str,
    pub intro: &'static str,
    pub payment: Payment,
    pub outcome: &'static str,
}

/// The same steps applied to the same base in two different orders.
#[derive(Debug, Clone)]
pub struct OrderingComparison {
    pub first: Payment,
    pub second: Payment,
}

impl OrderingComparison {
    /// Absolute difference between the two final amounts.
    pub fn difference(&self) -> Decimal {
        (self.first.apply() - self.second.apply()).abs()
    }

    /// Whether both orders reach the same amount to the paisa.
    pub fn same_result(&self) -> bool {
        self.difference() < dec!(0.01)
    }
}

/// Builds the five single-chain scenarios, from a bare payment up to a
/// cross-border payment carrying every fee.
///
/// # Errors
///
/// Only fails if one of the built-in parameters is rejected.
pub fn walkthrough() -> Result<Vec<Scenario>, PaymentError> {
    Ok(vec![
        Scenario {
            title: "SCENARIO 1: Basic Payment (No Decorations)",
            intro: "Customer makes a simple UPI payment of ₹10,000",
            payment: Payment::new(BASE_AMOUNT, "UPI")?,
            outcome: "No additional charges applied",
        },
        Scenario {
            title: "SCENARIO 2: Payment with GST",
            intro: "Customer makes a payment with 18% GST applied",
            payment: Payment::new(BASE_AMOUNT, "Card")?.wrap(Adjustment::gst()),
            outcome: "₹10,000 + ₹1,800 (GST) = ₹11,800",
        },
        Scenario {
            title: "SCENARIO 3: Payment with GST + Processing Fee",
            intro: "Customer makes a payment with GST and processing fee",
            payment: Payment::new(BASE_AMOUNT, "UPI")?
                .wrap(Adjustment::gst())
                .wrap(Adjustment::processing_fee()),
            outcome: "₹10,000 → +GST (₹1,800) → +Fee (₹59) = ₹11,859",
        },
        Scenario {
            title: "SCENARIO 4: Payment with GST + Fee + Cashback",
            intro: "Customer uses a promotional code for ₹500 cashback",
            payment: Payment::new(BASE_AMOUNT, "Net Banking")?
                .wrap(Adjustment::gst())
                .wrap(Adjustment::processing_fee())
                .wrap(Adjustment::cashback(CASHBACK)?),
            outcome: "₹10,000 → +GST → +Fee → -Cashback (₹500) = ₹11,359",
        },
        Scenario {
            title: "SCENARIO 5: International Payment",
            intro: "Customer makes a cross-border payment to USD",
            payment: Payment::new(BASE_AMOUNT, "International Card")?
                .wrap(Adjustment::gst())
                .wrap(Adjustment::processing_fee())
                .wrap(Adjustment::international_fee("USD")?),
            outcome: "Additional 2% fee for cross-border transaction",
        },
    ])
}

/// Pairs of chains that differ only in step order.
///
/// # Errors
///
/// Only fails if one of the built-in parameters is rejected.
pub fn ordering_comparisons() -> Result<Vec<OrderingComparison>, PaymentError> {
    let reorder = |first: [Adjustment; 2]| -> Result<OrderingComparison, PaymentError> {
        let [a, b] = first;
        Ok(OrderingComparison {
            first: Payment::new(BASE_AMOUNT, "UPI")?
                .wrap(a.clone())
                .wrap(b.clone()),
            second: Payment::new(BASE_AMOUNT, "UPI")?.wrap(b).wrap(a),
        })
    };

    Ok(vec![
        reorder([Adjustment::gst(), Adjustment::processing_fee()])?,
        reorder([Adjustment::gst(), Adjustment::cashback(CASHBACK)?])?,
    ])
}
