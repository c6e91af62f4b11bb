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

//! # Payment Chain
//!
//! This library computes what a customer is charged for a payment after an
//! ordered series of adjustments: taxes, capped gateway fees, cashback and
//! cross-border fees.
//!
//! ## Core Components
//!
//! - [`BasePayment`]: The untransformed amount and the instrument used
//! - [`Adjustment`]: One step of the chain (surcharge, capped surcharge, deduction, cross-border)
//! - [`Payment`]: A base payment with zero or more adjustments wrapped around it
//! - [`PaymentError`]: Error types for invalid construction parameters
//!
//! ## Example
//!
//! ```
//! use payment_chain::{Adjustment, Payment};
//! use rust_decimal_macros::dec;
//!
//! let payment = Payment::new(dec!(10000), "Net Banking")
//!     .unwrap()
//!     .wrap(Adjustment::gst())
//!     .wrap(Adjustment::processing_fee())
//!     .wrap(Adjustment::cashback(dec!(500)).unwrap());
//!
//! assert_eq!(payment.apply(), dec!(11359));
//! ```
//!
//! ## Ordering
//!
//! Steps are applied in the order they are wrapped, and the order matters:
//! an 18% surcharge followed by a 500 deduction on 10,000 gives 11,300,
//! the reverse gives 11,210.
//!
//! ## Thread Safety
//!
//! Chains are immutable owned values. A built chain can be shared and
//! evaluated from any number of threads.

pub mod adjustment;
mod base;
pub mod error;
mod payment;
pub mod report;
pub mod scenarios;

pub use adjustment::Adjustment;
pub use base::{BasePayment, CURRENCY_SYMBOL};
pub use error::PaymentError;
pub use payment::{LineItem, Payment, Quote};
