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

//! Adjustment steps.
//!
//! An [`Adjustment`] turns the running amount of a payment into a new amount
//! and contributes one fragment to the payment description. There are four
//! kinds:
//!
//! | Kind | Result for input `x` |
//! |------|----------------------|
//! | [`Surcharge`](Adjustment::Surcharge) | `x + x * rate` |
//! | [`CappedSurcharge`](Adjustment::CappedSurcharge) | `x + min(x * rate, cap)` |
//! | [`Deduction`](Adjustment::Deduction) | `max(x - amount, 0)` |
//! | [`CrossBorder`](Adjustment::CrossBorder) | `x + x * rate` |
//!
//! Results are always clamped at zero. The kinds do not commute in general:
//! a surcharge followed by a deduction is not the same as the reverse.

use crate::PaymentError;
use crate::base::format_money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const GST_RATE: Decimal = dec!(0.18);
const PROCESSING_FEE_RATE: Decimal = dec!(0.005);
const PROCESSING_FEE_CAP: Decimal = dec!(500);
const INTERNATIONAL_FEE_RATE: Decimal = dec!(0.02);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Percentage added on top of the running amount.
    Surcharge { name: String, rate: Decimal },
    /// Percentage fee that never exceeds `cap`.
    CappedSurcharge {
        name: String,
        rate: Decimal,
        cap: Decimal,
    },
    /// Flat amount taken off, floored at zero.
    Deduction { name: String, amount: Decimal },
    /// Percentage fee for a payment settled in another currency.
    ///
    /// `currency` only labels the description; no conversion happens.
    CrossBorder { rate: Decimal, currency: String },
}

impl Adjustment {
    /// Creates a percentage surcharge.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for an empty `name` or a negative `rate`.
    pub fn surcharge(name: impl Into<String>, rate: Decimal) -> Result<Self, PaymentError> {
        let name = non_empty("name", name.into())?;
        Ok(Self::Surcharge {
            name,
            rate: non_negative("rate", rate)?,
        })
    }

    /// Creates a percentage surcharge whose fee is capped at `cap`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for an empty `name`, or a
    /// negative `rate` or `cap`.
    pub fn capped_surcharge(
        name: impl Into<String>,
        rate: Decimal,
        cap: Decimal,
    ) -> Result<Self, PaymentError> {
        let name = non_empty("name", name.into())?;
        Ok(Self::CappedSurcharge {
            name,
            rate: non_negative("rate", rate)?,
            cap: non_negative("cap", cap)?,
        })
    }

    /// Creates a flat deduction.
    ///
    /// An `amount` larger than the running amount is accepted; applying it
    /// yields zero.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for an empty `name` or a negative `amount`.
    pub fn deduction(name: impl Into<String>, amount: Decimal) -> Result<Self, PaymentError> {
        let name = non_empty("name", name.into())?;
        Ok(Self::Deduction {
            name,
            amount: non_negative("amount", amount)?,
        })
    }

    /// Creates a cross-border surcharge towards `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for an empty `currency` or a negative `rate`.
    pub fn cross_border(currency: impl Into<String>, rate: Decimal) -> Result<Self, PaymentError> {
        let currency = non_empty("currency", currency.into())?;
        Ok(Self::CrossBorder {
            rate: non_negative("rate", rate)?,
            currency,
        })
    }

    /// 18% goods and services tax.
    pub fn gst() -> Self {
        Self::Surcharge {
            name: "GST".to_string(),
            rate: GST_RATE,
        }
    }

    /// Gateway processing fee: 0.5%, at most 500.
    pub fn processing_fee() -> Self {
        Self::CappedSurcharge {
            name: "Processing Fee".to_string(),
            rate: PROCESSING_FEE_RATE,
            cap: PROCESSING_FEE_CAP,
        }
    }

    /// Promotional cashback of a flat `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for a negative `amount`.
    pub fn cashback(amount: Decimal) -> Result<Self, PaymentError> {
        Self::deduction("Cashback", amount)
    }

    /// 2% international transaction fee towards `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidParameter`] for an empty `currency`.
    pub fn international_fee(currency: impl Into<String>) -> Result<Self, PaymentError> {
        Self::cross_border(currency, INTERNATIONAL_FEE_RATE)
    }

    /// Short name of the step, e.g. `GST` or `International Fee`.
    pub fn name(&self) -> &str {
        match self {
            Self::Surcharge { name, .. }
            | Self::CappedSurcharge { name, .. }
            | Self::Deduction { name, .. } => name.as_str(),
            Self::CrossBorder { .. } => "International Fee",
        }
    }

    /// Returns the signed change this step makes to `input`.
    ///
    /// Positive for fees, negative for deductions. A deduction never takes
    /// more than `input`.
    pub fn charge(&self, input: Decimal) -> Decimal {
        self.apply(input) - input
    }

    /// Returns the amount after this step, given the running amount `input`.
    ///
    /// Saturates at [`Decimal::MAX`] when the result is out of range.
    pub fn apply(&self, input: Decimal) -> Decimal {
        self.try_apply(input).unwrap_or(Decimal::MAX)
    }

    /// Like [`Adjustment::apply`], but reports overflow.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Overflow`] if the result exceeds the range of [`Decimal`].
    pub fn try_apply(&self, input: Decimal) -> Result<Decimal, PaymentError> {
        let output = match self {
            Self::Surcharge { rate, .. } | Self::CrossBorder { rate, .. } => input
                .checked_mul(*rate)
                .and_then(|fee| input.checked_add(fee)),
            Self::CappedSurcharge { rate, cap, .. } => input
                .checked_mul(*rate)
                .and_then(|fee| input.checked_add(fee.min(*cap))),
            Self::Deduction { amount, .. } => input.checked_sub(*amount),
        }
        .ok_or(PaymentError::Overflow)?;
        Ok(output.max(Decimal::ZERO))
    }

    /// Appends this step's fragment to `input_description`.
    ///
    /// `input` is the running amount before this step, used to show the fee.
    pub fn describe(&self, input: Decimal, input_description: &str) -> String {
        format!("{input_description}{}", self.fragment(input))
    }

    /// Returns this step's own part of the description, e.g. ` + GST @18% (₹1800.00)`.
    pub fn fragment(&self, input: Decimal) -> String {
        match self {
            Self::Surcharge { name, rate } => format!(
                " + {name} @{}% ({})",
                percent(*rate),
                format_money(self.charge(input))
            ),
            Self::CappedSurcharge { name, .. } => {
                format!(" + {name} ({})", format_money(self.charge(input)))
            }
            Self::Deduction { name, amount } => format!(" - {name} ({})", format_money(*amount)),
            Self::CrossBorder { rate, currency } => format!(
                " + International Fee @{}% to {currency} ({})",
                percent(*rate),
                format_money(self.charge(input))
            ),
        }
    }
}

/// Parses a step spec such as `gst`, `cashback:500` or `capped:Gateway:0.01:250`.
///
/// | Spec | Step |
/// |------|------|
/// | `gst` | [`Adjustment::gst`] |
/// | `processing-fee` | [`Adjustment::processing_fee`] |
/// | `cashback:<amount>` | [`Adjustment::cashback`] |
/// | `international:<currency>` | [`Adjustment::international_fee`] |
/// | `surcharge:<name>:<rate>` | [`Adjustment::surcharge`] |
/// | `capped:<name>:<rate>:<cap>` | [`Adjustment::capped_surcharge`] |
/// | `deduct:<name>:<amount>` | [`Adjustment::deduction`] |
/// | `cross-border:<currency>:<rate>` | [`Adjustment::cross_border`] |
impl FromStr for Adjustment {
    type Err = PaymentError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
        let malformed = || PaymentError::MalformedAdjustment(spec.to_string());
        let number = |s: &str| Decimal::from_str(s).map_err(|_| malformed());

        match parts.as_slice() {
            [keyword] if keyword.eq_ignore_ascii_case("gst") => Ok(Self::gst()),
            [keyword] if keyword.eq_ignore_ascii_case("processing-fee") => {
                Ok(Self::processing_fee())
            }
            [keyword, rest @ ..] => match (keyword.to_ascii_lowercase().as_str(), rest) {
                ("cashback", [amount]) => Self::cashback(number(*amount)?),
                ("international", [currency]) => Self::international_fee(*currency),
                ("surcharge", [name, rate]) => Self::surcharge(*name, number(*rate)?),
                ("capped", [name, rate, cap]) => {
                    Self::capped_surcharge(*name, number(*rate)?, number(*cap)?)
                }
                ("deduct", [name, amount]) => Self::deduction(*name, number(*amount)?),
                ("cross-border", [currency, rate]) => Self::cross_border(*currency, number(*rate)?),
                (
                    "gst" | "processing-fee" | "cashback" | "international" | "surcharge"
                    | "capped" | "deduct" | "cross-border",
                    _,
                ) => Err(malformed()),
                _ => Err(PaymentError::UnknownAdjustment(keyword.to_string())),
            },
            [] => Err(malformed()),
        }
    }
}

/// Renders a rate as a percentage without trailing zeros: `0.005` -> `0.5`.
fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

fn non_negative(field: &'static str, value: Decimal) -> Result<Decimal, PaymentError> {
    if value < Decimal::ZERO {
        return Err(PaymentError::negative(field));
    }
    Ok(value)
}

fn non_empty(field: &'static str, value: String) -> Result<String, PaymentError> {
    if value.trim().is_empty() {
        return Err(PaymentError::empty(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surcharge_adds_percentage() {
        let gst = Adjustment::gst();
        assert_eq!(gst.apply(dec!(10000)), dec!(11800));
        assert_eq!(gst.charge(dec!(10000)), dec!(1800));
    }

    #[test]
    fn capped_surcharge_below_cap() {
        let fee = Adjustment::processing_fee();
        assert_eq!(fee.apply(dec!(11800)), dec!(11859));
    }

    #[test]
    fn capped_surcharge_hits_cap() {
        let fee = Adjustment::processing_fee();
        // 0.5% of 200000 is 1000, capped at 500
        assert_eq!(fee.apply(dec!(200000)), dec!(200500));
        assert_eq!(fee.charge(dec!(200000)), dec!(500));
    }

    #[test]
    fn deduction_floors_at_zero() {
        let cashback = Adjustment::cashback(dec!(500)).unwrap();
        assert_eq!(cashback.apply(dec!(100)), Decimal::ZERO);
        assert_eq!(cashback.charge(dec!(100)), dec!(-100));
        assert_eq!(cashback.apply(dec!(12359)), dec!(11859));
    }

    #[test]
    fn cross_border_adds_percentage_only() {
        let fee = Adjustment::international_fee("USD").unwrap();
        assert_eq!(fee.apply(dec!(10000)), dec!(10200));
    }

    #[test]
    fn names() {
        assert_eq!(Adjustment::gst().name(), "GST");
        assert_eq!(Adjustment::processing_fee().name(), "Processing Fee");
        assert_eq!(Adjustment::cashback(dec!(1)).unwrap().name(), "Cashback");
        assert_eq!(
            Adjustment::international_fee("USD").unwrap().name(),
            "International Fee"
        );
    }

    #[test]
    fn overflow_saturates_or_reports() {
        let gst = Adjustment::gst();
        assert_eq!(gst.try_apply(Decimal::MAX), Err(PaymentError::Overflow));
        assert_eq!(gst.apply(Decimal::MAX), Decimal::MAX);

        // The cap keeps the fee small, but the sum still overflows
        let fee = Adjustment::processing_fee();
        assert_eq!(fee.try_apply(Decimal::MAX), Err(PaymentError::Overflow));

        // Deducting from the maximum is always representable
        let cashback = Adjustment::cashback(dec!(500)).unwrap();
        assert_eq!(
            cashback.try_apply(Decimal::MAX),
            Ok(Decimal::MAX - dec!(500))
        );
    }

    #[test]
    fn apply_is_pure() {
        let fee = Adjustment::processing_fee();
        assert_eq!(fee.apply(dec!(1234.56)), fee.apply(dec!(1234.56)));
    }

    #[test]
    fn fragments_match_kind() {
        assert_eq!(
            Adjustment::gst().fragment(dec!(10000)),
            " + GST @18% (₹1800.00)"
        );
        assert_eq!(
            Adjustment::processing_fee().fragment(dec!(11800)),
            " + Processing Fee (₹59.00)"
        );
        assert_eq!(
            Adjustment::cashback(dec!(500)).unwrap().fragment(dec!(100)),
            " - Cashback (₹500.00)"
        );
        assert_eq!(
            Adjustment::international_fee("USD")
                .unwrap()
                .fragment(dec!(10000)),
            " + International Fee @2% to USD (₹200.00)"
        );
    }

    #[test]
    fn describe_appends_after_input_description() {
        let described = Adjustment::gst().describe(dec!(100), "Base Payment (UPI)");
        assert_eq!(described, "Base Payment (UPI) + GST @18% (₹18.00)");
    }

    #[test]
    fn fractional_rates_render_without_trailing_zeros() {
        let fee = Adjustment::surcharge("Convenience", dec!(0.005)).unwrap();
        assert_eq!(fee.fragment(dec!(1000)), " + Convenience @0.5% (₹5.00)");
    }

    #[test]
    fn constructors_reject_invalid_parameters() {
        assert_eq!(
            Adjustment::surcharge("GST", dec!(-0.18)),
            Err(PaymentError::negative("rate"))
        );
        assert_eq!(
            Adjustment::capped_surcharge("Fee", dec!(0.01), dec!(-1)),
            Err(PaymentError::negative("cap"))
        );
        assert_eq!(
            Adjustment::cashback(dec!(-5)),
            Err(PaymentError::negative("amount"))
        );
        assert_eq!(
            Adjustment::international_fee("  "),
            Err(PaymentError::empty("currency"))
        );
        assert_eq!(
            Adjustment::surcharge("", dec!(0.1)),
            Err(PaymentError::empty("name"))
        );
    }

    #[test]
    fn parse_presets() {
        assert_eq!("gst".parse::<Adjustment>().unwrap(), Adjustment::gst());
        assert_eq!(
            " Processing-Fee ".parse::<Adjustment>().unwrap(),
            Adjustment::processing_fee()
        );
        assert_eq!(
            "cashback:500".parse::<Adjustment>().unwrap(),
            Adjustment::cashback(dec!(500)).unwrap()
        );
        assert_eq!(
            "international: EUR".parse::<Adjustment>().unwrap(),
            Adjustment::international_fee("EUR").unwrap()
        );
    }

    #[test]
    fn parse_generic_steps() {
        assert_eq!(
            "surcharge:Service Tax:0.05".parse::<Adjustment>().unwrap(),
            Adjustment::surcharge("Service Tax", dec!(0.05)).unwrap()
        );
        assert_eq!(
            "capped:Gateway:0.01:250".parse::<Adjustment>().unwrap(),
            Adjustment::capped_surcharge("Gateway", dec!(0.01), dec!(250)).unwrap()
        );
        assert_eq!(
            "deduct:Coupon:75.5".parse::<Adjustment>().unwrap(),
            Adjustment::deduction("Coupon", dec!(75.5)).unwrap()
        );
        assert_eq!(
            "cross-border:GBP:0.035".parse::<Adjustment>().unwrap(),
            Adjustment::cross_border("GBP", dec!(0.035)).unwrap()
        );
    }

    #[test]
    fn parse_rejects_bad_specs() {
        assert_eq!(
            "vat:0.2".parse::<Adjustment>(),
            Err(PaymentError::UnknownAdjustment("vat".into()))
        );
        assert_eq!(
            "cashback:lots".parse::<Adjustment>(),
            Err(PaymentError::MalformedAdjustment("cashback:lots".into()))
        );
        assert_eq!(
            "cashback".parse::<Adjustment>(),
            Err(PaymentError::MalformedAdjustment("cashback".into()))
        );
        assert_eq!(
            "gst:0.2".parse::<Adjustment>(),
            Err(PaymentError::MalformedAdjustment("gst:0.2".into()))
        );
        assert_eq!(
            "cashback:-1".parse::<Adjustment>(),
            Err(PaymentError::negative("amount"))
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Adjustment::processing_fee()).unwrap();
        assert_eq!(json["kind"], "capped_surcharge");
        assert_eq!(json["rate"], "0.005");
        assert_eq!(json["cap"], "500");

        let back: Adjustment = serde_json::from_value(json).unwrap();
        assert_eq!(back, Adjustment::processing_fee());
    }
}
