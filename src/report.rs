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

//! Console rendering for payment chains.

use crate::Payment;
use crate::base::{CURRENCY_SYMBOL, round_for_display};
use rust_decimal::Decimal;

/// Inner width of the payment details box.
const BOX_WIDTH: usize = 70;
/// Width of page headers and section rules.
const RULE_WIDTH: usize = 80;
const DESCRIPTION_LABEL: &str = "  Description: ";

/// Formats an amount with thousands separators: `11859` -> `11,859.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = format!("{:.2}", round_for_display(amount));
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{fraction}")
}

/// Renders the boxed "PAYMENT DETAILS" panel for `payment`.
///
/// Long descriptions wrap onto continuation lines aligned under the first.
pub fn payment_details(payment: &Payment) -> String {
    let mut out = String::new();
    out.push_str(&format!("╔{}╗\n", "═".repeat(BOX_WIDTH)));
    out.push_str(&format!("║{}║\n", center("PAYMENT DETAILS", BOX_WIDTH)));
    out.push_str(&format!("╠{}╣\n", "═".repeat(BOX_WIDTH)));

    let text_width = BOX_WIDTH - DESCRIPTION_LABEL.chars().count();
    let indent = " ".repeat(DESCRIPTION_LABEL.chars().count());
    for (i, line) in wrap(&payment.describe(), text_width).iter().enumerate() {
        let label = if i == 0 { DESCRIPTION_LABEL } else { indent.as_str() };
        out.push_str(&format!("║{label}{}║\n", pad_right(line, text_width)));
    }
    out.push_str(&format!("║{}║\n", " ".repeat(BOX_WIDTH)));

    let total = format!(
        "Final Amount: {CURRENCY_SYMBOL}{}",
        format_amount(payment.apply())
    );
    out.push_str(&format!("║  {}║\n", pad_right(&total, BOX_WIDTH - 2)));
    out.push_str(&format!("╚{}╝\n", "═".repeat(BOX_WIDTH)));
    out
}

/// Page header framed by double rules.
pub fn header(title: &str) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    format!("\n{rule}\n  {title}\n{rule}\n")
}

/// Section header framed by single rules.
pub fn section(title: &str) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    format!("\n{rule}\n  {title}\n{rule}\n")
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(width - left - len))
}

/// Pads with spaces to `width` characters, truncating longer text.
fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    format!("{text}{}", " ".repeat(width - len))
}

/// Greedy word wrap on character count. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
        if line.chars().count() + needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Adjustment;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(999.999)), "1,000.00");
        assert_eq!(format_amount(dec!(11859)), "11,859.00");
        assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_amount(dec!(-2500.5)), "-2,500.50");
    }

    #[test]
    fn pad_and_center_count_characters() {
        assert_eq!(pad_right("₹5", 4), "₹5  ");
        assert_eq!(pad_right("abcdef", 3), "abc");
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn details_box_has_fixed_width() {
        let payment = Payment::new(dec!(10000), "International Card")
            .unwrap()
            .wrap(Adjustment::gst())
            .wrap(Adjustment::processing_fee())
            .wrap(Adjustment::international_fee("USD").unwrap());

        let rendered = payment_details(&payment);
        for line in rendered.lines() {
            assert_eq!(line.chars().count(), BOX_WIDTH + 2, "line: {line}");
        }
        assert!(rendered.contains("PAYMENT DETAILS"));
        assert!(rendered.contains("Final Amount: ₹12,096.18"));
        // Description longer than the box wraps instead of being cut off
        assert!(rendered.contains("USD"));
    }
}
