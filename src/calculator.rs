//! EMI and income arithmetic for the offer and income steps

use chrono::NaiveDate;

/// Rupees in one lakh
pub const LAKH: f64 = 100_000.0;

/// Monthly installment amortising `principal` over `tenure_months`.
///
/// A zero rate degenerates to straight division. A zero tenure returns the
/// whole principal as a single payment.
pub fn calculate_emi(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> f64 {
    if tenure_months == 0 {
        return principal;
    }
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let n = tenure_months as f64;
    if monthly_rate == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + monthly_rate).powf(n);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Display values derived from the loan parameters
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSummary {
    /// Full precision installment
    pub emi: f64,
    pub principal: f64,
    pub interest_rate: f64,
    pub tenure_months: u32,
}

impl OfferSummary {
    pub fn new(principal: f64, interest_rate: f64, tenure_months: u32) -> Self {
        Self {
            emi: calculate_emi(principal, interest_rate, tenure_months),
            principal,
            interest_rate,
            tenure_months,
        }
    }

    /// Installment rounded to the nearest rupee
    pub fn emi_rounded(&self) -> u64 {
        self.emi.round().max(0.0) as u64
    }

    /// e.g. `Rs. 15,836 p.m.`
    pub fn emi_display(&self) -> String {
        format!("Rs. {} p.m.", format_inr(self.emi_rounded()))
    }

    /// e.g. `10.0 Lakhs`
    pub fn loan_amount_display(&self) -> String {
        format!("{:.1} Lakhs", self.principal / LAKH)
    }

    /// e.g. `8.50`
    pub fn interest_rate_display(&self) -> String {
        format!("{:.2}", self.interest_rate)
    }

    /// Total repaid over the tenure
    pub fn total_payable(&self) -> f64 {
        self.emi * self.tenure_months as f64
    }
}

/// Group digits the en-IN way: last three, then pairs (12,34,567)
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Short en-IN date, e.g. `16/10/2026`
pub fn format_en_in_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Derived totals shown on the income step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeSummary {
    pub total_income: f64,
    pub net_monthly_salary: f64,
}

impl IncomeSummary {
    /// total = gross - bonus; net = total - obligations
    pub fn new(gross_monthly_income: f64, bonus: f64, monthly_obligation: f64) -> Self {
        let total_income = gross_monthly_income - bonus;
        Self {
            total_income,
            net_monthly_salary: total_income - monthly_obligation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod emi {
        use super::*;

        #[test]
        fn test_default_offer() {
            let emi = calculate_emi(1_000_000.0, 8.5, 84);
            assert_eq!(emi.round() as u64, 15_836);
        }

        #[test]
        fn test_zero_rate_divides_evenly() {
            let emi = calculate_emi(1_000_000.0, 0.0, 84);
            assert_eq!(emi, 1_000_000.0 / 84.0);
            assert!((emi - 11_904.76).abs() < 0.01);
        }

        #[test]
        fn test_zero_tenure_returns_principal() {
            assert_eq!(calculate_emi(50_000.0, 10.0, 0), 50_000.0);
        }

        #[test]
        fn test_short_loan() {
            let emi = calculate_emi(100_000.0, 10.0, 12);
            assert_eq!(emi.round() as u64, 8_792);
        }

        #[test]
        fn test_longer_tenure_lowers_installment() {
            let short = calculate_emi(500_000.0, 9.0, 36);
            let long = calculate_emi(500_000.0, 9.0, 84);
            assert!(long < short);
        }
    }

    mod offer_summary {
        use super::*;

        #[test]
        fn test_display_values() {
            let offer = OfferSummary::new(1_000_000.0, 8.5, 84);
            assert_eq!(offer.emi_rounded(), 15_836);
            assert_eq!(offer.emi_display(), "Rs. 15,836 p.m.");
            assert_eq!(offer.loan_amount_display(), "10.0 Lakhs");
            assert_eq!(offer.interest_rate_display(), "8.50");
        }

        #[test]
        fn test_rounding_keeps_full_precision_underneath() {
            let offer = OfferSummary::new(1_000_000.0, 0.0, 84);
            assert_eq!(offer.emi_rounded(), 11_905);
            assert!(offer.emi.fract() > 0.0);
        }

        #[test]
        fn test_lakhs_one_decimal() {
            let offer = OfferSummary::new(530_000.0, 8.5, 84);
            assert_eq!(offer.loan_amount_display(), "5.3 Lakhs");
        }

        #[test]
        fn test_total_payable() {
            let offer = OfferSummary::new(84_000.0, 0.0, 84);
            assert!((offer.total_payable() - 84_000.0).abs() < 1e-6);
        }
    }

    mod inr_format {
        use super::*;

        #[test]
        fn test_small_numbers_unchanged() {
            assert_eq!(format_inr(0), "0");
            assert_eq!(format_inr(999), "999");
        }

        #[test]
        fn test_thousands() {
            assert_eq!(format_inr(1_000), "1,000");
            assert_eq!(format_inr(15_836), "15,836");
        }

        #[test]
        fn test_lakh_grouping() {
            assert_eq!(format_inr(100_000), "1,00,000");
            assert_eq!(format_inr(1_234_567), "12,34,567");
            assert_eq!(format_inr(123_456_789), "12,34,56,789");
        }
    }

    #[test]
    fn test_en_in_date_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_en_in_date(date), "7/3/2026");
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_en_in_date(date), "16/10/2026");
    }

    mod income {
        use super::*;

        #[test]
        fn test_net_salary() {
            let summary = IncomeSummary::new(80_000.0, 5_000.0, 20_000.0);
            assert_eq!(summary.total_income, 75_000.0);
            assert_eq!(summary.net_monthly_salary, 55_000.0);
        }
    }
}
