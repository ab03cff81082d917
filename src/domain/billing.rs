use crate::models::{Bill, BillStatus};

pub fn line_total(quantity: i64, unit_price: i64) -> Result<i64, String> {
    quantity
        .checked_mul(unit_price)
        .ok_or_else(|| "Line total is out of range".to_string())
}

/// Sum of `quantity * unit_price` over `(quantity, unit_price)` lines.
pub fn bill_total<I>(lines: I) -> Result<i64, String>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    lines.into_iter().try_fold(0i64, |total, (quantity, unit_price)| {
        let line = line_total(quantity, unit_price)?;
        total
            .checked_add(line)
            .ok_or_else(|| "Bill total is out of range".to_string())
    })
}

pub fn bill_status(total: i64, paid: i64) -> BillStatus {
    if paid >= total {
        BillStatus::Paid
    } else if paid > 0 {
        BillStatus::Partial
    } else {
        BillStatus::Unpaid
    }
}

pub fn validate_item(description: &str, quantity: i64, unit_price: i64) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Item description is required".to_string());
    }
    if quantity <= 0 {
        return Err("Item quantity must be positive".to_string());
    }
    if unit_price < 0 {
        return Err("Item price cannot be negative".to_string());
    }
    line_total(quantity, unit_price).map(|_| ())
}

pub fn validate_payment(bill: &Bill, amount: i64) -> Result<(), String> {
    if amount <= 0 {
        return Err("Payment amount must be positive".to_string());
    }
    let outstanding = bill.outstanding();
    if outstanding == 0 {
        return Err(format!("Bill {} is already settled", bill.id));
    }
    if amount > outstanding {
        return Err(format!(
            "Payment of {} exceeds the outstanding balance of {} on bill {}",
            format_cents(amount),
            format_cents(outstanding),
            bill.id
        ));
    }
    Ok(())
}

/// Renders cents as `12.34`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bill(total: i64, paid: i64) -> Bill {
        Bill {
            id: 3,
            patient_id: 1,
            admission_id: None,
            appointment_id: None,
            status: bill_status(total, paid),
            total,
            paid_amount: paid,
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    #[test]
    fn status_follows_paid_amount() {
        assert_eq!(bill_status(1_000, 0), BillStatus::Unpaid);
        assert_eq!(bill_status(1_000, 400), BillStatus::Partial);
        assert_eq!(bill_status(1_000, 1_000), BillStatus::Paid);
        assert_eq!(bill_status(0, 0), BillStatus::Paid);
    }

    #[test]
    fn payments_cannot_overshoot() {
        assert!(validate_payment(&bill(1_000, 400), 600).is_ok());
        assert!(validate_payment(&bill(1_000, 400), 601).is_err());
        assert!(validate_payment(&bill(1_000, 0), 0).is_err());
        assert!(validate_payment(&bill(1_000, 1_000), 1).unwrap_err().contains("settled"));
    }

    #[test]
    fn item_rules() {
        assert!(validate_item("X-ray", 1, 4_500).is_ok());
        assert!(validate_item(" ", 1, 4_500).is_err());
        assert!(validate_item("X-ray", 0, 4_500).is_err());
        assert!(validate_item("X-ray", 2, -1).is_err());
        assert!(validate_item("X-ray", i64::MAX, 2).is_err());
    }

    #[test]
    fn totals_add_up_lines() {
        assert_eq!(bill_total(vec![(1, 4_000), (3, 500)]), Ok(5_500));
        assert_eq!(bill_total(Vec::new()), Ok(0));
        assert!(bill_total(vec![(1, i64::MAX), (1, 1)]).is_err());
    }

    #[test]
    fn cents_formatting() {
        assert_eq!(format_cents(123_456), "1234.56");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
