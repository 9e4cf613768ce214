//! Check-digit validators shared by the structural regex recognizers.

/// Luhn checksum, used by `CREDIT_CARD` and `DEVICE_ID` (IMEI).
pub fn luhn_valid(digits: &str) -> bool {
    let digits: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 2 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// ABA routing number checksum: `3*(d1+d4+d7) + 7*(d2+d5+d8) + (d3+d6+d9) ≡ 0 (mod 10)`.
pub fn aba_routing_valid(digits: &str) -> bool {
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != 9 {
        return false;
    }
    let checksum = 3 * (d[0] + d[3] + d[6]) + 7 * (d[1] + d[4] + d[7]) + (d[2] + d[5] + d[8]);
    checksum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luhn_accepts_known_valid_card() {
        assert!(luhn_valid("4111111111111111"));
    }

    #[test]
    fn luhn_rejects_off_by_one() {
        assert!(!luhn_valid("4111111111111112"));
    }

    #[test]
    fn aba_accepts_known_valid_routing_number() {
        // Wells Fargo's published sample routing number.
        assert!(aba_routing_valid("121042882"));
    }

    #[test]
    fn aba_rejects_wrong_length() {
        assert!(!aba_routing_valid("12345"));
    }
}
