//! Severity lookup mirroring the `pii_categories` seed data in
//! `redactqc-core`'s initial migration — kept in sync by hand since this
//! crate has no access to the store at detection time (detection runs
//! inside a worker process with no DB connection).

/// Severity level (1-5) for a `pii_type`, used by the dedup pass's overlap
/// tie-break. Unknown types sort lowest.
pub fn severity(pii_type: &str) -> i32 {
    match pii_type {
        "US_SSN" | "US_ITIN" | "CREDIT_CARD" | "US_BANK_NUMBER" | "US_PASSPORT" => 5,
        "LEGAL_ROLE_NAME" => 5,
        "BANK_ACCOUNT" | "ROUTING_NUMBER" | "US_DRIVER_LICENSE" | "MEDICAL_RECORD" => 4,
        "PHONE_NUMBER" | "EMAIL_ADDRESS" | "DEVICE_ID" | "PERSON" => 3,
        "IP_ADDRESS" | "MAC_ADDRESS" | "CASE_NUMBER" | "LOCATION" => 2,
        "URL" | "DATE_TIME" => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssn_outranks_url() {
        assert!(severity("US_SSN") > severity("URL"));
    }
}
