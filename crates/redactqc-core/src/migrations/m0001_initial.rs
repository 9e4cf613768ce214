use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema")
        .operation(
            CreateTable::new("storage_meta")
                .add_field(Field::new("key", FieldType::Text).primary_key())
                .add_field(Field::new("value", FieldType::Text).not_null()),
        )
        .operation(
            CreateTable::new("pii_categories")
                .add_field(Field::new("name", FieldType::Text).primary_key())
                .add_field(Field::new("description", FieldType::Text).not_null())
                .add_field(Field::new("severity_level", FieldType::Integer).not_null()),
        )
        .operation(RunSql::portable().for_backend(
            "sqlite",
            r#"INSERT OR IGNORE INTO pii_categories (name, description, severity_level) VALUES
    ('US_SSN', 'US Social Security Number', 5),
    ('US_ITIN', 'US Individual Taxpayer Identification Number', 5),
    ('CREDIT_CARD', 'Credit or debit card number', 5),
    ('US_BANK_NUMBER', 'US bank account/routing identifier', 5),
    ('BANK_ACCOUNT', 'Bank account number near a finance context word', 4),
    ('ROUTING_NUMBER', 'ABA bank routing number', 4),
    ('US_PASSPORT', 'US passport number', 5),
    ('US_DRIVER_LICENSE', 'US driver license number', 4),
    ('PHONE_NUMBER', 'Telephone number', 3),
    ('EMAIL_ADDRESS', 'Email address', 3),
    ('IP_ADDRESS', 'IP address', 2),
    ('URL', 'URL', 1),
    ('DATE_TIME', 'Date or timestamp', 1),
    ('MAC_ADDRESS', 'Hardware MAC address', 2),
    ('DEVICE_ID', 'Device identifier (e.g. IMEI)', 3),
    ('CASE_NUMBER', 'Court case or docket number', 2),
    ('MEDICAL_RECORD', 'Medical record number', 4),
    ('PERSON', 'Person name', 3),
    ('LOCATION', 'Geographic location', 2),
    ('LEGAL_ROLE_NAME', 'Person name tied to a legal-proceeding role', 5)"#,
        ))
        .operation(
            CreateTable::new("batches")
                .add_field(Field::new("id", FieldType::Text).primary_key())
                .add_field(Field::new("name", FieldType::Text).not_null())
                .add_field(Field::new("source_path", FieldType::Text).not_null())
                .add_field(Field::new("created_at", FieldType::Text).not_null())
                .add_field(Field::new("status", FieldType::Text).not_null())
                .add_field(Field::new("total_docs", FieldType::Integer).not_null().default("0"))
                .add_field(Field::new("processed_docs", FieldType::Integer).not_null().default("0"))
                .add_field(Field::new("docs_with_findings", FieldType::Integer).not_null().default("0")),
        )
        .operation(
            CreateTable::new("documents")
                .add_field(Field::new("id", FieldType::Text).primary_key())
                .add_field(Field::new("batch_id", FieldType::Text).not_null().references("batches", "id"))
                .add_field(Field::new("filename", FieldType::Text).not_null())
                .add_field(Field::new("filepath", FieldType::Text).not_null())
                .add_field(Field::new("page_count", FieldType::Integer).not_null().default("0"))
                .add_field(Field::new("finding_count", FieldType::Integer).not_null().default("0"))
                .add_field(Field::new("processed_at", FieldType::Text))
                .add_field(Field::new("status", FieldType::Text).not_null())
                .add_field(Field::new("claimed", FieldType::Integer).not_null().default("0")),
        )
        .operation(
            CreateTable::new("findings")
                .add_field(Field::new("id", FieldType::Text).primary_key())
                .add_field(Field::new("document_id", FieldType::Text).not_null().references("documents", "id"))
                .add_field(Field::new("page_number", FieldType::Integer).not_null())
                .add_field(Field::new("pii_type", FieldType::Text).not_null())
                .add_field(Field::new("confidence", FieldType::Double).not_null())
                .add_field(Field::new("char_offset", FieldType::Integer).not_null())
                .add_field(Field::new("char_length", FieldType::Integer).not_null())
                .add_field(Field::new("context_snippet", FieldType::Text).not_null()),
        )
        .operation(AddIndex::new(
            "documents",
            Index::new("idx_documents_batch_id").column("batch_id"),
        ))
        .operation(AddIndex::new(
            "documents",
            Index::new("idx_documents_status").column("status"),
        ))
        .operation(AddIndex::new(
            "findings",
            Index::new("idx_findings_document_id").column("document_id"),
        ))
        .operation(AddIndex::new(
            "findings",
            Index::new("idx_findings_pii_type").column("pii_type"),
        ))
        .operation(AddIndex::new(
            "findings",
            Index::new("idx_findings_confidence").column("confidence"),
        ))
        .operation(AddIndex::new(
            "findings",
            Index::new("idx_findings_unique")
                .column("document_id")
                .column("page_number")
                .column("pii_type")
                .column("char_offset")
                .column("char_length")
                .unique(),
        ))
}
