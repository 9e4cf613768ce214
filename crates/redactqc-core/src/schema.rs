// Hand-maintained to match the cetane-managed schema (see `migrations/`).

diesel::table! {
    storage_meta (key) {
        key -> Text,
        value -> Text,
    }
}

diesel::table! {
    pii_categories (name) {
        name -> Text,
        description -> Text,
        severity_level -> Integer,
    }
}

diesel::table! {
    batches (id) {
        id -> Text,
        name -> Text,
        source_path -> Text,
        created_at -> Text,
        status -> Text,
        total_docs -> Integer,
        processed_docs -> Integer,
        docs_with_findings -> Integer,
    }
}

diesel::table! {
    documents (id) {
        id -> Text,
        batch_id -> Text,
        filename -> Text,
        filepath -> Text,
        page_count -> Integer,
        finding_count -> Integer,
        processed_at -> Nullable<Text>,
        status -> Text,
        claimed -> Integer,
    }
}

diesel::table! {
    findings (id) {
        id -> Text,
        document_id -> Text,
        page_number -> Integer,
        pii_type -> Text,
        confidence -> Double,
        char_offset -> Integer,
        char_length -> Integer,
        context_snippet -> Text,
    }
}

diesel::joinable!(documents -> batches (batch_id));
diesel::joinable!(findings -> documents (document_id));

diesel::allow_tables_to_appear_in_same_query!(batches, documents, findings, pii_categories, storage_meta,);
