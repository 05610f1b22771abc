//! Diesel table definitions matching `backend/migrations`.
//!
//! Money and fractional readings are stored as `BIGINT` hundredths. Enum
//! columns hold the lowercase labels and are guarded by `CHECK` constraints
//! in the migration.

diesel::table! {
    citizens (id) {
        id -> Uuid,
        /// Null only for delegated accounts whose provider omits a phone.
        mobile -> Nullable<Varchar>,
        name -> Nullable<Text>,
        aadhaar_number -> Nullable<Varchar>,
        email -> Nullable<Text>,
        address -> Nullable<Text>,
        city -> Nullable<Text>,
        state -> Nullable<Text>,
        pincode -> Nullable<Varchar>,
        language -> Varchar,
        external_subject -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    admins (id) {
        id -> Uuid,
        username -> Text,
        password_hash -> Text,
        name -> Text,
        role -> Text,
        external_subject -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    otp_challenges (id) {
        id -> Uuid,
        mobile -> Varchar,
        /// Lowercase hex SHA-256 of the code.
        code_digest -> Varchar,
        expires_at -> Timestamptz,
        used -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    bills (id) {
        id -> Uuid,
        citizen_id -> Uuid,
        service_type -> Text,
        bill_number -> Varchar,
        amount_paise -> Int8,
        due_date -> Date,
        billing_period -> Nullable<Text>,
        status -> Text,
        consumer_number -> Nullable<Text>,
        meter_reading_hundredths -> Nullable<Int8>,
        units_consumed_hundredths -> Nullable<Int8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    payments (id) {
        id -> Uuid,
        citizen_id -> Uuid,
        bill_id -> Uuid,
        amount_paise -> Int8,
        payment_method -> Text,
        transaction_id -> Varchar,
        status -> Text,
        receipt_number -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    service_requests (id) {
        id -> Uuid,
        citizen_id -> Uuid,
        request_type -> Text,
        service_type -> Text,
        description -> Nullable<Text>,
        status -> Text,
        acknowledgment_number -> Varchar,
        documents -> Nullable<Text>,
        remarks -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    complaints (id) {
        id -> Uuid,
        citizen_id -> Uuid,
        category -> Text,
        subcategory -> Nullable<Text>,
        description -> Text,
        location -> Nullable<Text>,
        photo -> Nullable<Text>,
        status -> Text,
        complaint_number -> Varchar,
        priority -> Text,
        resolution_remarks -> Nullable<Text>,
        resolved_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        /// Null for broadcasts.
        citizen_id -> Nullable<Uuid>,
        title -> Text,
        message -> Text,
        kind -> Text,
        /// Read flag for targeted notifications; broadcasts use
        /// `notification_reads`.
        is_read -> Bool,
        target_all -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notification_reads (notification_id, citizen_id) {
        notification_id -> Uuid,
        citizen_id -> Uuid,
        read_at -> Timestamptz,
    }
}

diesel::table! {
    announcements (id) {
        id -> Uuid,
        title -> Text,
        message -> Text,
        kind -> Text,
        service_type -> Nullable<Text>,
        start_date -> Nullable<Timestamptz>,
        end_date -> Nullable<Timestamptz>,
        is_active -> Bool,
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}
