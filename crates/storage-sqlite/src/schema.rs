// Diesel table definitions for the PayVault ledger.
//
// Decimal columns are TEXT holding exact `rust_decimal` strings; timestamp
// columns are TEXT holding RFC 3339 UTC strings.

diesel::table! {
    wallets (id) {
        id -> Text,
        user_id -> Text,
        wallet_type -> Text,
        balance -> Text,
        pending_balance -> Text,
        currency -> Text,
        daily_limit -> Nullable<Text>,
        monthly_limit -> Nullable<Text>,
        is_active -> Bool,
        version -> BigInt,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    transactions (id) {
        id -> Text,
        from_wallet_id -> Nullable<Text>,
        to_wallet_id -> Nullable<Text>,
        amount -> Text,
        currency -> Text,
        transaction_type -> Text,
        status -> Text,
        description -> Nullable<Text>,
        counterparty_id -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    digital_assets (symbol) {
        symbol -> Text,
        name -> Text,
        kind -> Text,
        decimals -> Integer,
        exchange_rate -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    asset_holdings (id) {
        id -> Text,
        wallet_id -> Text,
        asset_symbol -> Text,
        quantity -> Text,
        average_buy_price -> Text,
        total_invested -> Text,
        last_transaction_at -> Text,
    }
}

diesel::table! {
    investment_products (id) {
        id -> Text,
        name -> Text,
        kind -> Text,
        risk_level -> Text,
        expected_annual_return -> Text,
        minimum_amount -> Text,
        maximum_amount -> Text,
        tenure_months -> Integer,
        currency -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    user_investments (id) {
        id -> Text,
        user_id -> Text,
        product_id -> Text,
        funding_wallet_id -> Text,
        principal_amount -> Text,
        current_value -> Text,
        interest_earned -> Text,
        annual_return_rate -> Text,
        tenure_months -> Integer,
        currency -> Text,
        status -> Text,
        start_date -> Text,
        maturity_date -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    credit_facilities (id) {
        id -> Text,
        user_id -> Text,
        kind -> Text,
        credit_limit -> Text,
        used_credit -> Text,
        available_credit -> Text,
        interest_rate -> Text,
        status -> Text,
        next_payment_date -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::joinable!(asset_holdings -> wallets (wallet_id));
diesel::joinable!(user_investments -> investment_products (product_id));
diesel::joinable!(user_investments -> wallets (funding_wallet_id));

diesel::allow_tables_to_appear_in_same_query!(
    wallets,
    transactions,
    digital_assets,
    asset_holdings,
    investment_products,
    user_investments,
    credit_facilities,
);
