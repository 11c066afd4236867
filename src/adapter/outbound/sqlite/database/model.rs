//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::investment_data;

/// Database row for a quote (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = investment_data)]
pub struct NewQuoteRow {
    pub symbol: String,
    pub price: String,
    pub atr: String,
    pub timestamp: String,
}

/// Database row for a quote (queryable).
#[derive(Queryable, QueryableByName, Selectable, Debug, Clone)]
#[diesel(table_name = investment_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteRow {
    pub id: i64,
    pub symbol: String,
    pub price: String,
    pub atr: String,
    pub timestamp: String,
}
