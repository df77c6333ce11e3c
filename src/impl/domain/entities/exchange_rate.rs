use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::ExchangeRateId;

/// `(from_currency, to_currency, rate_date)` unique; `rate > 0` — §3. In this
/// closed currency set `to` is always VES.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: ExchangeRateId,
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub rate_date: NaiveDate,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
}
