use chrono::NaiveDate;
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::exchange_rate::ExchangeRate;
use crate::errors::{DuplicateExchangeRate, NonPositiveRate, RateMissing};
use crate::money::{round2, Currency};

/// §4.1 `put_rate`. `from` is never VES in this closed set — VES is always
/// the quote currency.
#[tracing::instrument(skip(repos))]
pub async fn put_rate(
    repos: &Repositories,
    from: Currency,
    rate_date: NaiveDate,
    rate: Decimal,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<ExchangeRate, ServerError> {
    if rate <= Decimal::ZERO {
        return Err(NonPositiveRate::new(&rate));
    }
    if repos
        .exchange_rates
        .find_exact(from, Currency::Ves, rate_date)
        .await?
        .is_some()
    {
        return Err(DuplicateExchangeRate::new(from.code(), Currency::Ves.code(), &rate_date));
    }
    let row = ExchangeRate {
        id: Uuid::new_v4(),
        from_currency: from,
        to_currency: Currency::Ves,
        rate_date,
        rate,
        created_at: now,
    };
    repos.exchange_rates.save(row.clone()).await?;
    tracing::info!(rate_id = %row.id, "exchange rate recorded");
    Ok(row)
}

/// §4.1 `latest_rate` — absence is not a failure, callers decide.
pub async fn latest_rate(
    repos: &Repositories,
    from: Currency,
    on_date: NaiveDate,
) -> Result<Option<ExchangeRate>, ServerError> {
    if from == Currency::Ves {
        return Ok(None);
    }
    repos.exchange_rates.find_latest_on_or_before(from, Currency::Ves, on_date).await
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRateStatus {
    pub currency: Currency,
    pub needs_update: bool,
    pub latest_rate_date: Option<NaiveDate>,
    pub message: String,
}

/// §4.1 `daily_status` — "today" is the caller's civil-local today (§6),
/// resolved by the caller via [`crate::clock::Clock::rate_today`].
pub async fn daily_status(
    repos: &Repositories,
    from: Currency,
    today: NaiveDate,
) -> Result<DailyRateStatus, ServerError> {
    let latest = latest_rate(repos, from, today).await?;
    Ok(match latest {
        Some(row) if row.rate_date == today => DailyRateStatus {
            currency: from,
            needs_update: false,
            latest_rate_date: Some(row.rate_date),
            message: format!("{} rate is current as of {}.", from, today),
        },
        Some(row) => DailyRateStatus {
            currency: from,
            needs_update: true,
            latest_rate_date: Some(row.rate_date),
            message: format!("{} rate is stale; latest known date is {}.", from, row.rate_date),
        },
        None => DailyRateStatus {
            currency: from,
            needs_update: true,
            latest_rate_date: None,
            message: format!("No {} rate has ever been recorded.", from),
        },
    })
}

/// `convert_to_ves` — §4.1's shared conversion contract, used by C3/C5/C7/C8.
pub async fn convert_to_ves(
    repos: &Repositories,
    amount: Decimal,
    currency: Currency,
    on_date: NaiveDate,
) -> Result<(Decimal, Option<Decimal>), ServerError> {
    if currency == Currency::Ves {
        return Ok((round2(amount), None));
    }
    let rate = latest_rate(repos, currency, on_date)
        .await?
        .ok_or_else(|| RateMissing::new(currency.code(), Currency::Ves.code(), &on_date))?;
    Ok((round2(amount * rate.rate), Some(rate.rate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn fresh_repos() -> Repositories {
        Repositories::in_memory(SchoolConfiguration {
            school_name: "Colegio Test".into(),
            school_rif: "J-00000000-0".into(),
            school_address: "Caracas".into(),
            invoice_number_prefix: "INV-".into(),
            next_internal_invoice_reference: 1,
            credit_note_number_prefix: "CN-".into(),
            next_credit_note_reference: 1,
            default_iva_percentage: dec!(0.16),
            payment_due_day: Some(5),
        })
    }

    #[tokio::test]
    async fn put_rate_rejects_duplicate_on_same_date() {
        let repos = fresh_repos();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        put_rate(&repos, Currency::Usd, date, dec!(60.00), Utc::now()).await.unwrap();
        let err = put_rate(&repos, Currency::Usd, date, dec!(61.00), Utc::now()).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn convert_to_ves_passes_through_ves_untouched() {
        let repos = fresh_repos();
        let (ves, rate) = convert_to_ves(&repos, dec!(100.00), Currency::Ves, Utc::now().date_naive())
            .await
            .unwrap();
        assert_eq!(ves, dec!(100.00));
        assert_eq!(rate, None);
    }

    #[tokio::test]
    async fn convert_to_ves_fails_without_a_rate() {
        let repos = fresh_repos();
        let err = convert_to_ves(&repos, dec!(100.00), Currency::Usd, Utc::now().date_naive()).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn latest_rate_picks_greatest_date_not_exceeding_on_date() {
        let repos = fresh_repos();
        let d1 = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        put_rate(&repos, Currency::Usd, d1, dec!(60.00), Utc::now()).await.unwrap();
        put_rate(&repos, Currency::Usd, d2, dec!(62.00), Utc::now()).await.unwrap();
        let on = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let found = latest_rate(&repos, Currency::Usd, on).await.unwrap().unwrap();
        assert_eq!(found.rate_date, d2);
    }
}
